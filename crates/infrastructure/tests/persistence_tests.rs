//! Integration tests for the content store on file-backed SQLite databases

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use application::ports::ContentStorePort;
use domain::{AudioFormat, ContentUpdate, TopicKey};
use infrastructure::{Database, DatabaseConfig, SqliteContentStore};

// ============================================================================
// Test Helpers
// ============================================================================

async fn open_store(dir: &tempfile::TempDir) -> (Database, SqliteContentStore) {
    let config = DatabaseConfig::file(dir.path().join("content.db"));
    let db = Database::connect(&config)
        .await
        .expect("Failed to open database");
    let store = SqliteContentStore::new(db.pool().clone());
    (db, store)
}

fn key(raw: &str) -> TopicKey {
    TopicKey::new(raw).expect("valid key")
}

// ============================================================================
// Upsert Semantics
// ============================================================================

#[tokio::test]
async fn script_then_audio_merge_into_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;
    let topic = key("cooking tips");

    store
        .upsert(&topic, ContentUpdate::script("Salt early."))
        .await
        .unwrap();
    store
        .upsert(&topic, ContentUpdate::default().with_audio(vec![0xFF, 0xFB], AudioFormat::Mp3))
        .await
        .unwrap();

    let record = store.get(&topic).await.unwrap().expect("record");
    assert_eq!(record.script.as_deref(), Some("Salt early."));
    assert_eq!(record.audio, Some(vec![0xFF, 0xFB]));
    assert_eq!(record.audio_format, Some(AudioFormat::Mp3));
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn script_only_update_keeps_stored_audio() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;
    let topic = key("tea");

    store
        .upsert(
            &topic,
            ContentUpdate::script("First draft.").with_audio(vec![1, 2, 3], AudioFormat::Opus),
        )
        .await
        .unwrap();
    store
        .upsert(&topic, ContentUpdate::script("Second draft."))
        .await
        .unwrap();

    let record = store.get(&topic).await.unwrap().unwrap();
    assert_eq!(record.script.as_deref(), Some("Second draft."));
    assert_eq!(record.audio, Some(vec![1, 2, 3]));
    assert_eq!(record.audio_format, Some(AudioFormat::Opus));
}

#[tokio::test]
async fn replacing_script_clears_audio_of_earlier_script() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;
    let topic = key("tea");

    store
        .upsert(
            &topic,
            ContentUpdate::script("Script version 1.").with_audio(vec![1, 2, 3], AudioFormat::Mp3),
        )
        .await
        .unwrap();
    store
        .upsert(&topic, ContentUpdate::script("Script version 2.").replacing_audio())
        .await
        .unwrap();

    let record = store.get(&topic).await.unwrap().unwrap();
    assert_eq!(record.script.as_deref(), Some("Script version 2."));
    assert!(record.audio.is_none());
    assert!(record.audio_format.is_none());
}

#[tokio::test]
async fn replacing_script_with_audio_stores_new_audio() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;
    let topic = key("tea");

    store
        .upsert(
            &topic,
            ContentUpdate::script("Script version 1.").with_audio(vec![1, 2, 3], AudioFormat::Mp3),
        )
        .await
        .unwrap();
    store
        .upsert(
            &topic,
            ContentUpdate::script("Script version 2.")
                .with_audio(vec![9, 9], AudioFormat::Flac)
                .replacing_audio(),
        )
        .await
        .unwrap();

    let record = store.get(&topic).await.unwrap().unwrap();
    assert_eq!(record.audio, Some(vec![9, 9]));
    assert_eq!(record.audio_format, Some(AudioFormat::Flac));
}

#[tokio::test]
async fn repeated_upsert_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;
    let topic = key("rivers");
    let update = ContentUpdate::script("Water flows.").with_audio(vec![7; 16], AudioFormat::Wav);

    store.upsert(&topic, update.clone()).await.unwrap();
    let first = store.get(&topic).await.unwrap().unwrap();
    store.upsert(&topic, update).await.unwrap();
    let second = store.get(&topic).await.unwrap().unwrap();

    assert_eq!(first.script, second.script);
    assert_eq!(first.audio, second.audio);
    assert_eq!(first.audio_format, second.audio_format);
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn overwrite_keeps_created_at_and_moves_updated_at() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;
    let topic = key("volcanoes");

    store
        .upsert(&topic, ContentUpdate::script("Old."))
        .await
        .unwrap();
    let before = store.get(&topic).await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    store
        .upsert(&topic, ContentUpdate::script("New."))
        .await
        .unwrap();
    let after = store.get(&topic).await.unwrap().unwrap();

    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.script.as_deref(), Some("New."));
}

#[tokio::test]
async fn keys_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;

    store
        .upsert(&key("alpha"), ContentUpdate::script("A."))
        .await
        .unwrap();
    store
        .upsert(&key("beta"), ContentUpdate::script("B."))
        .await
        .unwrap();

    assert_eq!(
        store.get(&key("alpha")).await.unwrap().unwrap().script.as_deref(),
        Some("A.")
    );
    assert_eq!(
        store.get(&key("beta")).await.unwrap().unwrap().script.as_deref(),
        Some("B.")
    );
}

#[tokio::test]
async fn normalized_variants_share_a_record() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;

    store
        .upsert(&key("Cooking-Tips"), ContentUpdate::script("Taste as you go."))
        .await
        .unwrap();

    let record = store.get(&key("cooking%20tips")).await.unwrap();
    assert_eq!(
        record.and_then(|r| r.script).as_deref(),
        Some("Taste as you go.")
    );
}

#[tokio::test]
async fn key_with_literal_percent_reads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;
    let topic = key("100%2541");
    assert_eq!(topic.as_str(), "100%41");

    store
        .upsert(&topic, ContentUpdate::script("Percentages explained."))
        .await
        .unwrap();

    let record = store.get(&topic).await.unwrap().unwrap();
    assert_eq!(record.key, topic);
}

// ============================================================================
// Durability
// ============================================================================

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let topic = key("gardening");

    {
        let (db, store) = open_store(&dir).await;
        store
            .upsert(
                &topic,
                ContentUpdate::script("Water at dawn.").with_audio(vec![4, 5], AudioFormat::Mp3),
            )
            .await
            .unwrap();
        db.close().await;
    }

    let (_db, store) = open_store(&dir).await;
    let record = store.get(&topic).await.unwrap().expect("persisted record");
    assert!(record.is_servable());
    assert!(record.has_audio());
}

#[tokio::test]
async fn concurrent_upserts_leave_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let (_db, store) = open_store(&dir).await;
    let topic = key("parallel");

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        let topic = topic.clone();
        handles.push(tokio::spawn(async move {
            store
                .upsert(&topic, ContentUpdate::script(format!("Version {i}.")))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 1);
    let script = store.get(&topic).await.unwrap().unwrap().script.unwrap();
    assert!(script.starts_with("Version "));
}
