//! Scriptcast CLI
//!
//! Generates or retrieves the spoken script for a topic, inspects the
//! content store and checks the upstream services.

#![allow(clippy::print_stdout)]

mod app;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use application::ports::{ContentStorePort, ScriptGeneratorPort, SpeechSynthesizerPort};
use clap::{Parser, Subcommand};
use domain::{OutcomeStatus, TopicKey, VerbosityProfile};
use infrastructure::{AppConfig, InferenceScriptGenerator, SpeechSynthesizerAdapter};

/// Scriptcast CLI
#[derive(Parser)]
#[command(name = "scriptcast-cli")]
#[command(author, version, about = "Generate-or-retrieve spoken scripts", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.toml if present)
    #[arg(short, long, global = true, env = "SCRIPTCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Return the stored script for a topic, generating it first if needed
    ///
    /// Example: scriptcast-cli generate cooking-tips --audio-out tips.mp3
    Generate {
        /// Topic to generate (e.g., "cooking tips" or "cooking-tips")
        topic: String,

        /// Treat TOPIC as a request path and use its first segment
        #[arg(long)]
        path: bool,

        /// Override the configured verbosity profile (short or long)
        #[arg(long)]
        profile: Option<VerbosityProfile>,

        /// Regenerate even if the topic is already stored
        #[arg(long)]
        force: bool,

        /// Write the audio payload to this file
        #[arg(long)]
        audio_out: Option<PathBuf>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the stored record for a topic without generating anything
    Show {
        /// Topic to look up
        topic: String,

        /// Treat TOPIC as a request path and use its first segment
        #[arg(long)]
        path: bool,

        /// Write the stored audio to this file
        #[arg(long)]
        audio_out: Option<PathBuf>,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply pending database migrations and exit
    Migrate,

    /// Check that the inference and speech upstreams are reachable
    Health,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Normalize the topic argument
fn topic_key(topic: &str, as_path: bool) -> anyhow::Result<TopicKey> {
    let key = if as_path {
        TopicKey::from_path(topic)
    } else {
        TopicKey::new(topic)
    };
    key.with_context(|| format!("invalid topic '{topic}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.logging.filter = filter.to_string();
    }
    infrastructure::init_logging(&config.logging)?;

    match cli.command {
        Commands::Generate {
            topic,
            path,
            profile,
            force,
            audio_out,
            json,
        } => {
            let key = topic_key(&topic, path)?;
            let (_db, store) = app::open_store(&config).await?;
            let service = app::build_service(&config, store)?;
            let profile = profile.unwrap_or(config.generation.profile);

            let outcome = if force {
                service.force_regenerate_with_profile(&key, profile).await
            } else {
                service
                    .generate_or_retrieve_with_profile(&key, profile)
                    .await
            };

            if let (Some(target), Some(audio)) = (&audio_out, &outcome.audio) {
                tokio::fs::write(target, &audio.data)
                    .await
                    .with_context(|| format!("failed to write {}", target.display()))?;
            }

            if json {
                println!("{}", output::outcome_json(&outcome)?);
            } else {
                output::print_outcome(&outcome, audio_out.as_deref());
            }

            if outcome.status() == OutcomeStatus::Failed {
                std::process::exit(1);
            }
        },

        Commands::Show {
            topic,
            path,
            audio_out,
            json,
        } => {
            let key = topic_key(&topic, path)?;
            let (_db, store) = app::open_store(&config).await?;
            let record = store.get(&key).await?;

            let Some(record) = record else {
                println!("❌ No record for '{key}'");
                std::process::exit(1);
            };

            if let (Some(target), Some(audio)) = (&audio_out, &record.audio) {
                tokio::fs::write(target, audio)
                    .await
                    .with_context(|| format!("failed to write {}", target.display()))?;
            }

            if json {
                println!("{}", output::record_json(&record)?);
            } else {
                output::print_record(&record, audio_out.as_deref());
            }
        },

        Commands::Migrate => {
            config.database.run_migrations = true;
            let (db, store) = app::open_store(&config).await?;
            let records = store.count().await?;
            db.close().await;
            println!("✅ Migrations applied to {} ({records} records)", config.database.path);
        },

        Commands::Health => {
            let generator = InferenceScriptGenerator::new(config.inference.clone())?;
            let inference_ok = generator.is_healthy().await;
            println!(
                "{} inference ({})",
                output::health_mark(inference_ok),
                config.inference.base_url
            );

            let speech_ok = match SpeechSynthesizerAdapter::new(config.speech.clone()) {
                Ok(synthesizer) => {
                    let ok = synthesizer.is_healthy().await;
                    println!(
                        "{} speech ({}, max {} chars)",
                        output::health_mark(ok),
                        config.speech.openai_base_url,
                        synthesizer.max_input_chars()
                    );
                    ok
                },
                Err(e) => {
                    println!("{} speech: {e}", output::health_mark(false));
                    false
                },
            };

            if !(inference_ok && speech_ok) {
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_verbosity_zero_keeps_config() {
        assert_eq!(log_filter_from_verbosity(0), None);
    }

    #[test]
    fn log_filter_verbosity_levels() {
        assert_eq!(log_filter_from_verbosity(1), Some("info"));
        assert_eq!(log_filter_from_verbosity(2), Some("debug"));
        assert_eq!(log_filter_from_verbosity(3), Some("trace"));
        assert_eq!(log_filter_from_verbosity(10), Some("trace"));
    }

    #[test]
    fn topic_from_plain_argument() {
        let key = topic_key("Cooking-Tips", false).unwrap();
        assert_eq!(key.as_str(), "cooking tips");
    }

    #[test]
    fn topic_from_path_uses_first_segment() {
        let key = topic_key("/cooking-tips/page/2", true).unwrap();
        assert_eq!(key.as_str(), "cooking tips");
    }

    #[test]
    fn blank_topic_is_rejected() {
        assert!(topic_key(" - ", false).is_err());
    }

    #[test]
    fn cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "scriptcast-cli",
            "generate",
            "tea",
            "--profile",
            "long",
            "--force",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                topic,
                profile,
                force,
                json,
                ..
            } => {
                assert_eq!(topic, "tea");
                assert_eq!(profile, Some(VerbosityProfile::Long));
                assert!(force);
                assert!(json);
            },
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn cli_rejects_unknown_profile() {
        let result =
            Cli::try_parse_from(["scriptcast-cli", "generate", "tea", "--profile", "medium"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["scriptcast-cli", "migrate", "--config", "/etc/scriptcast.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/scriptcast.toml")));
        assert!(matches!(cli.command, Commands::Migrate));
    }
}
