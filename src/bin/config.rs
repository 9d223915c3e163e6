//! Fields Config CLI
//!
//! View and manage field configuration, and check values against configured
//! vocabularies.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use familiar_fields::vocabulary::{set_registry, Registry};
use familiar_fields::{Field, FieldsConfig, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fields-config")]
#[command(about = "View and manage field configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path (default: fields.toml)
        #[arg(short, long, default_value = "fields.toml")]
        output: String,
    },

    /// Validate configuration
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Check a value against a configured vocabulary
    Check {
        /// Vocabulary name
        #[arg(long)]
        vocabulary: String,

        /// Value to check; JSON literals (1, true, "1") keep their type
        value: String,

        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load(config: Option<&str>) -> anyhow::Result<FieldsConfig> {
    let cfg = FieldsConfig::load_from(config).context("failed to load configuration")?;
    init_logging(&cfg.logging.filter);
    Ok(cfg)
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = load(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Fields Configuration\n");
                println!("Logging:");
                println!("  Filter: {}", cfg.logging.filter);

                println!("\nRegistry:");
                println!("  Suggest threshold: {}", cfg.registry.suggest_threshold);
                println!("  Install global: {}", cfg.registry.install_global);

                if !cfg.vocabularies.entries.is_empty() {
                    println!("\nVocabularies:");
                    for (name, values) in &cfg.vocabularies.entries {
                        let values: Vec<String> = values.iter().map(|v| Value::from(v).to_string()).collect();
                        println!("  {} = [{}]", name, values.join(", "));
                    }
                }
            }
        }

        Commands::Init { output } => {
            init_logging("info");
            let cfg = FieldsConfig::default();
            cfg.save(&output)
                .with_context(|| format!("failed to write {}", output))?;
            println!("✅ Created config file: {}", output);
        }

        Commands::Validate { config } => match FieldsConfig::load_from(config.as_deref()) {
            Ok(cfg) => {
                init_logging(&cfg.logging.filter);
                let registry = Registry::from_config(&cfg)?;
                println!("✅ Configuration is valid");
                println!("   Logging: {}", cfg.logging.filter);
                println!("   Vocabularies: {}", registry.names().len());
            }
            Err(e) => {
                eprintln!("❌ Configuration error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Check {
            vocabulary,
            value,
            config,
        } => {
            let cfg = load(config.as_deref())?;
            let registry = Arc::new(Registry::from_config(&cfg)?);

            let mut builder = Field::choice().name(vocabulary.as_str()).vocabulary(vocabulary.as_str());
            if cfg.registry.install_global {
                set_registry(registry);
            } else {
                builder = builder.registry(registry);
            }
            let field = builder.build()?;

            let candidate = parse_value(&value);
            debug!(vocabulary = %vocabulary, value = %candidate, "Checking value");
            match field.validate(&candidate) {
                Ok(()) => println!("✅ {} is in '{}'", candidate, vocabulary),
                Err(e) => {
                    let error = e.into_validation()?;
                    println!("{}", serde_json::to_string_pretty(&error.report())?);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
