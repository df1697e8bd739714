use clap::{Parser, Subcommand};
use medai_core::constants::DEFAULT_KNOWLEDGE_BASE_PATH;
use medai_core::knowledge::{build_knowledge_base, KnowledgeSources};
use medai_core::{AdviceService, ChatInput, CoreConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medai")]
#[command(about = "Med-AI symptom assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the knowledge base text file from the symptom datasets
    BuildKnowledge {
        /// Directory containing symptom_Description.csv, symptom_precaution.csv and dataset.csv
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Description dataset (overrides the file in --data-dir)
        #[arg(long)]
        description: Option<PathBuf>,
        /// Precaution dataset (overrides the file in --data-dir)
        #[arg(long)]
        precaution: Option<PathBuf>,
        /// Symptom dataset (overrides the file in --data-dir)
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Output path for the knowledge base
        #[arg(long, default_value = DEFAULT_KNOWLEDGE_BASE_PATH)]
        output: PathBuf,
    },
    /// Ask for advice once using the configured provider
    Ask {
        /// Symptoms as the patient would describe them
        symptoms: String,
        /// Illness duration (optional)
        #[arg(long)]
        duration: Option<String>,
        /// Target language code
        #[arg(long, default_value = "en")]
        language: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    dotenvy::from_path("env/.env").ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("medai_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::BuildKnowledge {
            data_dir,
            description,
            precaution,
            dataset,
            output,
        }) => {
            let defaults = KnowledgeSources::in_dir(&data_dir);
            let sources = KnowledgeSources {
                descriptions: description.unwrap_or(defaults.descriptions),
                precautions: precaution.unwrap_or(defaults.precautions),
                symptoms: dataset.unwrap_or(defaults.symptoms),
            };
            let count = build_knowledge_base(&sources, &output)?;
            println!(
                "Knowledge base with {} diseases written to: {}",
                count,
                output.display()
            );
        }
        Some(Commands::Ask {
            symptoms,
            duration,
            language,
        }) => {
            let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;
            let runtime = tokio::runtime::Runtime::new()?;
            let result = runtime.block_on(async {
                let service = AdviceService::from_config(&cfg)?;
                let input = ChatInput {
                    symptoms,
                    duration,
                    language,
                    history: Vec::new(),
                };
                Ok::<_, medai_core::AssistantError>(service.respond(&input).await)
            })?;

            println!("Reply: {}", result.advice);
            if result.translated != result.advice {
                println!("Translated: {}", result.translated);
            }
        }
        None => {
            println!("Use 'medai --help' for commands");
        }
    }

    Ok(())
}
