#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    AnalyzeInput, AnalyzeStrategy, ApplyInput, ApplyStrategy, CommandStrategy, InitStrategy,
    InsightsInput, InsightsStrategy, RecordInput, RecordStrategy, ResetStrategy, TemplatesInput,
    TemplatesStrategy, VersionStrategy,
};
use quickfill_core::EntityKind;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "quickfill")]
#[command(about = "Suggest task and project fields from a plain-language description", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest fields for a description
    Analyze {
        /// Free-text description, e.g. "urgent call with Mike tomorrow at 2pm"
        text: String,

        /// Record type the fields are for (task or project)
        #[arg(short, long, default_value = "task")]
        kind: EntityKind,

        /// Use rules and templates only
        #[arg(long)]
        offline: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List templates, or the ones matching a description
    Templates {
        text: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Apply a template to existing field values
    Apply {
        /// Template name (case-insensitive)
        template: String,

        /// Current values as a JSON object, e.g. '{"priority":"High"}'
        #[arg(short, long)]
        fields: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Record a created task or project for usage insights
    Record {
        #[arg(short, long, default_value = "task")]
        kind: EntityKind,

        /// Final values as a JSON object
        #[arg(short, long)]
        fields: String,
    },
    /// Show usage insights and recommendations
    Insights {
        #[arg(long)]
        json: bool,
    },
    /// Clear usage analytics
    Reset,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            text,
            kind,
            offline,
            json,
        } => {
            AnalyzeStrategy
                .execute(AnalyzeInput {
                    text,
                    kind,
                    offline,
                    json,
                })
                .await
        }
        Commands::Templates { text, json } => {
            TemplatesStrategy
                .execute(TemplatesInput { text, json })
                .await
        }
        Commands::Apply {
            template,
            fields,
            json,
        } => {
            ApplyStrategy
                .execute(ApplyInput {
                    template,
                    fields,
                    json,
                })
                .await
        }
        Commands::Record { kind, fields } => {
            RecordStrategy.execute(RecordInput { kind, fields }).await
        }
        Commands::Insights { json } => InsightsStrategy.execute(InsightsInput { json }).await,
        Commands::Reset => ResetStrategy.execute(()).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
