use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskweave_application::{FeedbackRequest, build_service};
use taskweave_infrastructure::PlatformConfig;

mod commands;

#[derive(Parser)]
#[command(name = "taskweave")]
#[command(about = "TaskWeave CLI - Multi-Agent Task Execution Platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a new task and run it to the human checkpoint
    Submit {
        /// Free-text task description
        task: String,
    },
    /// Attach human feedback to a suspended task and resume it
    Feedback {
        task_id: String,
        /// Approve the results (finalizes the task)
        #[arg(long)]
        approve: bool,
        /// Reject the results (re-runs with an annotated description)
        #[arg(long)]
        reject: bool,
        /// Free-text feedback
        #[arg(long, default_value = "")]
        feedback: String,
    },
    /// Show a stored task snapshot
    Show { task_id: String },
    /// List stored tasks
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = PlatformConfig::load()?;
    let service = build_service(&config)?;

    match cli.command {
        Commands::Submit { task } => commands::task::submit(&service, &task).await?,
        Commands::Feedback {
            task_id,
            approve,
            reject,
            feedback,
        } => {
            if approve == reject {
                bail!("specify exactly one of --approve or --reject");
            }
            let request = FeedbackRequest {
                approved: approve,
                feedback,
                modifications: serde_json::Map::new(),
            };
            commands::task::feedback(&service, &task_id, request).await?;
        }
        Commands::Show { task_id } => commands::task::show(&service, &task_id).await?,
        Commands::List => commands::task::list(&service).await?,
    }

    Ok(())
}
