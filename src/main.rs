use anyhow::Result;
use clap::{Parser, Subcommand};

use insights_store::cli::{compact, list, metadata, project, record, summary, workflow};
use insights_store::config::Config;
use insights_store::store::{InsightsStore, OWNER_ROLE};
use insights_store::telemetry;

#[derive(Parser)]
#[command(name = "insights")]
#[command(about = "Record and inspect workflow insights")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "insights.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Workflow management
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },

    /// Project management
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Record a raw insight event
    Record {
        /// Workflow ID
        workflow: String,
        /// Event type (success, failure, runtime_ms, time_saved_min)
        event_type: String,
        value: i64,
        /// Event time as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Record a compacted (per-period) insight event
    Compact {
        /// Workflow ID
        workflow: String,
        /// Event type (success, failure, runtime_ms, time_saved_min)
        event_type: String,
        value: i64,
        /// Any instant inside the period, RFC 3339
        period_start: String,
        /// Period unit (hour, day, week)
        #[arg(long)]
        period: Option<String>,
    },

    /// Show the insights metadata of a workflow, creating it if missing
    Metadata {
        /// Workflow ID
        workflow: String,
    },

    /// List recorded events
    List {
        #[command(subcommand)]
        command: ListCommands,
    },

    /// Show totals over raw and compacted events
    Summary {
        /// Start of the window as RFC 3339 (defaults to 7 days ago)
        #[arg(long)]
        since: Option<String>,
    },
}

#[derive(Subcommand)]
enum WorkflowCommands {
    /// Register a workflow
    Create {
        name: String,
        /// Explicit workflow ID (defaults to a new UUID)
        #[arg(long)]
        id: Option<String>,
    },
    /// Rename a workflow
    Rename { id: String, name: String },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a new project
    Create {
        name: String,
        /// Project type (personal, team)
        #[arg(long, default_value = "team")]
        project_type: String,
    },
    /// Share a workflow with a project
    Share {
        /// Workflow ID
        workflow: String,
        /// Project ID
        project: String,
        #[arg(long, default_value = OWNER_ROLE)]
        role: String,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// Raw events of a workflow
    Raw {
        workflow: String,
        #[arg(long)]
        json: bool,
    },
    /// Compacted events of a workflow
    Periods {
        workflow: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let (config, load_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    telemetry::init_tracing(&config.logging);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, path = %cli.config, "could not load config, using defaults");
    }

    // Initialize store
    let store = InsightsStore::open(&config.database_path())?;

    match cli.command {
        Commands::Workflow { command } => match command {
            WorkflowCommands::Create { name, id } => {
                workflow::create(&store, name, id)?;
            }
            WorkflowCommands::Rename { id, name } => {
                workflow::rename(&store, id, name)?;
            }
        },
        Commands::Project { command } => match command {
            ProjectCommands::Create { name, project_type } => {
                project::create(&store, name, project_type)?;
            }
            ProjectCommands::Share {
                workflow,
                project,
                role,
            } => {
                project::share(&store, workflow, project, role)?;
            }
        },
        Commands::Record {
            workflow,
            event_type,
            value,
            at,
        } => {
            record::run(&store, &workflow, &event_type, value, at.as_deref())?;
        }
        Commands::Compact {
            workflow,
            event_type,
            value,
            period_start,
            period,
        } => {
            compact::run(
                &store,
                &workflow,
                &event_type,
                value,
                &period_start,
                period.as_deref(),
                config.defaults.period_unit,
            )?;
        }
        Commands::Metadata { workflow } => {
            metadata::run(&store, &workflow)?;
        }
        Commands::List { command } => match command {
            ListCommands::Raw { workflow, json } => {
                list::raw(&store, &workflow, json)?;
            }
            ListCommands::Periods { workflow, json } => {
                list::periods(&store, &workflow, json)?;
            }
        },
        Commands::Summary { since } => {
            summary::run(&store, since.as_deref())?;
        }
    }

    Ok(())
}
