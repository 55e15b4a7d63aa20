use crate::commands;
use crate::infra::{parse_instant_arg, parse_status};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use job_tracker::config::AppConfig;
use job_tracker::error::AppError;
use job_tracker::telemetry;
use job_tracker::tracker::{ApplicationStatus, DateBucket, FilterCriteria};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "job-tracker",
    about = "Track job applications, deadlines, and follow-ups from the command line",
    version
)]
pub(crate) struct Cli {
    /// Directory holding the application collection (overrides APP_DATA_DIR)
    #[arg(long, global = true)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Log filter such as `info` or `job_tracker=debug` (overrides APP_LOG_LEVEL)
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,
    /// Evaluate dates as of this day or instant instead of the system clock
    #[arg(long, global = true, value_parser = parse_instant_arg)]
    pub(crate) now: Option<DateTime<Utc>>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Record a new application
    Add(AddArgs),
    /// List applications, optionally filtered
    List(ListArgs),
    /// Show one application with its deadline and follow-up indicators
    Show(IdArgs),
    /// Change fields of an existing application
    Update(UpdateArgs),
    /// Delete an application
    Delete(IdArgs),
    /// Totals, response rate, status breakdown, and upcoming dates
    Stats(StatsArgs),
    /// Follow-ups due today or earlier
    Reminders,
    /// Distinct sources and tags in the collection
    Facets,
    /// Export the (filtered) collection as CSV
    Export(ExportArgs),
    /// How much data is stored and when it last changed
    Storage,
    /// Remove every stored application
    Clear(ClearArgs),
}

/// Filters shared by `list` and `export`.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FilterArgs {
    /// Case-insensitive text matched against company, title, notes, and tags
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Exact status
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ApplicationStatus>,
    /// Exact source, case-sensitive
    #[arg(long)]
    pub(crate) source: Option<String>,
    /// Exact tag
    #[arg(long)]
    pub(crate) tag: Option<String>,
    /// today, week, month, or quarter; unrecognized names filter nothing
    #[arg(long = "date")]
    pub(crate) date_bucket: Option<String>,
}

impl FilterArgs {
    pub(crate) fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_text: self.search.clone(),
            status: self.status,
            source: self.source.clone(),
            tag: self.tag.clone(),
            date_bucket: self.date_bucket.as_deref().and_then(DateBucket::parse),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct AddArgs {
    #[arg(long)]
    pub(crate) company: String,
    #[arg(long = "title")]
    pub(crate) job_title: String,
    /// Defaults to Wishlist
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ApplicationStatus>,
    /// Where the posting was found
    #[arg(long)]
    pub(crate) source: Option<String>,
    /// Application deadline (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub(crate) deadline: Option<String>,
    /// When to follow up (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub(crate) follow_up: Option<String>,
    #[arg(long)]
    pub(crate) notes: Option<String>,
    #[arg(long)]
    pub(crate) resume_url: Option<String>,
    /// Tag to attach; repeat for several
    #[arg(long = "tag")]
    pub(crate) tags: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Print JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct IdArgs {
    /// Application id as shown by `list`
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct UpdateArgs {
    /// Application id as shown by `list`
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) company: Option<String>,
    #[arg(long = "title")]
    pub(crate) job_title: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ApplicationStatus>,
    #[arg(long)]
    pub(crate) source: Option<String>,
    #[arg(long, conflicts_with = "clear_deadline")]
    pub(crate) deadline: Option<String>,
    #[arg(long)]
    pub(crate) clear_deadline: bool,
    #[arg(long, conflicts_with = "clear_follow_up")]
    pub(crate) follow_up: Option<String>,
    #[arg(long)]
    pub(crate) clear_follow_up: bool,
    #[arg(long)]
    pub(crate) notes: Option<String>,
    #[arg(long, conflicts_with = "clear_resume_url")]
    pub(crate) resume_url: Option<String>,
    #[arg(long)]
    pub(crate) clear_resume_url: bool,
    /// Tag to add; repeat for several
    #[arg(long = "tag")]
    pub(crate) add_tags: Vec<String>,
    /// Tag to remove; repeat for several
    #[arg(long = "untag")]
    pub(crate) remove_tags: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Destination file (defaults to job-applications-YYYY-MM-DD.csv)
    #[arg(long, conflicts_with = "stdout")]
    pub(crate) output: Option<PathBuf>,
    /// Write the CSV to standard output
    #[arg(long)]
    pub(crate) stdout: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ClearArgs {
    /// Confirm removal of all data
    #[arg(long)]
    pub(crate) yes: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    execute(cli)
}

pub(crate) fn execute(cli: Cli) -> Result<(), AppError> {
    let Cli {
        data_dir,
        log_level,
        now,
        command,
    } = cli;

    let mut config = AppConfig::load()?;
    if let Some(data_dir) = data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(log_level) = log_level {
        config.telemetry.log_level = log_level;
    }

    telemetry::init(&config.telemetry)?;
    debug!(
        environment = ?config.environment,
        data_dir = %config.storage.data_dir.display(),
        "job tracker starting"
    );

    let repository = crate::infra::open_repository(&config, now);

    match command {
        Command::Add(args) => commands::add(&repository, args),
        Command::List(args) => commands::list(&repository, args),
        Command::Show(args) => commands::show(&repository, args),
        Command::Update(args) => commands::update(&repository, args),
        Command::Delete(args) => commands::delete(&repository, args),
        Command::Stats(args) => commands::stats(&repository, args),
        Command::Reminders => commands::reminders(&repository),
        Command::Facets => commands::facets(&repository),
        Command::Export(args) => commands::export(&repository, args),
        Command::Storage => commands::storage(&repository),
        Command::Clear(args) => commands::clear(&repository, args),
    }
}
