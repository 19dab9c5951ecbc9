mod commands;
mod render;

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use eotis_core::config::GridConfig;
use eotis_core::time::{parse_date, parse_timezone};
use eotis_core::{Granularity, GridMetrics, ViewWindow, build_view_window};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "eotis-calendar")]
#[command(about = "Lay out EOTIS Hub calendar events on day, week and month grids")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ViewArgs {
    /// View granularity: day, week or month (defaults to the configured view)
    #[arg(short, long)]
    view: Option<Granularity>,

    /// Reference date (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Timezone used to place events (IANA name, e.g. "Europe/London")
    #[arg(long)]
    timezone: Option<String>,

    /// Pixels per hour on the time grid
    #[arg(long)]
    hour_height: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the days visible in a view
    Window {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Compute event geometry from a JSON event export
    Layout {
        #[command(flatten)]
        view: ViewArgs,

        /// JSON file containing an array of events
        #[arg(short, long)]
        events: PathBuf,

        /// Only lay out events for this student
        #[arg(long)]
        student: Option<String>,

        /// Split overlapping events into side-by-side columns
        #[arg(long)]
        columns: bool,

        /// Print geometry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show where the current-time indicator sits
    Now {
        #[command(flatten)]
        view: ViewArgs,

        /// Print the position as JSON
        #[arg(long)]
        json: bool,
    },
    /// Follow the current-time indicator until interrupted
    Watch {
        #[command(flatten)]
        view: ViewArgs,

        /// Seconds between refreshes (defaults to the configured cadence)
        #[arg(long)]
        refresh_secs: Option<u64>,
    },
    /// Write a commented config file to ~/.config/eotis/calendar.toml
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match cli.command {
        Commands::Window { view } => {
            let config = GridConfig::load()?;
            let (window, _) = resolve_view(&config, &view)?;
            commands::window::run(&window)
        }
        Commands::Layout {
            view,
            events,
            student,
            columns,
            json,
        } => {
            let config = GridConfig::load()?;
            let (window, metrics) = resolve_view(&config, &view)?;
            commands::layout::run(&events, &window, &metrics, student.as_deref(), columns, json)
        }
        Commands::Now { view, json } => {
            let config = GridConfig::load()?;
            let (window, metrics) = resolve_view(&config, &view)?;
            commands::now::run(&window, &metrics, json)
        }
        Commands::Watch { view, refresh_secs } => {
            let config = GridConfig::load()?;
            let (window, metrics) = resolve_view(&config, &view)?;
            let refresh = match refresh_secs {
                Some(0) => anyhow::bail!("--refresh-secs must be at least 1"),
                Some(secs) => std::time::Duration::from_secs(secs),
                None => config.refresh_interval(),
            };
            commands::watch::run(window, metrics, refresh).await
        }
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Build the window and grid scale from config plus command-line overrides.
fn resolve_view(config: &GridConfig, args: &ViewArgs) -> Result<(ViewWindow, GridMetrics)> {
    let timezone = match &args.timezone {
        Some(name) => parse_timezone(name)?,
        None => config.timezone_or(system_timezone())?,
    };

    let reference = match &args.date {
        Some(date) => parse_date(date)?,
        None => Utc::now().with_timezone(&timezone).date_naive(),
    };

    let granularity = args.view.unwrap_or(config.default_view);
    let window = build_view_window(reference, granularity).in_timezone(timezone);

    let mut metrics = config.metrics()?;
    if let Some(hour_height) = args.hour_height {
        metrics.hour_height = hour_height;
        metrics.validate()?;
    }

    tracing::debug!(
        view = %granularity,
        reference = %reference,
        timezone = %timezone,
        hour_height = metrics.hour_height,
        "resolved view"
    );

    Ok((window, metrics))
}

/// System timezone, falling back to UTC when it can't be determined.
fn system_timezone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse().unwrap_or_else(|_| {
            tracing::warn!(timezone = %name, "unrecognized system timezone, using UTC");
            Tz::UTC
        }),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine system timezone, using UTC");
            Tz::UTC
        }
    }
}
