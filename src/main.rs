//! CLI entry point for the passenger traffic tracker.
//!
//! Provides subcommands for downloading and cleaning the raw feed, and for
//! computing each dashboard view over the processed table.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use hk_passenger_tracker::aggregators::{
    NetFlowGrouping, geo_markers, net_flow, passenger_origin_sums, totals, travel_method_sums,
};
use hk_passenger_tracker::clean::melt_raw;
use hk_passenger_tracker::config::Settings;
use hk_passenger_tracker::dashboard::Dashboard;
use hk_passenger_tracker::fetch::{BasicClient, download_raw_feed};
use hk_passenger_tracker::filter::{self, DateRange, FilterSpec, Selection};
use hk_passenger_tracker::locations;
use hk_passenger_tracker::model::TravelType;
use hk_passenger_tracker::output::{print_json, print_pretty, write_csv, write_json};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "hk_passenger_tracker")]
#[command(about = "Hong Kong cross-border passenger traffic views", long_about = None)]
struct Cli {
    /// Processed passenger table (overrides DATA_PATH)
    #[arg(long, global = true, value_name = "CSV")]
    data: Option<PathBuf>,

    /// Control point coordinate table (overrides LOCATIONS_PATH)
    #[arg(long, global = true, value_name = "CSV")]
    locations: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// First date to include, YYYY-MM-DD (defaults to the earliest date)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date to include, YYYY-MM-DD (defaults to the latest date)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Control point to include; repeat for several, or pass "all"
    #[arg(long = "control-point", value_name = "NAME")]
    control_points: Vec<String>,

    /// Arrival or Departure; repeat for both, or pass "all"
    #[arg(long = "travel-type", value_name = "TYPE")]
    travel_types: Vec<String>,

    /// Fill unset dates from the dashboard's opening window (last 15 days)
    #[arg(long, default_value_t = false)]
    default_window: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum CategoryColumn {
    Origin,
    Method,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the raw daily passenger feed
    Fetch {
        /// Feed URL (overrides SOURCE_URL)
        #[arg(long)]
        url: Option<String>,

        /// Where to store the raw CSV (overrides RAW_DATA_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Reshape the raw feed into the processed passenger table
    Clean {
        /// Raw CSV (overrides RAW_DATA_PATH)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Processed CSV to write (defaults to the data path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the built-in control point coordinates as CSV
    Locations {
        /// Destination (defaults to the locations path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the control points present in the data
    ControlPoints,
    /// Compute every view for a filter
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        /// Break net flow down per control point
        #[arg(long, default_value_t = false)]
        by_control_point: bool,

        /// JSON file to write instead of logging
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Gzip compress the JSON file
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Total passengers and visitor entry volume
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Arrivals minus departures per date
    NetFlow {
        #[command(flatten)]
        filter: FilterArgs,

        /// Break down per control point
        #[arg(long, default_value_t = false)]
        by_control_point: bool,

        /// CSV file to write instead of logging
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Passenger counts per origin or travel method
    Categories {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value_t = CategoryColumn::Origin)]
        column: CategoryColumn,

        /// CSV file to write instead of logging
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Map markers for every known control point
    Map {
        #[command(flatten)]
        filter: FilterArgs,

        /// CSV file to write instead of logging
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("hk_passenger_tracker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let data_path = cli.data.unwrap_or_else(|| settings.data_path.clone());
    let locations_path = cli
        .locations
        .unwrap_or_else(|| settings.locations_path.clone());

    match cli.command {
        Commands::Fetch { url, output } => {
            let url = url.unwrap_or_else(|| settings.source_url.clone());
            let output = output.unwrap_or_else(|| settings.raw_path.clone());
            let client = BasicClient::new()?;
            download_raw_feed(&client, &url, &output).await?;
        }
        Commands::Clean { input, output } => {
            let input = input.unwrap_or_else(|| settings.raw_path.clone());
            let output = output.unwrap_or(data_path);
            clean(&input, &output)?;
        }
        Commands::Locations { output } => {
            let output = output.unwrap_or(locations_path);
            let written = write_csv(&output, &locations::builtin())?;
            info!(path = %output.display(), written, "Location table written");
        }
        Commands::ControlPoints => {
            let dashboard = Dashboard::load(&data_path, &locations_path)?;
            let options = dashboard.control_point_options();
            info!(count = options.len(), "Control points");
            print_json(&options)?;
        }
        Commands::Report {
            filter: args,
            by_control_point,
            output,
            gzip,
        } => {
            let dashboard = Dashboard::load(&data_path, &locations_path)?;
            let spec = filter_spec(&args, &dashboard)?;
            let snapshot = dashboard.snapshot(&spec, grouping(by_control_point));
            print_pretty(&snapshot);

            match output {
                Some(path) => {
                    write_json(&path, &snapshot, gzip)?;
                    info!(path = %path.display(), gzip, "Report written");
                }
                None => print_json(&snapshot)?,
            }
        }
        Commands::Summary { filter: args } => {
            let dashboard = Dashboard::load(&data_path, &locations_path)?;
            let spec = filter_spec(&args, &dashboard)?;
            let view = filter::apply(dashboard.dataset(), &spec);
            let t = totals(&view);
            info!(
                total_passengers = t.total_passengers,
                entry_volume = %format!("{:.8}", t.entry_volume),
                "Summary"
            );
        }
        Commands::NetFlow {
            filter: args,
            by_control_point,
            output,
        } => {
            let dashboard = Dashboard::load(&data_path, &locations_path)?;
            let spec = filter_spec(&args, &dashboard)?;
            let view = filter::apply(dashboard.dataset(), &spec);
            emit_rows(&net_flow(&view, grouping(by_control_point)), output.as_deref())?;
        }
        Commands::Categories {
            filter: args,
            column,
            output,
        } => {
            let dashboard = Dashboard::load(&data_path, &locations_path)?;
            let spec = filter_spec(&args, &dashboard)?;
            let view = filter::apply(dashboard.dataset(), &spec);
            match column {
                CategoryColumn::Origin => {
                    emit_rows(&passenger_origin_sums(&view), output.as_deref())?
                }
                CategoryColumn::Method => emit_rows(&travel_method_sums(&view), output.as_deref())?,
            }
        }
        Commands::Map { filter: args, output } => {
            let dashboard = Dashboard::load(&data_path, &locations_path)?;
            let spec = filter_spec(&args, &dashboard)?;
            let view = filter::apply(dashboard.dataset(), &spec);
            emit_rows(&geo_markers(&view, dashboard.locations()), output.as_deref())?;
        }
    }

    Ok(())
}

fn grouping(by_control_point: bool) -> NetFlowGrouping {
    if by_control_point {
        NetFlowGrouping::DateAndControlPoint
    } else {
        NetFlowGrouping::Date
    }
}

/// Builds the filter from CLI flags. Unknown travel types are rejected here
/// rather than silently matching nothing.
fn filter_spec(args: &FilterArgs, dashboard: &Dashboard) -> Result<FilterSpec> {
    let mut date_range = DateRange::new(args.start, args.end);
    if args.default_window {
        let fallback = dashboard.default_filter().date_range;
        date_range.start = date_range.start.or(fallback.start);
        date_range.end = date_range.end.or(fallback.end);
    }

    let travel_types = match Selection::from_args(&args.travel_types) {
        Selection::All => Selection::All,
        Selection::Only(values) => Selection::only(
            values
                .iter()
                .map(|v| v.parse::<TravelType>())
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    Ok(FilterSpec {
        date_range,
        control_points: Selection::from_args(&args.control_points),
        travel_types,
    })
}

/// Writes row-shaped results to CSV when a path is given, otherwise logs them.
fn emit_rows<T: Serialize>(rows: &[T], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let written = write_csv(path, rows)?;
            info!(path = %path.display(), written, "Rows written");
        }
        None => print_json(&rows)?,
    }
    Ok(())
}

/// Melts the raw feed at `input` into the processed table at `output`.
#[tracing::instrument(fields(input = %input.display(), output = %output.display()), skip(input, output))]
fn clean(input: &Path, output: &Path) -> Result<()> {
    let file =
        std::fs::File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let rows = melt_raw(file)?;
    let written = write_csv(output, &rows)?;
    info!(written, "Processed table written");
    Ok(())
}
