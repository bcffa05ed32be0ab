use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing::error;
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod report;

/// Library crates whose log level follows RUST_LOG unless set with --log
const MODULES: &[&str] = &["common", "perf_comparison"];

#[derive(Parser)]
#[command(version, about = "Grouped bar chart of benchmark results against io / native baselines")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the comparison chart
    Plot {
        #[arg(short, long, default_value = "config.yaml")]
        config_file: PathBuf,
        /// Directory holding the result csv files, overrides root_path
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
    /// Print the bars that would be drawn
    Print {
        #[arg(short, long, default_value = "config.yaml")]
        config_file: PathBuf,
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Print the chart model as json
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("perf_report={log_level}"));

    if !args.log.is_empty() {
        for log in &args.log {
            env_filter = env_filter.add_directive(log.parse()?);
        }
    }

    for module in MODULES {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_writer(std::io::stderr)
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_writer(non_blocking))
        .init();

    let result = match args.command {
        Commands::Plot { config_file, root } => report::run_plot(&config_file, root),
        Commands::Print {
            config_file,
            root,
            json,
        } => report::print_chart(&config_file, root, json),
    };
    if let Err(err) = result {
        error!("{err:#?}");
        return Err(err);
    }

    Ok(())
}
