use std::path::{Path, PathBuf};

use common::{
    chart::{ChartModel, prepare},
    config::Config,
    layout::SlotKey,
};
use eyre::{Context, Result};
use tracing::debug;

pub fn load_config(config_file: &Path, root: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load(config_file)?;
    if let Some(root) = root {
        debug!("Overriding root path with {}", root.display());
        config.root_path = root;
    }
    debug!(
        "Config {}: {} input files under {}",
        config.name,
        config.file_names.len(),
        config.root_path.display()
    );
    Ok(config)
}

pub fn run_plot(config_file: &Path, root: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_file, root)?;
    let model = prepare(&config).wrap_err("Prepare comparison chart")?;
    let path = perf_comparison::render(&model, &config).wrap_err("Render comparison chart")?;
    println!("Plot written to {}", path.display());
    Ok(())
}

pub fn print_chart(config_file: &Path, root: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config_file, root)?;
    let model = prepare(&config).wrap_err("Prepare comparison chart")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print!("{}", format_table(&model));
    }
    Ok(())
}

fn format_table(model: &ChartModel) -> String {
    let mut out = format!(
        "{}: {} panels, {} bars each, y range {:.3}..{:.3} (log)\n",
        model.name,
        model.panels.len(),
        model.bars_per_panel().unwrap_or(0),
        model.y_range.0,
        model.y_range.1
    );
    for panel in &model.panels {
        out.push_str(&format!("[{} / size {}]\n", panel.experiment, panel.size));
        for bar in &panel.bars {
            let kind = match bar.key {
                SlotKey::NativeOpt | SlotKey::Io => "baseline",
                SlotKey::Comparison { .. } => "variant",
            };
            out.push_str(&format!(
                "  {:>3} {:>8.3} {:<9} {:<40} {:>12}\n",
                bar.offset, bar.x, kind, bar.legend, bar.label
            ));
        }
    }
    out
}
