use std::path::{Path, PathBuf};

use eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BAR_WIDTH: f64 = 0.15;
pub const DEFAULT_DPI: u32 = 500;
pub const DEFAULT_FIGURE_SIZE: (f64, f64) = (20.0, 15.0);
pub const DEFAULT_OUTPUT_FILENAME: &str = "e1_e3_e5_performance_comparison_log_scale.png";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_name")]
    pub name: String,
    pub root_path: PathBuf,
    pub file_names: Vec<InputFile>,
    #[serde(default)]
    pub baseline_names: BaselineNames,
    /// File whose io / native opt rows are used as reference bars, defaults to the first entry
    #[serde(default)]
    pub baseline_file: Option<String>,
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    /// Width and height in inches
    #[serde(default = "default_figure_size")]
    pub figure_size: (f64, f64),
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
}

/// One experiment run: the csv file stem and the short label used in the legend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub file: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineNames {
    pub io: String,
    pub native_opt: String,
}

impl Default for BaselineNames {
    fn default() -> Self {
        Self {
            io: "io".to_owned(),
            native_opt: "native opt".to_owned(),
        }
    }
}

impl BaselineNames {
    pub fn all(&self) -> [&str; 2] {
        [&self.io, &self.native_opt]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.io == name || self.native_opt == name
    }
}

impl InputFile {
    pub fn new(file: &str, label: &str) -> Self {
        Self {
            file: file.to_owned(),
            label: label.to_owned(),
        }
    }

    pub fn path(&self, root: &Path) -> PathBuf {
        if self.file.ends_with(".csv") {
            root.join(&self.file)
        } else {
            root.join(format!("{}.csv", self.file))
        }
    }
}

fn default_name() -> String {
    "performance comparison".to_owned()
}

fn default_bar_width() -> f64 {
    DEFAULT_BAR_WIDTH
}

fn default_figure_size() -> (f64, f64) {
    DEFAULT_FIGURE_SIZE
}

fn default_dpi() -> u32 {
    DEFAULT_DPI
}

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_owned()
}

impl Config {
    pub fn new(root_path: impl Into<PathBuf>, file_names: Vec<InputFile>) -> Self {
        Self {
            name: default_name(),
            root_path: root_path.into(),
            file_names,
            baseline_names: BaselineNames::default(),
            baseline_file: None,
            bar_width: DEFAULT_BAR_WIDTH,
            figure_size: DEFAULT_FIGURE_SIZE,
            dpi: DEFAULT_DPI,
            output_filename: DEFAULT_OUTPUT_FILENAME.to_owned(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Read config {}", path.display()))?;
        let config: Config = serde_yml::from_str(&data)
            .wrap_err_with(|| format!("Parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_names.is_empty() {
            bail!("Config {} lists no input files", self.name);
        }
        if !(self.bar_width > 0.0) {
            bail!("bar_width must be positive, got {}", self.bar_width);
        }
        if !(self.figure_size.0 > 0.0 && self.figure_size.1 > 0.0) {
            bail!("figure_size must be positive, got {:?}", self.figure_size);
        }
        if self.dpi == 0 {
            bail!("dpi must be positive");
        }
        if self.baseline_names.io == self.baseline_names.native_opt {
            bail!(
                "Baseline names must differ, both are '{}'",
                self.baseline_names.io
            );
        }
        if let Some(baseline_file) = &self.baseline_file
            && !self.file_names.iter().any(|f| &f.file == baseline_file)
        {
            bail!("baseline_file '{baseline_file}' is not one of file_names");
        }
        Ok(())
    }

    /// Source file providing the reference bars
    pub fn baseline_source(&self) -> &str {
        match &self.baseline_file {
            Some(file) => file,
            None => &self.file_names[0].file,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.root_path.join(&self.output_filename)
    }
}
