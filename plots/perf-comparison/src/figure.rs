use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Context, ContextCompat, Result};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Bitmap,
}

/// Output image being drawn.
///
/// Drawing goes to a hidden staging file next to the target, [`Figure::save`]
/// moves it into place. Dropping an unsaved figure removes the staging file, so
/// a failed render never leaves a partial image behind.
#[derive(Debug)]
pub struct Figure {
    target: PathBuf,
    staging: PathBuf,
    saved: bool,
}

impl Figure {
    pub fn open(target: &Path) -> Result<Self> {
        let file_name = target
            .file_name()
            .and_then(|s| s.to_str())
            .context(format!("Invalid output path {}", target.display()))?;
        let staging = target.with_file_name(format!(".{file_name}.partial"));
        let staging = match target.extension() {
            // the bitmap encoder picks the image format from the extension
            Some(ext) => staging.with_extension(format!("partial.{}", ext.to_string_lossy())),
            None => staging,
        };
        if staging.exists() {
            fs::remove_file(&staging)
                .wrap_err_with(|| format!("Remove stale {}", staging.display()))?;
        }
        debug!("Drawing {} via {}", target.display(), staging.display());
        Ok(Self {
            target: target.to_path_buf(),
            staging,
            saved: false,
        })
    }

    pub fn format(&self) -> OutputFormat {
        match self.target.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Bitmap,
        }
    }

    pub fn staging_path(&self) -> &Path {
        &self.staging
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn save(mut self) -> Result<PathBuf> {
        fs::rename(&self.staging, &self.target).wrap_err_with(|| {
            format!(
                "Move {} to {}",
                self.staging.display(),
                self.target.display()
            )
        })?;
        self.saved = true;
        Ok(self.target.clone())
    }
}

impl Drop for Figure {
    fn drop(&mut self) {
        if !self.saved && self.staging.exists() {
            debug!("Discarding unsaved {}", self.staging.display());
            _ = fs::remove_file(&self.staging);
        }
    }
}
