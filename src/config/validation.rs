use super::defaults::{MAX_FPS, MIN_FPS};
use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize paths.
    pub fn validate(&mut self) -> Result<()> {
        if let Some(fps) = self.fps {
            if !(MIN_FPS..=MAX_FPS).contains(&fps) {
                bail!("--fps must be between {MIN_FPS} and {MAX_FPS}, got {fps}");
            }
        }

        if self.config_path.as_os_str().is_empty() {
            bail!("--config must not be empty");
        }
        if self.config_path.is_dir() {
            bail!(
                "--config must point to a file, got directory {}",
                self.config_path.display()
            );
        }

        if let Some(path) = &self.interactions_csv {
            validate_log_path(path)?;
        }

        if self.no_logs {
            self.logs = false;
            self.log_content = false;
        }
        Ok(())
    }
}

fn validate_log_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("--interactions-csv must not be empty");
    }
    if path.is_dir() {
        bail!(
            "--interactions-csv must point to a file, got directory {}",
            path.display()
        );
    }
    if path.file_name().is_none() {
        bail!("--interactions-csv must name a file, got {}", path.display());
    }
    Ok(())
}
