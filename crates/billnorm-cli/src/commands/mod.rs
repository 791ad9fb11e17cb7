//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod items;
pub mod process;

use std::path::Path;

use billnorm_core::BillnormConfig;

/// Load the configuration given with `--config`, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BillnormConfig> {
    match config_path {
        Some(path) => Ok(BillnormConfig::from_file(Path::new(path))?),
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                Ok(BillnormConfig::from_file(&default_path)?)
            } else {
                Ok(BillnormConfig::default())
            }
        }
    }
}
