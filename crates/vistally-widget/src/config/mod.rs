//! Widget config loader (strict parsing).

pub mod schema;

use std::fs;

use vistally_core::error::{Result, VistallyError};

pub use schema::{StoreSection, WidgetConfig, WidgetSection};

pub fn load_from_file(path: &str) -> Result<WidgetConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| VistallyError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<WidgetConfig> {
    let cfg: WidgetConfig = serde_yaml::from_str(s)
        .map_err(|e| VistallyError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
