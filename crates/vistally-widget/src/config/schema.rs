use serde::Deserialize;
use vistally_core::error::{Result, VistallyError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetConfig {
    pub version: u32,

    pub store: StoreSection,

    #[serde(default)]
    pub widget: WidgetSection,
}

impl WidgetConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VistallyError::BadConfig(
                "version must be 1".into(),
            ));
        }

        self.store.validate()?;
        self.widget.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    pub api_key: String,

    pub auth_domain: String,

    pub database_url: String,

    #[serde(default = "default_cas_max_retries")]
    pub cas_max_retries: u32,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(VistallyError::BadConfig(
                "store.api_key must not be empty".into(),
            ));
        }
        if self.auth_domain.is_empty() {
            return Err(VistallyError::BadConfig(
                "store.auth_domain must not be empty".into(),
            ));
        }
        if !self.database_url.starts_with("https://") && !self.database_url.starts_with("http://") {
            return Err(VistallyError::BadConfig(
                "store.database_url must be an http(s) endpoint".into(),
            ));
        }
        if !(1..=64).contains(&self.cas_max_retries) {
            return Err(VistallyError::BadConfig(
                "store.cas_max_retries must be between 1 and 64".into(),
            ));
        }
        if !(100..=120_000).contains(&self.request_timeout_ms) {
            return Err(VistallyError::BadConfig(
                "store.request_timeout_ms must be between 100 and 120000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetSection {
    #[serde(default = "default_site_selector")]
    pub site_selector: String,

    #[serde(default = "default_page_selector")]
    pub page_selector: String,
}

impl Default for WidgetSection {
    fn default() -> Self {
        Self {
            site_selector: default_site_selector(),
            page_selector: default_page_selector(),
        }
    }
}

impl WidgetSection {
    pub fn validate(&self) -> Result<()> {
        if self.site_selector.is_empty() || self.page_selector.is_empty() {
            return Err(VistallyError::BadConfig(
                "widget selectors must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_site_selector() -> String {
    "#visits .count".into()
}
fn default_page_selector() -> String {
    "#pageviews .count".into()
}
fn default_cas_max_retries() -> u32 {
    8
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
