use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_SEARCH_TERMS: &str = "Covid COVID-19 coronavirus";
pub const DEFAULT_CASE_DATA_URL: &str = "https://api.coronavirus.data.gov.uk";
pub const DEFAULT_NEWS_URL: &str = "https://newsapi.org";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Area types the case-data provider understands.
pub const AREA_TYPES: [&str; 6] = ["overview", "nation", "region", "nhsRegion", "utla", "ltla"];

/// Top-level config (config.json / covidash.toml + COVIDASH_* env overrides).
///
/// The flat keys match the legacy `config.json` layout so an existing file
/// loads unchanged; everything else lives in defaulted sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    /// Local area whose statistics fill the left-hand column.
    #[serde(default = "default_area_name")]
    pub area_name: String,
    /// Area type of `area_name`: `ltla`, `utla`, `region` or `nation`.
    #[serde(default = "default_location_type")]
    pub location_type: String,
    /// Nation used for the national column.
    #[serde(default = "default_nation_name")]
    pub nation_name: String,
    /// Where the raw local case-data response is written after each fetch.
    #[serde(default = "default_covid_file_name")]
    pub covid_file_name: String,
    /// News provider API key.
    #[serde(default)]
    pub api_key: String,
    /// Optional log file; stdout only when unset.
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub case_data: CaseDataConfig,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            area_name: default_area_name(),
            location_type: default_location_type(),
            nation_name: default_nation_name(),
            covid_file_name: default_covid_file_name(),
            api_key: String::new(),
            log_file: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            gateway: GatewayConfig::default(),
            news: NewsConfig::default(),
            case_data: CaseDataConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_url")]
    pub base_url: String,
    /// Query string sent as `q`.
    #[serde(default = "default_search_terms")]
    pub search_terms: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_url(),
            search_terms: default_search_terms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDataConfig {
    #[serde(default = "default_case_data_url")]
    pub base_url: String,
}

impl Default for CaseDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_case_data_url(),
        }
    }
}

fn default_area_name() -> String {
    "Exeter".to_string()
}
fn default_location_type() -> String {
    "ltla".to_string()
}
fn default_nation_name() -> String {
    "England".to_string()
}
fn default_covid_file_name() -> String {
    "data.csv".to_string()
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_news_url() -> String {
    DEFAULT_NEWS_URL.to_string()
}
fn default_search_terms() -> String {
    DEFAULT_SEARCH_TERMS.to_string()
}
fn default_case_data_url() -> String {
    DEFAULT_CASE_DATA_URL.to_string()
}

impl DashConfig {
    /// Load config from a JSON or TOML file with COVIDASH_* env var overrides.
    ///
    /// The file format is picked from the extension (`.toml` → TOML, anything
    /// else → JSON). Nested keys are addressed with a double underscore, e.g.
    /// `COVIDASH_GATEWAY__PORT=8080`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path.unwrap_or("config.json");

        let figment = if Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
        {
            Figment::new().merge(Toml::file(path))
        } else {
            Figment::new().merge(Json::file(path))
        };

        let config: DashConfig = figment
            .merge(Env::prefixed("COVIDASH_").split("__"))
            .extract()
            .map_err(|e| DashError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, at the first fetch.
    pub fn validate(&self) -> Result<()> {
        if self.area_name.trim().is_empty() {
            return Err(DashError::Invalid {
                field: "area_name",
                reason: "must not be empty".to_string(),
            });
        }
        if !AREA_TYPES.contains(&self.location_type.as_str()) {
            return Err(DashError::Invalid {
                field: "location_type",
                reason: format!("{:?} is not one of {}", self.location_type, AREA_TYPES.join(", ")),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(DashError::Invalid {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
