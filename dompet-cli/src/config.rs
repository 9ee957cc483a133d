use anyhow::{Context, Result};
use chrono_tz::Tz;
use dompet_client::{ApiConfig, SummaryOptions};
use dompet_core::{parse_timezone, Locale};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::ensure_dompet_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    /// "id-ID" or "en-GB"
    pub locale: String,
    /// IANA zone used to turn backend timestamps into calendar dates
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSection {
                base_url: "http://127.0.0.1:5000".to_string(),
                timeout_secs: 10,
            },
            display: DisplaySection {
                locale: "id-ID".to_string(),
                timezone: "Asia/Jakarta".to_string(),
            },
        }
    }
}

impl Config {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs.max(1)))
    }

    pub fn summary_options(&self) -> Result<SummaryOptions> {
        let locale: Locale = self.display.locale.parse()?;
        let timezone: Tz = parse_timezone(&self.display.timezone)?;
        Ok(SummaryOptions { locale, timezone })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_dompet_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(s.contains("[api]"));
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.api.timeout_secs, 10);
    }

    #[test]
    fn test_summary_options_from_config() {
        let mut cfg = Config::default();
        let opts = cfg.summary_options().unwrap();
        assert_eq!(opts.locale, Locale::Indonesian);

        cfg.display.timezone = "Mars/Olympus".to_string();
        assert!(cfg.summary_options().is_err());
    }

    #[test]
    fn test_zero_timeout_is_bumped() {
        let mut cfg = Config::default();
        cfg.api.timeout_secs = 0;
        assert_eq!(cfg.api_config().timeout, Duration::from_secs(1));
    }
}
