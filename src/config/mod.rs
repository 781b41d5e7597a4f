use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    booking::PricingPolicy,
    currency::{CurrencyCode, LocaleConfig},
    errors::{BookingError, Result},
    listing::Listing,
    utils::{app_data_dir, ensure_dir},
};

const CONFIG_FILE: &str = "config.json";
/// Upper bound for `nightly_rate` and `cleaning_fee`.
pub const MAX_AMOUNT: u64 = 1_000_000_000;
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub pricing: PricingPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            locale: LocaleConfig::default(),
            pricing: PricingPolicy::default(),
            listing_file: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "currency",
        "locale",
        "nightly_rate",
        "cleaning_fee",
        "service_fee_bps",
        "listing_file",
    ];

    /// Updates one setting from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(BookingError::Config(format!(
                        "currency must be a three-letter code, got `{}`",
                        value
                    )));
                }
                self.currency = CurrencyCode::new(value);
            }
            "locale" => {
                self.locale.language_tag = value.to_string();
                self.locale.grouping_separator = grouping_for(value);
            }
            "nightly_rate" => self.pricing.nightly_rate = parse_amount(key, value)?,
            "cleaning_fee" => self.pricing.cleaning_fee = parse_amount(key, value)?,
            "service_fee_bps" => {
                let bps = parse_whole(key, value)?;
                self.pricing.service_fee_bps = u32::try_from(bps)
                    .ok()
                    .filter(|bps| *bps <= 10_000)
                    .ok_or_else(|| {
                        BookingError::Config("service_fee_bps must be between 0 and 10000".into())
                    })?;
            }
            "listing_file" => {
                self.listing_file = if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(BookingError::Config(format!(
                    "unknown setting `{}` (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Listing content from `listing_file`, or the built-in listing.
    pub fn load_listing(&self) -> Result<Listing> {
        match &self.listing_file {
            Some(path) => Listing::load(path),
            None => Ok(Listing::default()),
        }
    }
}

fn parse_amount(key: &str, value: &str) -> Result<u64> {
    let amount = parse_whole(key, value)?;
    if amount > MAX_AMOUNT {
        return Err(BookingError::Config(format!(
            "{} must be at most {}, got `{}`",
            key, MAX_AMOUNT, value
        )));
    }
    Ok(amount)
}

fn parse_whole(key: &str, value: &str) -> Result<u64> {
    value.parse::<u64>().map_err(|_| {
        BookingError::Config(format!(
            "{} must be a non-negative whole number, got `{}`",
            key, value
        ))
    })
}

fn grouping_for(language_tag: &str) -> char {
    match language_tag.split(['-', '_']).next().unwrap_or_default() {
        "de" | "es" | "it" | "nl" | "pt" => '.',
        "fr" => ' ',
        _ => ',',
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pricing.nightly_rate, 450);
        assert_eq!(config.currency.as_str(), "EUR");
    }

    #[test]
    fn save_then_load_preserves_pricing() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set_value("nightly_rate", "500").unwrap();
        config.set_value("service_fee_bps", "1000").unwrap();
        manager.save(&config).unwrap();
        assert!(!tmp_path(manager.path()).exists());
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.pricing.nightly_rate, 500);
        assert_eq!(loaded.pricing.service_fee_bps, 1000);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "currency": "USD" }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency.as_str(), "USD");
        assert_eq!(config.pricing, PricingPolicy::default());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut config = Config::default();
        assert!(config.set_value("nightly_rate", "-5").is_err());
        assert!(config.set_value("service_fee_bps", "20000").is_err());
        assert!(config.set_value("currency", "euro").is_err());
        assert!(config.set_value("pets", "yes").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        let mut config = Config::default();
        let err = config
            .set_value("nightly_rate", "18446744073709551615")
            .unwrap_err();
        assert!(matches!(err, BookingError::Config(_)));
        assert!(config.set_value("cleaning_fee", "1000000001").is_err());
        assert_eq!(config, Config::default());

        config.set_value("nightly_rate", "1000000000").unwrap();
        let breakdown = config.pricing.breakdown(
            chrono::NaiveDate::from_ymd_opt(2025, 6, 1),
            chrono::NaiveDate::from_ymd_opt(2025, 6, 6),
        );
        assert_eq!(breakdown.base_total, 5_000_000_000);
    }

    #[test]
    fn locale_sets_grouping_separator() {
        let mut config = Config::default();
        config.set_value("locale", "es-ES").unwrap();
        assert_eq!(config.locale.grouping_separator, '.');
    }
}
