//! TOML-based quote configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::PricingError;
use crate::pricing::{PriceCatalog, SUBSCRIPTION_DURATIONS};
use crate::projection::{BatterySelection, FinancialParameters, FinancingMode, QuoteRequest};

/// Top-level quote configuration parsed from TOML.
///
/// Every section has defaults. Load from TOML with
/// [`QuoteConfig::from_toml_file`] or start from [`QuoteConfig::baseline`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteConfig {
    /// Installation being quoted.
    #[serde(default)]
    pub quote: InstallationConfig,
    /// Financial assumptions; unset fields use the default settings.
    #[serde(default)]
    pub parameters: ParametersConfig,
    /// Storage option.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Overrides applied to the built-in price catalog.
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// Installation being quoted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallationConfig {
    /// Estimated first-year production (kWh, must be > 0).
    pub base_production_kwh: f64,
    /// Installed peak power (kWc), must match a priced kit.
    pub peak_power_kwc: f64,
    pub micro_inverters: bool,
}

impl Default for InstallationConfig {
    fn default() -> Self {
        Self {
            base_production_kwh: 5000.0,
            peak_power_kwc: 6.0,
            micro_inverters: false,
        }
    }
}

/// Financial assumptions. `None` falls back to the default settings, except
/// `feed_in_tariff` and `self_consumption_bonus` which come from the
/// catalog tier of the installed power.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParametersConfig {
    pub price_per_kwh: Option<f64>,
    /// Percent, 0 to 100.
    pub self_consumption_pct: Option<f64>,
    pub feed_in_tariff: Option<f64>,
    pub production_indexation_pct: Option<f64>,
    pub energy_revaluation_pct: Option<f64>,
    pub panel_degradation_pct: Option<f64>,
    pub self_consumption_bonus: Option<f64>,
    pub commercial_discount: Option<f64>,
    pub financing_mode: Option<FinancingMode>,
    /// One of 10, 15, 20 or 25.
    pub subscription_years: Option<u32>,
}

/// Storage option kind, read from `battery.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryKind {
    #[default]
    None,
    Virtual,
    MyBattery,
    Physical,
}

/// Storage option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    pub kind: BatteryKind,
    /// Smart Battery capacity (kWh), required for `virtual`.
    pub virtual_capacity_kwh: Option<u32>,
    /// Smart charger option for `virtual`.
    pub smart_charger: bool,
    /// Catalog model name, required for `physical`.
    pub physical_model: Option<String>,
}

/// Overrides applied to the built-in price catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    pub custom_prices: Vec<CustomPriceConfig>,
}

/// Installed price for one kit power, replacing the built-in one.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomPriceConfig {
    pub power_kwc: f64,
    pub price: f64,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"quote.peak_power_kwc"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn pricing(field: &str, err: PricingError) -> Self {
        Self::new(field, err.to_string())
    }
}

impl QuoteConfig {
    /// Returns the baseline quote: 6 kWc, 5000 kWh, paid cash, no battery.
    pub fn baseline() -> Self {
        Self {
            quote: InstallationConfig::default(),
            parameters: ParametersConfig {
                price_per_kwh: Some(0.20),
                self_consumption_pct: Some(40.0),
                feed_in_tariff: Some(0.10),
                production_indexation_pct: Some(0.0),
                energy_revaluation_pct: Some(2.0),
                panel_degradation_pct: Some(-0.5),
                self_consumption_bonus: Some(0.0),
                commercial_discount: Some(0.0),
                financing_mode: Some(FinancingMode::Cash),
                subscription_years: None,
            },
            battery: BatteryConfig::default(),
            pricing: PricingConfig::default(),
        }
    }

    /// Baseline installation rented over 20 years.
    pub fn subscription() -> Self {
        let mut cfg = Self::baseline();
        cfg.parameters.financing_mode = Some(FinancingMode::Subscription);
        cfg.parameters.subscription_years = Some(20);
        cfg
    }

    /// Baseline installation with a 300 kWh Smart Battery.
    pub fn smart_battery() -> Self {
        let mut cfg = Self::baseline();
        cfg.battery = BatteryConfig {
            kind: BatteryKind::Virtual,
            virtual_capacity_kwh: Some(300),
            ..BatteryConfig::default()
        };
        cfg
    }

    /// Baseline installation with MyBattery surplus crediting.
    pub fn mybattery() -> Self {
        let mut cfg = Self::baseline();
        cfg.battery.kind = BatteryKind::MyBattery;
        cfg
    }

    /// Larger installation with a physical battery and micro-inverters.
    pub fn physical_battery() -> Self {
        let mut cfg = Self::baseline();
        cfg.quote = InstallationConfig {
            base_production_kwh: 7500.0,
            peak_power_kwc: 9.0,
            micro_inverters: true,
        };
        cfg.battery = BatteryConfig {
            kind: BatteryKind::Physical,
            physical_model: Some("Storage 10".to_string()),
            ..BatteryConfig::default()
        };
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &[
        "baseline",
        "subscription",
        "smart_battery",
        "mybattery",
        "physical_battery",
    ];

    /// Loads a quote from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "subscription" => Ok(Self::subscription()),
            "smart_battery" => Ok(Self::smart_battery()),
            "mybattery" => Ok(Self::mybattery()),
            "physical_battery" => Ok(Self::physical_battery()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a quote from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a quote from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Built-in catalog with the configured custom prices applied.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` pointing at the first invalid custom price.
    pub fn catalog(&self) -> Result<PriceCatalog, ConfigError> {
        let mut catalog = PriceCatalog::default();
        for (i, custom) in self.pricing.custom_prices.iter().enumerate() {
            catalog
                .set_custom_price(custom.power_kwc, custom.price)
                .map_err(|e| ConfigError::pricing(&format!("pricing.custom_prices[{i}]"), e))?;
        }
        Ok(catalog)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let q = &self.quote;

        if !(q.base_production_kwh.is_finite() && q.base_production_kwh > 0.0) {
            errors.push(ConfigError::new("quote.base_production_kwh", "must be > 0"));
        }
        if !(q.peak_power_kwc.is_finite() && q.peak_power_kwc > 0.0) {
            errors.push(ConfigError::new("quote.peak_power_kwc", "must be > 0"));
        }

        let catalog = match self.catalog() {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let p = &self.parameters;
        let params = self.parameters_with_defaults();
        for (field, constraint) in params.out_of_range() {
            errors.push(ConfigError::new(format!("parameters.{field}"), constraint));
        }
        if let Some(years) = p.subscription_years {
            if years != 0 && !SUBSCRIPTION_DURATIONS.contains(&years) {
                errors.push(ConfigError::new(
                    "parameters.subscription_years",
                    format!("must be one of {SUBSCRIPTION_DURATIONS:?}, got {years}"),
                ));
            }
        }

        if let Some(catalog) = &catalog {
            let years = params.subscription_years();
            if q.peak_power_kwc > 0.0 {
                if let Err(e) = catalog.price_from_power(q.peak_power_kwc) {
                    errors.push(ConfigError::pricing("quote.peak_power_kwc", e));
                } else if params.financing_mode == FinancingMode::Subscription
                    && SUBSCRIPTION_DURATIONS.contains(&years)
                {
                    if let Err(e) = catalog.subscription_price(q.peak_power_kwc, years) {
                        errors.push(ConfigError::pricing("quote.peak_power_kwc", e));
                    }
                }
            }
            self.validate_battery(catalog, &mut errors);
        }

        errors
    }

    fn validate_battery(&self, catalog: &PriceCatalog, errors: &mut Vec<ConfigError>) {
        let b = &self.battery;
        match b.kind {
            BatteryKind::Virtual => match b.virtual_capacity_kwh {
                Some(capacity) if catalog.virtual_battery(capacity).is_none() => {
                    errors.push(ConfigError::new(
                        "battery.virtual_capacity_kwh",
                        format!("no Smart Battery offer for {capacity} kWh"),
                    ));
                }
                Some(_) => {}
                None => errors.push(ConfigError::new(
                    "battery.virtual_capacity_kwh",
                    "required when battery.kind = \"virtual\"",
                )),
            },
            BatteryKind::Physical => match &b.physical_model {
                Some(name) if catalog.physical_battery(name).is_none() => {
                    errors.push(ConfigError::new(
                        "battery.physical_model",
                        format!("unknown battery model \"{name}\""),
                    ));
                }
                Some(_) => {}
                None => errors.push(ConfigError::new(
                    "battery.physical_model",
                    "required when battery.kind = \"physical\"",
                )),
            },
            BatteryKind::None | BatteryKind::MyBattery => {}
        }
    }

    /// Resolves the configuration into a projection request.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a catalog default (feed-in tariff, bonus)
    /// or the selected battery cannot be resolved.
    pub fn to_request(&self, catalog: &PriceCatalog) -> Result<QuoteRequest, ConfigError> {
        let q = &self.quote;
        let p = &self.parameters;

        let feed_in_tariff = match p.feed_in_tariff {
            Some(tariff) => tariff,
            None => catalog
                .feed_in_tariff(q.peak_power_kwc)
                .map_err(|e| ConfigError::pricing("parameters.feed_in_tariff", e))?,
        };
        let self_consumption_bonus = match p.self_consumption_bonus {
            Some(bonus) => bonus,
            None => catalog
                .self_consumption_bonus(q.peak_power_kwc)
                .map_err(|e| ConfigError::pricing("parameters.self_consumption_bonus", e))?,
        };

        let parameters = FinancialParameters {
            feed_in_tariff,
            self_consumption_bonus,
            battery: self.battery_selection(catalog)?,
            ..self.parameters_with_defaults()
        };

        Ok(QuoteRequest {
            parameters,
            base_production_kwh: q.base_production_kwh,
            peak_power_kwc: q.peak_power_kwc,
            micro_inverters: q.micro_inverters,
        })
    }

    fn battery_selection(&self, catalog: &PriceCatalog) -> Result<BatterySelection, ConfigError> {
        let b = &self.battery;
        match b.kind {
            BatteryKind::Virtual => {
                let capacity_kwh = b.virtual_capacity_kwh.ok_or_else(|| {
                    ConfigError::new("battery.virtual_capacity_kwh", "missing")
                })?;
                Ok(BatterySelection::Virtual {
                    capacity_kwh,
                    smart_charger: b.smart_charger,
                })
            }
            BatteryKind::MyBattery => Ok(BatterySelection::MyBattery),
            BatteryKind::Physical => {
                let name = b
                    .physical_model
                    .as_deref()
                    .ok_or_else(|| ConfigError::new("battery.physical_model", "missing"))?;
                let model = catalog.physical_battery(name).ok_or_else(|| {
                    ConfigError::new(
                        "battery.physical_model",
                        format!("unknown battery model \"{name}\""),
                    )
                })?;
                Ok(BatterySelection::Physical {
                    model: model.clone(),
                })
            }
            BatteryKind::None => Ok(BatterySelection::None),
        }
    }

    /// Financial parameters with unset fields taken from the default
    /// settings. The feed-in tariff and bonus default to 0 here; the
    /// catalog values are resolved in [`QuoteConfig::to_request`].
    fn parameters_with_defaults(&self) -> FinancialParameters {
        let p = &self.parameters;
        let defaults = FinancialParameters::default();
        FinancialParameters {
            price_per_kwh: p.price_per_kwh.unwrap_or(defaults.price_per_kwh),
            self_consumption_pct: p
                .self_consumption_pct
                .unwrap_or(defaults.self_consumption_pct),
            feed_in_tariff: p.feed_in_tariff.unwrap_or(0.0),
            production_indexation_pct: p
                .production_indexation_pct
                .unwrap_or(defaults.production_indexation_pct),
            energy_revaluation_pct: p
                .energy_revaluation_pct
                .unwrap_or(defaults.energy_revaluation_pct),
            panel_degradation_pct: p
                .panel_degradation_pct
                .unwrap_or(defaults.panel_degradation_pct),
            self_consumption_bonus: p.self_consumption_bonus.unwrap_or(0.0),
            commercial_discount: p.commercial_discount.unwrap_or(defaults.commercial_discount),
            financing_mode: p.financing_mode.unwrap_or(defaults.financing_mode),
            subscription_years: p.subscription_years,
            battery: BatterySelection::None,
        }
    }
}
