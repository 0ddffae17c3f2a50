//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_quote::pricing::PriceCatalog;
use solar_quote::projection::{
    BatterySelection, FinancialParameters, FinancingMode, QuoteRequest,
};

/// Reference parameters: 0.20 €/kWh, 40 % self-consumption, 0.10 €/kWh
/// feed-in, +2 %/yr energy price, -0.5 %/yr degradation, cash, no battery.
pub fn reference_parameters() -> FinancialParameters {
    FinancialParameters {
        price_per_kwh: 0.20,
        self_consumption_pct: 40.0,
        feed_in_tariff: 0.10,
        production_indexation_pct: 0.0,
        energy_revaluation_pct: 2.0,
        panel_degradation_pct: -0.5,
        self_consumption_bonus: 0.0,
        commercial_discount: 0.0,
        financing_mode: FinancingMode::Cash,
        subscription_years: None,
        battery: BatterySelection::None,
    }
}

/// 6 kWc / 5000 kWh request with the reference parameters.
pub fn reference_request() -> QuoteRequest {
    QuoteRequest {
        parameters: reference_parameters(),
        base_production_kwh: 5000.0,
        peak_power_kwc: 6.0,
        micro_inverters: false,
    }
}

/// Reference request with another storage option.
pub fn request_with_battery(battery: BatterySelection) -> QuoteRequest {
    let mut request = reference_request();
    request.parameters.battery = battery;
    request
}

/// Built-in catalog.
pub fn catalog() -> PriceCatalog {
    PriceCatalog::default()
}

/// Physical battery model from the built-in catalog.
pub fn physical_model(name: &str) -> BatterySelection {
    let model = catalog()
        .physical_battery(name)
        .cloned()
        .unwrap_or_else(|| panic!("catalog should list {name}"));
    BatterySelection::Physical { model }
}
