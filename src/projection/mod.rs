//! Financial projection engine.
//!
//! A [`Projector`] borrows a [`PriceCatalog`] and turns a [`QuoteRequest`]
//! into a [`FinancialProjection`]: thirty yearly snapshots, totals,
//! annual averages and the break-even year.
//!
//! ```
//! use solar_quote::pricing::PriceCatalog;
//! use solar_quote::projection::{Projector, QuoteRequest, FinancialParameters};
//!
//! let catalog = PriceCatalog::default();
//! let request = QuoteRequest {
//!     parameters: FinancialParameters::default(),
//!     base_production_kwh: 7000.0,
//!     peak_power_kwc: 6.0,
//!     micro_inverters: false,
//! };
//! let projection = Projector::new(&catalog).project(&request).unwrap();
//! assert_eq!(projection.yearly.len(), 30);
//! ```

mod aggregate;
pub mod types;
mod yearly;

use crate::pricing::PriceCatalog;

pub use aggregate::{PROJECTION_YEARS, break_even_year};
pub use types::{
    BatterySelection, DEFAULT_SUBSCRIPTION_YEARS, FinancialParameters, FinancialProjection,
    FinancingMode, ProjectionTotals, QuoteRequest, YearlyProjection,
};
pub use yearly::{
    FEED_IN_CONTRACT_YEARS, MICRO_INVERTER_SELF_CONSUMPTION_BOOST, MYBATTERY_GRID_FEE_PER_KWH,
    MYBATTERY_MONTHLY_FEE_PER_KWC, MYBATTERY_SETUP_FEE, SMART_BATTERY_INSTALLATION_FEE,
    SMART_CHARGER_FEE, growth_coefficient, self_consumption_rate,
};

/// Projection engine bound to a price catalog.
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    catalog: &'a PriceCatalog,
}

impl<'a> Projector<'a> {
    pub fn new(catalog: &'a PriceCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a PriceCatalog {
        self.catalog
    }
}
