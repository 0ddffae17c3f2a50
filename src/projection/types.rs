//! Projection inputs and outputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pricing::PhysicalBattery;

/// Subscription duration applied when none is given (years).
pub const DEFAULT_SUBSCRIPTION_YEARS: u32 = 20;

/// How the installation is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancingMode {
    /// Bought upfront.
    #[default]
    Cash,
    /// Rented for a monthly fee over the subscription duration.
    Subscription,
}

/// Storage option attached to a quote.
///
/// Serialized with a `type` tag (`virtual`, `mybattery`, `physical`,
/// `none`). Any other tag reads as [`BatterySelection::None`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BatterySelection {
    /// Smart Battery: virtual storage billed per capacity.
    Virtual {
        /// Virtual capacity (kWh), looked up in the catalog.
        capacity_kwh: u32,
        /// Adds the smart charger to the first-year fees.
        #[serde(default)]
        smart_charger: bool,
    },
    /// MyBattery: surplus credited at the buy price minus grid fees.
    #[serde(rename = "mybattery")]
    MyBattery,
    /// Physical home battery.
    Physical { model: PhysicalBattery },
    #[default]
    #[serde(other)]
    None,
}

/// Financial assumptions of one quote.
///
/// Percentages are expressed in percent (`40.0` means 40 %). Missing fields
/// take the default financial settings when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialParameters {
    /// Current electricity buy price (€/kWh, *prix du kWh*).
    pub price_per_kwh: f64,
    /// Share of production consumed on site without storage (%).
    pub self_consumption_pct: f64,
    /// Surplus feed-in tariff (€/kWh, *tarif de revente*).
    pub feed_in_tariff: f64,
    /// Annual escalation of the feed-in tariff (%).
    pub production_indexation_pct: f64,
    /// Annual escalation of the electricity buy price (%).
    pub energy_revaluation_pct: f64,
    /// Annual production change from panel ageing (%, usually negative).
    pub panel_degradation_pct: f64,
    /// One-time self-consumption bonus (€, *prime à l'autoconsommation*).
    pub self_consumption_bonus: f64,
    /// One-time commercial discount (€, *remise commerciale*).
    pub commercial_discount: f64,
    pub financing_mode: FinancingMode,
    /// Subscription duration (years). `None` or 0 means 20.
    pub subscription_years: Option<u32>,
    pub battery: BatterySelection,
}

impl Default for FinancialParameters {
    fn default() -> Self {
        Self {
            price_per_kwh: 0.2516,
            self_consumption_pct: 70.0,
            feed_in_tariff: 0.1269,
            production_indexation_pct: 1.0,
            energy_revaluation_pct: 5.0,
            panel_degradation_pct: -0.2,
            self_consumption_bonus: 0.0,
            commercial_discount: 0.0,
            financing_mode: FinancingMode::Cash,
            subscription_years: None,
            battery: BatterySelection::None,
        }
    }
}

impl FinancialParameters {
    /// Effective subscription duration in years.
    pub fn subscription_years(&self) -> u32 {
        self.subscription_years
            .filter(|&years| years > 0)
            .unwrap_or(DEFAULT_SUBSCRIPTION_YEARS)
    }

    /// Fields outside their valid range, paired with the violated constraint.
    ///
    /// Returns an empty vector if every field is usable by the projection.
    pub fn out_of_range(&self) -> Vec<(&'static str, &'static str)> {
        let mut invalid = Vec::new();

        if !(0.0..=100.0).contains(&self.self_consumption_pct) {
            invalid.push(("self_consumption_pct", "must be in [0, 100]"));
        }
        for (field, value) in [
            ("price_per_kwh", self.price_per_kwh),
            ("feed_in_tariff", self.feed_in_tariff),
            ("self_consumption_bonus", self.self_consumption_bonus),
            ("commercial_discount", self.commercial_discount),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                invalid.push((field, "must be >= 0"));
            }
        }
        for (field, value) in [
            ("production_indexation_pct", self.production_indexation_pct),
            ("energy_revaluation_pct", self.energy_revaluation_pct),
            ("panel_degradation_pct", self.panel_degradation_pct),
        ] {
            if !(value.is_finite() && value > -100.0) {
                invalid.push((field, "must be > -100"));
            }
        }

        invalid
    }
}

/// Everything needed to project one quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteRequest {
    pub parameters: FinancialParameters,
    /// Estimated first-year production (kWh).
    pub base_production_kwh: f64,
    /// Installed peak power (kWc).
    pub peak_power_kwc: f64,
    /// Enphase-style micro-inverters instead of a string inverter.
    #[serde(default)]
    pub micro_inverters: bool,
}

/// One year of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// Year index, 1 to 30.
    pub year: u32,
    /// Production after degradation (kWh).
    pub production_kwh: f64,
    /// Energy consumed on site (kWh).
    pub self_consumed_kwh: f64,
    /// Energy exported (kWh).
    pub surplus_kwh: f64,
    /// Bill savings from self-consumed energy (€).
    pub self_consumption_savings: f64,
    /// Income from exported energy (€).
    pub resale_revenue: f64,
    /// Installation and battery subscription fees (€).
    pub subscription_cost: f64,
    /// Smart Battery / MyBattery service fees (€).
    pub battery_service_cost: f64,
    /// `savings + resale - subscription - battery service` (€).
    pub total_gain: f64,
}

impl fmt::Display for YearlyProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year {:>2} | prod={:>8.1} kWh  self={:>8.1} kWh  surplus={:>8.1} kWh | \
             savings={:>8.2}  resale={:>8.2}  subscription={:>8.2}  battery={:>8.2} | gain={:>9.2} €",
            self.year,
            self.production_kwh,
            self.self_consumed_kwh,
            self.surplus_kwh,
            self.self_consumption_savings,
            self.resale_revenue,
            self.subscription_cost,
            self.battery_service_cost,
            self.total_gain,
        )
    }
}

/// Money flows summed (or averaged) over the projection horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionTotals {
    pub self_consumption_savings: f64,
    pub resale_revenue: f64,
    pub subscription_cost: f64,
    pub battery_service_cost: f64,
    pub total_gain: f64,
}

impl ProjectionTotals {
    /// Adds one year's flows.
    pub fn accumulate(&mut self, year: &YearlyProjection) {
        self.self_consumption_savings += year.self_consumption_savings;
        self.resale_revenue += year.resale_revenue;
        self.subscription_cost += year.subscription_cost;
        self.battery_service_cost += year.battery_service_cost;
        self.total_gain += year.total_gain;
    }

    /// Every field divided by `years`.
    pub fn averaged_over(&self, years: f64) -> Self {
        Self {
            self_consumption_savings: self.self_consumption_savings / years,
            resale_revenue: self.resale_revenue / years,
            subscription_cost: self.subscription_cost / years,
            battery_service_cost: self.battery_service_cost / years,
            total_gain: self.total_gain / years,
        }
    }
}

/// Complete 30-year projection of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProjection {
    /// One entry per year, ascending.
    pub yearly: Vec<YearlyProjection>,
    pub totals: ProjectionTotals,
    /// Totals divided by the full horizon, whatever the break-even year.
    pub annual_average: ProjectionTotals,
    /// First year whose cumulative gain covers the final price, 0 if none.
    pub break_even_year: u32,
    /// Upfront price (€). Includes battery and micro-inverters when paid cash.
    pub installation_price: f64,
    pub self_consumption_bonus: f64,
    pub commercial_discount: f64,
    /// Price after bonus and discount, the break-even target (€).
    pub final_price: f64,
}

impl FinancialProjection {
    /// Running sum of `total_gain`, one entry per year.
    pub fn cumulative_gains(&self) -> Vec<f64> {
        self.yearly
            .iter()
            .scan(0.0, |sum, y| {
                *sum += y.total_gain;
                Some(*sum)
            })
            .collect()
    }
}

impl fmt::Display for FinancialProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Financial Projection ---")?;
        writeln!(f, "Installation price:       {:.2} €", self.installation_price)?;
        writeln!(f, "Self-consumption bonus:   {:.2} €", self.self_consumption_bonus)?;
        writeln!(f, "Commercial discount:      {:.2} €", self.commercial_discount)?;
        writeln!(f, "Final price:              {:.2} €", self.final_price)?;
        writeln!(
            f,
            "Self-consumption savings: {:.2} €",
            self.totals.self_consumption_savings
        )?;
        writeln!(f, "Resale revenue:           {:.2} €", self.totals.resale_revenue)?;
        writeln!(f, "Subscription cost:        {:.2} €", self.totals.subscription_cost)?;
        writeln!(
            f,
            "Battery services:         {:.2} €",
            self.totals.battery_service_cost
        )?;
        writeln!(f, "Total gains:              {:.2} €", self.totals.total_gain)?;
        writeln!(f, "Average annual gain:      {:.2} €", self.annual_average.total_gain)?;
        if self.break_even_year == 0 {
            write!(f, "Break-even year:          not reached")
        } else {
            write!(f, "Break-even year:          {}", self.break_even_year)
        }
    }
}
