//! Financial snapshot of a single projection year.

use tracing::warn;

use super::Projector;
use super::types::{BatterySelection, FinancialParameters, FinancingMode, YearlyProjection};
use crate::error::PricingError;

/// Feed-in contracts pay the tariff for this many years.
pub const FEED_IN_CONTRACT_YEARS: u32 = 20;

/// Self-consumption gained with micro-inverters (fraction).
pub const MICRO_INVERTER_SELF_CONSUMPTION_BOOST: f64 = 0.05;

/// Deducted from the buy price when crediting MyBattery surplus (€/kWh).
pub const MYBATTERY_GRID_FEE_PER_KWH: f64 = 0.0996;

/// MyBattery service fee (€/kWc/month).
pub const MYBATTERY_MONTHLY_FEE_PER_KWC: f64 = 1.055;

/// MyBattery first-year setup fee (€).
pub const MYBATTERY_SETUP_FEE: f64 = 179.0;

/// Smart Battery first-year installation fee (€).
pub const SMART_BATTERY_INSTALLATION_FEE: f64 = 2000.0;

/// Smart charger option, billed with the Smart Battery installation (€).
pub const SMART_CHARGER_FEE: f64 = 1500.0;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Compound growth factor `(1 + pct/100)^(year - 1)`; 1.0 in year 1.
pub fn growth_coefficient(pct: f64, year: u32) -> f64 {
    (1.0 + pct / 100.0).powi(year.saturating_sub(1) as i32)
}

/// Fraction of production consumed on site, in [0, 1] for valid inputs.
pub fn self_consumption_rate(params: &FinancialParameters, micro_inverters: bool) -> f64 {
    let base = params.self_consumption_pct / 100.0;
    let mut rate = match &params.battery {
        BatterySelection::Virtual { .. } => 1.0,
        BatterySelection::Physical { model } => {
            (base + model.autoconsumption_increase_pct / 100.0).min(1.0)
        }
        BatterySelection::MyBattery | BatterySelection::None => base,
    };
    if micro_inverters {
        rate = (rate + MICRO_INVERTER_SELF_CONSUMPTION_BOOST).min(1.0);
    }
    rate
}

impl Projector<'_> {
    /// Computes production, energy split and money flows for `year`.
    ///
    /// # Arguments
    ///
    /// * `params` - Financial assumptions of the quote
    /// * `year` - Year index, starting at 1
    /// * `base_production_kwh` - First-year production estimate
    /// * `peak_power_kwc` - Installed peak power
    /// * `micro_inverters` - Whether micro-inverters are installed
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a subscription fee is needed and the
    /// catalog has none for this power and duration.
    pub fn compute_year(
        &self,
        params: &FinancialParameters,
        year: u32,
        base_production_kwh: f64,
        peak_power_kwc: f64,
        micro_inverters: bool,
    ) -> Result<YearlyProjection, PricingError> {
        let degradation = growth_coefficient(params.panel_degradation_pct, year);
        let indexation = growth_coefficient(params.production_indexation_pct, year);
        let revaluation = growth_coefficient(params.energy_revaluation_pct, year);

        let production_kwh = base_production_kwh * degradation;

        let rate = self_consumption_rate(params, micro_inverters);
        let self_consumed_kwh = production_kwh * rate;
        let surplus_kwh = production_kwh * (1.0 - rate);

        let buy_price = params.price_per_kwh * revaluation;
        let self_consumption_savings = self_consumed_kwh * buy_price;

        let resale_revenue = match &params.battery {
            BatterySelection::MyBattery => {
                surplus_kwh * (buy_price - MYBATTERY_GRID_FEE_PER_KWH).max(0.0)
            }
            BatterySelection::Virtual { .. }
            | BatterySelection::Physical { .. }
            | BatterySelection::None => {
                let tariff = if year <= FEED_IN_CONTRACT_YEARS {
                    params.feed_in_tariff * indexation
                } else {
                    0.0
                };
                surplus_kwh * tariff
            }
        };

        let subscription_cost = self.subscription_cost(params, year, peak_power_kwc)?;
        let battery_service_cost = self.battery_service_cost(params, year, peak_power_kwc);

        let total_gain =
            self_consumption_savings + resale_revenue - subscription_cost - battery_service_cost;

        Ok(YearlyProjection {
            year,
            production_kwh,
            self_consumed_kwh,
            surplus_kwh,
            self_consumption_savings,
            resale_revenue,
            subscription_cost,
            battery_service_cost,
            total_gain,
        })
    }

    /// Installation fee plus the physical battery fee, within the subscription window.
    fn subscription_cost(
        &self,
        params: &FinancialParameters,
        year: u32,
        peak_power_kwc: f64,
    ) -> Result<f64, PricingError> {
        let duration = params.subscription_years();
        if params.financing_mode != FinancingMode::Subscription || year > duration {
            return Ok(0.0);
        }

        let mut cost = self.catalog.subscription_price(peak_power_kwc, duration)? * MONTHS_PER_YEAR;
        if let BatterySelection::Physical { model } = &params.battery {
            if model.monthly_price > 0.0 {
                cost += model.monthly_price * MONTHS_PER_YEAR;
            }
        }
        Ok(cost)
    }

    /// Smart Battery / MyBattery service fees. Physical batteries are
    /// priced through the installation price or the subscription instead.
    fn battery_service_cost(&self, params: &FinancialParameters, year: u32, peak_power_kwc: f64) -> f64 {
        match &params.battery {
            BatterySelection::Virtual {
                capacity_kwh,
                smart_charger,
            } => {
                let Some(offer) = self.catalog.virtual_battery(*capacity_kwh) else {
                    if year == 1 {
                        warn!(
                            capacity_kwh,
                            "Smart Battery capacity not in catalog, no service fee applied"
                        );
                    }
                    return 0.0;
                };
                let mut cost = offer.monthly_price * MONTHS_PER_YEAR;
                if year == 1 {
                    cost += SMART_BATTERY_INSTALLATION_FEE;
                    if *smart_charger {
                        cost += SMART_CHARGER_FEE;
                    }
                }
                cost
            }
            BatterySelection::MyBattery => {
                let mut cost = peak_power_kwc * MYBATTERY_MONTHLY_FEE_PER_KWC * MONTHS_PER_YEAR;
                if year == 1 {
                    cost += MYBATTERY_SETUP_FEE;
                }
                cost
            }
            BatterySelection::Physical { .. } | BatterySelection::None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::pricing::{PhysicalBattery, PriceCatalog};

    fn scenario_params() -> FinancialParameters {
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

    fn storage_10() -> PhysicalBattery {
        PhysicalBattery {
            name: "Storage 10".to_string(),
            capacity_kwh: 10.0,
            autoconsumption_increase_pct: 30.0,
            one_time_price: 8990.0,
            monthly_price: 59.0,
        }
    }

    #[test]
    fn first_year_of_reference_scenario() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let y = projector
            .compute_year(&scenario_params(), 1, 5000.0, 6.0, false)
            .unwrap();

        assert_eq!(y.year, 1);
        assert_relative_eq!(y.production_kwh, 5000.0);
        assert_relative_eq!(y.self_consumed_kwh, 2000.0);
        assert_relative_eq!(y.surplus_kwh, 3000.0);
        assert_relative_eq!(y.self_consumption_savings, 400.0);
        assert_relative_eq!(y.resale_revenue, 300.0);
        assert_eq!(y.subscription_cost, 0.0);
        assert_eq!(y.battery_service_cost, 0.0);
        assert_relative_eq!(y.total_gain, 700.0);
    }

    #[test]
    fn coefficients_compound_from_year_two() {
        assert_eq!(growth_coefficient(-0.5, 1), 1.0);
        assert_relative_eq!(growth_coefficient(2.0, 2), 1.02);
        assert_relative_eq!(growth_coefficient(2.0, 3), 1.0404, epsilon = 1e-12);
    }

    #[test]
    fn degradation_reduces_production() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let y = projector
            .compute_year(&scenario_params(), 3, 5000.0, 6.0, false)
            .unwrap();
        assert_relative_eq!(y.production_kwh, 5000.0 * 0.995 * 0.995, epsilon = 1e-9);
    }

    #[test]
    fn smart_battery_consumes_everything() {
        let mut params = scenario_params();
        params.battery = BatterySelection::Virtual {
            capacity_kwh: 300,
            smart_charger: false,
        };
        assert_eq!(self_consumption_rate(&params, false), 1.0);
        assert_eq!(self_consumption_rate(&params, true), 1.0);
    }

    #[test]
    fn physical_battery_and_micro_inverters_stack_with_cap() {
        let mut params = scenario_params();
        params.battery = BatterySelection::Physical { model: storage_10() };
        assert_relative_eq!(self_consumption_rate(&params, false), 0.7);
        assert_relative_eq!(self_consumption_rate(&params, true), 0.75);

        params.self_consumption_pct = 80.0;
        assert_eq!(self_consumption_rate(&params, false), 1.0);
    }

    #[test]
    fn micro_inverters_add_five_points() {
        let params = scenario_params();
        assert_relative_eq!(self_consumption_rate(&params, true), 0.45);
    }

    #[test]
    fn feed_in_revenue_stops_after_contract() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let params = scenario_params();
        let y20 = projector.compute_year(&params, 20, 5000.0, 6.0, false).unwrap();
        let y21 = projector.compute_year(&params, 21, 5000.0, 6.0, false).unwrap();
        assert!(y20.resale_revenue > 0.0);
        assert_eq!(y21.resale_revenue, 0.0);
    }

    #[test]
    fn mybattery_credits_surplus_at_buy_price_minus_fee() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let mut params = scenario_params();
        params.battery = BatterySelection::MyBattery;

        let y1 = projector.compute_year(&params, 1, 5000.0, 6.0, false).unwrap();
        assert_relative_eq!(y1.resale_revenue, 3000.0 * (0.20 - 0.0996), epsilon = 1e-9);
        assert_relative_eq!(y1.battery_service_cost, 6.0 * 1.055 * 12.0 + 179.0, epsilon = 1e-9);

        let y25 = projector.compute_year(&params, 25, 5000.0, 6.0, false).unwrap();
        assert!(y25.resale_revenue > 0.0, "MyBattery credit is not capped at 20 years");
        assert_relative_eq!(y25.battery_service_cost, 6.0 * 1.055 * 12.0, epsilon = 1e-9);
    }

    #[test]
    fn mybattery_credit_never_negative() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let mut params = scenario_params();
        params.price_per_kwh = 0.05;
        params.energy_revaluation_pct = 0.0;
        params.battery = BatterySelection::MyBattery;
        let y = projector.compute_year(&params, 1, 5000.0, 6.0, false).unwrap();
        assert_eq!(y.resale_revenue, 0.0);
    }

    #[test]
    fn smart_battery_fees_in_first_year() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let mut params = scenario_params();
        params.battery = BatterySelection::Virtual {
            capacity_kwh: 300,
            smart_charger: true,
        };

        let y1 = projector.compute_year(&params, 1, 5000.0, 6.0, false).unwrap();
        assert_relative_eq!(y1.battery_service_cost, 19.99 * 12.0 + 2000.0 + 1500.0, epsilon = 1e-9);
        assert_eq!(y1.surplus_kwh, 0.0);
        assert_eq!(y1.resale_revenue, 0.0);

        let y2 = projector.compute_year(&params, 2, 5000.0, 6.0, false).unwrap();
        assert_relative_eq!(y2.battery_service_cost, 19.99 * 12.0, epsilon = 1e-9);
    }

    #[test]
    fn unknown_smart_battery_capacity_costs_nothing() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let mut params = scenario_params();
        params.battery = BatterySelection::Virtual {
            capacity_kwh: 250,
            smart_charger: true,
        };
        let y1 = projector.compute_year(&params, 1, 5000.0, 6.0, false).unwrap();
        assert_eq!(y1.battery_service_cost, 0.0);
        assert_eq!(y1.self_consumed_kwh, y1.production_kwh);
    }

    #[test]
    fn subscription_fee_within_window_only() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let mut params = scenario_params();
        params.financing_mode = FinancingMode::Subscription;
        params.subscription_years = Some(15);

        let y15 = projector.compute_year(&params, 15, 5000.0, 6.0, false).unwrap();
        assert_relative_eq!(y15.subscription_cost, 94.33 * 12.0, epsilon = 1e-9);

        let y16 = projector.compute_year(&params, 16, 5000.0, 6.0, false).unwrap();
        assert_eq!(y16.subscription_cost, 0.0);
    }

    #[test]
    fn subscription_includes_physical_battery_fee() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let mut params = scenario_params();
        params.financing_mode = FinancingMode::Subscription;
        params.battery = BatterySelection::Physical { model: storage_10() };

        let y1 = projector.compute_year(&params, 1, 5000.0, 6.0, false).unwrap();
        assert_relative_eq!(y1.subscription_cost, (74.95 + 59.0) * 12.0, epsilon = 1e-9);
        assert_eq!(y1.battery_service_cost, 0.0);
    }

    #[test]
    fn subscription_on_unlisted_kit_propagates_error() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let mut params = scenario_params();
        params.financing_mode = FinancingMode::Subscription;
        let err = projector
            .compute_year(&params, 1, 20000.0, 24.0, false)
            .unwrap_err();
        assert_eq!(
            err,
            PricingError::SubscriptionNotFound {
                power_kwc: 24.0,
                years: 20
            }
        );
    }

    #[test]
    fn gain_identity_holds() {
        let catalog = PriceCatalog::default();
        let projector = Projector::new(&catalog);
        let mut params = scenario_params();
        params.financing_mode = FinancingMode::Subscription;
        params.battery = BatterySelection::MyBattery;
        for year in 1..=30 {
            let y = projector.compute_year(&params, year, 5000.0, 6.0, true).unwrap();
            let expected = y.self_consumption_savings + y.resale_revenue
                - y.subscription_cost
                - y.battery_service_cost;
            assert!((y.total_gain - expected).abs() < 1e-9);
        }
    }
}
