//! Thirty-year aggregation, pricing and break-even.

use tracing::debug;

use super::Projector;
use super::types::{
    BatterySelection, FinancialParameters, FinancialProjection, FinancingMode, ProjectionTotals,
    QuoteRequest, YearlyProjection,
};
use crate::error::PricingError;
use crate::pricing::micro_inverter_surcharge;

/// Projection horizon (years).
pub const PROJECTION_YEARS: u32 = 30;

impl Projector<'_> {
    /// Projects a quote over [`PROJECTION_YEARS`] years.
    ///
    /// # Errors
    ///
    /// Returns the first [`PricingError`] raised while pricing the quote.
    /// No partial projection is returned.
    pub fn project(&self, request: &QuoteRequest) -> Result<FinancialProjection, PricingError> {
        self.project_with(
            &request.parameters,
            request.base_production_kwh,
            request.peak_power_kwc,
            request.micro_inverters,
        )
    }

    /// Same as [`Projector::project`] with the request fields given one by one.
    ///
    /// # Errors
    ///
    /// See [`Projector::project`].
    pub fn project_with(
        &self,
        params: &FinancialParameters,
        base_production_kwh: f64,
        peak_power_kwc: f64,
        micro_inverters: bool,
    ) -> Result<FinancialProjection, PricingError> {
        let mut yearly = Vec::with_capacity(PROJECTION_YEARS as usize);
        let mut totals = ProjectionTotals::default();
        for year in 1..=PROJECTION_YEARS {
            let entry = self.compute_year(
                params,
                year,
                base_production_kwh,
                peak_power_kwc,
                micro_inverters,
            )?;
            totals.accumulate(&entry);
            yearly.push(entry);
        }
        let annual_average = totals.averaged_over(f64::from(PROJECTION_YEARS));

        let mut installation_price = self.catalog.price_from_power(peak_power_kwc)?;
        if params.financing_mode == FinancingMode::Cash {
            if let BatterySelection::Physical { model } = &params.battery {
                installation_price += model.one_time_price;
            }
            if micro_inverters {
                installation_price += micro_inverter_surcharge(peak_power_kwc);
            }
        }

        let final_price = self.catalog.final_price(
            peak_power_kwc,
            params.self_consumption_bonus,
            params.commercial_discount,
            micro_inverters,
        )?;
        let break_even_year = break_even_year(&yearly, final_price);

        debug!(
            peak_power_kwc,
            base_production_kwh,
            final_price,
            total_gain = totals.total_gain,
            break_even_year,
            "projection computed"
        );

        Ok(FinancialProjection {
            yearly,
            totals,
            annual_average,
            break_even_year,
            installation_price,
            self_consumption_bonus: params.self_consumption_bonus,
            commercial_discount: params.commercial_discount,
            final_price,
        })
    }
}

/// First year (1-based) whose cumulative gain reaches `final_price`, 0 if
/// the investment is never recovered.
pub fn break_even_year(yearly: &[YearlyProjection], final_price: f64) -> u32 {
    let mut cumulative = 0.0;
    for (index, entry) in yearly.iter().enumerate() {
        cumulative += entry.total_gain;
        if cumulative >= final_price {
            return index as u32 + 1;
        }
    }
    0
}
