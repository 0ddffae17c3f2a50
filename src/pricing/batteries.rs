//! Battery catalog: Smart Battery capacities and physical storage models.

use serde::{Deserialize, Serialize};

/// Smart Battery (virtual storage) offer for one capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualBattery {
    /// Virtual storage capacity (kWh).
    pub capacity_kwh: u32,
    /// Service fee (€/month).
    pub monthly_price: f64,
}

/// Physical home battery model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicalBattery {
    /// Catalog name of the model.
    pub name: String,
    /// Usable capacity (kWh).
    pub capacity_kwh: f64,
    /// Percentage points of self-consumption gained with the battery.
    pub autoconsumption_increase_pct: f64,
    /// Price when bought upfront (€).
    pub one_time_price: f64,
    /// Extra monthly fee when financed by subscription (€/month), 0 if none.
    #[serde(default)]
    pub monthly_price: f64,
}

const fn virtual_battery(capacity_kwh: u32, monthly_price: f64) -> VirtualBattery {
    VirtualBattery {
        capacity_kwh,
        monthly_price,
    }
}

pub const VIRTUAL_BATTERIES: &[VirtualBattery] = &[
    virtual_battery(100, 14.99),
    virtual_battery(300, 19.99),
    virtual_battery(600, 24.99),
    virtual_battery(900, 29.99),
    virtual_battery(1200, 34.99),
];

/// Physical models sold with an installation.
pub fn physical_batteries() -> Vec<PhysicalBattery> {
    [
        ("Storage 5", 5.0, 20.0, 5490.0, 35.0),
        ("Storage 10", 10.0, 30.0, 8990.0, 59.0),
        ("Storage 15", 15.0, 38.0, 12490.0, 82.0),
    ]
    .into_iter()
    .map(
        |(name, capacity_kwh, increase, one_time_price, monthly_price)| PhysicalBattery {
            name: name.to_string(),
            capacity_kwh,
            autoconsumption_increase_pct: increase,
            one_time_price,
            monthly_price,
        },
    )
    .collect()
}
