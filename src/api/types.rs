//! API response types.

use serde::Serialize;

use crate::pricing::{KitPrice, PhysicalBattery, PriceCatalog, VirtualBattery};

/// Catalog listing returned by `GET /catalog`.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// Effective kit prices, custom prices applied, sorted by power.
    pub kits: Vec<KitPrice>,
    pub virtual_batteries: Vec<VirtualBattery>,
    pub physical_batteries: Vec<PhysicalBattery>,
}

impl From<&PriceCatalog> for CatalogResponse {
    fn from(catalog: &PriceCatalog) -> Self {
        Self {
            kits: catalog.kits(),
            virtual_batteries: catalog.virtual_batteries().to_vec(),
            physical_batteries: catalog.physical_batteries().to_vec(),
        }
    }
}

/// Error body for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
}
