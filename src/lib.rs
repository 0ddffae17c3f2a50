//! Financial projection engine for residential solar installation quotes.

pub mod config;
pub mod error;
pub mod io;
pub mod pricing;
pub mod projection;

#[cfg(feature = "api")]
pub mod api;
