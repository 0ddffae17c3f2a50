//! File output for projections.

pub mod export;
