//! unitrack-core: academic progress calculation engine.
//!
//! This crate defines the course record data model and the pure functions
//! that derive registrar metrics from it: course outcomes, weighted grade
//! averages, category hour totals, graduation forecast, grade trend and
//! standing band.

pub mod classifier;
pub mod error;
pub mod forecast;
pub mod hours;
pub mod memo;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod report;
pub mod status;
pub mod trend;
