//! Command implementations for the spark-rs CLI

pub mod model;
