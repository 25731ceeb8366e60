//! Data models for configuration and extracted guarantee data.

pub mod config;
pub mod guarantee;
