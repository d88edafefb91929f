//! Factor X Pricing - State pricing dashboard
//!
//! Loads per-state lead and conversion data, normalizes implausible
//! conversion rates, recommends price bands and simulates proposed prices.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod pricing;
