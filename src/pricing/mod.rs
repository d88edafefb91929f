//! Pricing module - conversion normalization, price bands and simulation

mod band;
mod error;
mod model;
mod normalizer;
mod simulator;

pub use band::{BandPosition, PriceBand};
pub use error::PricingError;
pub use model::{Evaluation, ModelParams, PriceRow, PricingModel};
pub use normalizer::{ConversionNormalizer, RegionFactors};
pub use simulator::{PriceSimulator, Simulation, SimulationInput};
