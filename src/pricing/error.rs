use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("Invalid price band: ideal price {ideal}, factor {factor}")]
    InvalidBand { ideal: f64, factor: f64 },
    #[error("Ideal price is zero, price gap is undefined")]
    ZeroIdealPrice,
    #[error("Invalid proposed price: {0}")]
    InvalidPrice(f64),
    #[error("No data for the selected states")]
    EmptySelection,
    #[error("State '{0}' is not part of the current selection")]
    UnknownState(String),
}
