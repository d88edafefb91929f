//! Data module - CSV loading and processing

pub mod loader;
pub mod processor;
mod record;

pub use loader::{DataLoader, FileIdentity, LoaderError};
pub use processor::{DataProcessor, ProcessorError, Summary};
pub use record::{NormalizedRecord, StateRecord};
