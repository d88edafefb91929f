//! Pricing Model
//! Holds the normalized dataset and answers evaluation and simulation requests.

use super::{
    ConversionNormalizer, PriceBand, PriceSimulator, PricingError, Simulation, SimulationInput,
};
use crate::config::PricingConfig;
use crate::data::{DataProcessor, NormalizedRecord, ProcessorError, Summary};
use polars::prelude::DataFrame;
use std::collections::BTreeSet;

/// User-adjustable inputs of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub ideal_price: f64,
    pub band_factor: f64,
    pub selected_states: BTreeSet<String>,
}

/// Recommended price range for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub state: String,
    pub region: String,
    pub ideal: f64,
    pub low: f64,
    pub high: f64,
}

/// Everything derived from one set of parameters.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub params: ModelParams,
    pub records: Vec<NormalizedRecord>,
    pub summary: Summary,
    pub band: PriceBand,
    pub price_rows: Vec<PriceRow>,
}

impl Evaluation {
    /// Selected states in row order, without duplicates.
    pub fn states(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.state.as_str()))
            .map(|r| r.state.clone())
            .collect()
    }
}

pub struct PricingModel {
    frame: DataFrame,
    records: Vec<NormalizedRecord>,
    states: Vec<String>,
    simulator: PriceSimulator,
}

impl PricingModel {
    /// Normalize a prepared frame (see `DataLoader::prepare_columns`).
    pub fn new(frame: DataFrame, config: &PricingConfig) -> Result<Self, ProcessorError> {
        let raw = DataProcessor::to_records(&frame)?;
        let records = DataProcessor::normalize(&raw, &ConversionNormalizer::from_config(config));
        let states = DataProcessor::unique_states(&records);

        log::info!(
            "Pricing model ready: {} rows, {} states",
            records.len(),
            states.len()
        );

        Ok(Self {
            frame,
            records,
            states,
            simulator: PriceSimulator::from_config(config),
        })
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    /// Filter, aggregate and price the selection.
    pub fn evaluate(&self, params: &ModelParams) -> Result<Evaluation, PricingError> {
        let records = DataProcessor::filter_states(&self.records, &params.selected_states);
        if records.is_empty() {
            return Err(PricingError::EmptySelection);
        }

        let band = PriceBand::new(params.ideal_price, params.band_factor)?;
        let summary = DataProcessor::summarize(&records);
        let price_rows = records
            .iter()
            .map(|r| PriceRow {
                state: r.state.clone(),
                region: r.region.clone(),
                ideal: band.ideal,
                low: band.low,
                high: band.high,
            })
            .collect();

        Ok(Evaluation {
            params: params.clone(),
            records,
            summary,
            band,
            price_rows,
        })
    }

    /// Simulate a proposed price for the first row of `state` in the evaluation.
    pub fn simulate(
        &self,
        evaluation: &Evaluation,
        state: &str,
        proposed_price: f64,
    ) -> Result<Simulation, PricingError> {
        let record = evaluation
            .records
            .iter()
            .find(|r| r.state == state)
            .ok_or_else(|| PricingError::UnknownState(state.to_string()))?;

        self.simulator.simulate(
            &evaluation.band,
            SimulationInput {
                proposed_price,
                base_conversion_pct: record.conversion_pct,
                leads: record.leads,
            },
        )
    }

    /// Frame for CSV download, restricted to the evaluation's selection.
    pub fn export_frame(&self, evaluation: &Evaluation) -> Result<DataFrame, ProcessorError> {
        DataProcessor::build_export_frame(
            &self.frame,
            &self.records,
            &evaluation.params.selected_states,
            &evaluation.band,
        )
    }
}
