//! Data Processor Module
//! Record extraction, normalization, state filtering and aggregation.

use super::loader::{CONVERSION_COL, LEADS_COL, REGION_COL, STATE_COL};
use super::{NormalizedRecord, StateRecord};
use crate::pricing::{ConversionNormalizer, PriceBand};
use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;

pub const FACTOR_COL: &str = "Factor_regional";
pub const CONVERTED_COL: &str = "Leads_convertidos";
pub const IDEAL_PRICE_COL: &str = "Precio_Ideal";
pub const BAND_LOW_COL: &str = "Banda_Baja";
pub const BAND_HIGH_COL: &str = "Banda_Alta";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Frame has {rows} rows but {records} records were given")]
    LengthMismatch { rows: usize, records: usize },
}

/// Headline KPIs over a set of records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_leads: u64,
    pub total_converted: i64,
    pub conversion_rate_pct: f64,
    pub active_states: usize,
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Extract one record per DataFrame row, in row order.
    pub fn to_records(df: &DataFrame) -> Result<Vec<StateRecord>, ProcessorError> {
        let states = df.column(STATE_COL)?.cast(&DataType::String)?;
        let regions = df.column(REGION_COL)?.cast(&DataType::String)?;
        let leads = df.column(LEADS_COL)?.cast(&DataType::Float64)?;
        let conversion = df.column(CONVERSION_COL)?.cast(&DataType::Float64)?;

        let records = states
            .str()?
            .into_iter()
            .zip(regions.str()?.into_iter())
            .zip(leads.f64()?.into_iter())
            .zip(conversion.f64()?.into_iter())
            .map(|(((state, region), leads), conversion)| StateRecord {
                state: state.unwrap_or_default().to_string(),
                region: region.unwrap_or_default().to_string(),
                leads: leads.unwrap_or(0.0),
                conversion_pct: conversion.unwrap_or(f64::NAN),
            })
            .collect();

        Ok(records)
    }

    /// Apply the conversion heuristic and derive converted leads.
    pub fn normalize(
        records: &[StateRecord],
        normalizer: &ConversionNormalizer,
    ) -> Vec<NormalizedRecord> {
        let normalized: Vec<NormalizedRecord> = records
            .iter()
            .map(|r| {
                let region_factor = normalizer.factors().factor_for(&r.region);
                let conversion_pct = normalizer.normalize(r.conversion_pct, &r.region);
                NormalizedRecord {
                    state: r.state.clone(),
                    region: r.region.clone(),
                    leads: r.leads,
                    raw_conversion_pct: r.conversion_pct,
                    conversion_pct,
                    region_factor,
                    adjusted: normalizer.is_implausible(r.conversion_pct),
                    converted_leads: (r.leads * (conversion_pct / 100.0)).round_ties_even() as i64,
                }
            })
            .collect();

        let adjusted = normalized.iter().filter(|r| r.adjusted).count();
        if adjusted > 0 {
            log::info!(
                "Replaced {adjusted} of {} implausible conversion rates",
                normalized.len()
            );
        }
        normalized
    }

    /// Sorted, de-duplicated state names.
    pub fn unique_states(records: &[NormalizedRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keep only records whose state is selected, preserving order.
    pub fn filter_states(
        records: &[NormalizedRecord],
        selection: &BTreeSet<String>,
    ) -> Vec<NormalizedRecord> {
        records
            .iter()
            .filter(|r| selection.contains(&r.state))
            .cloned()
            .collect()
    }

    pub fn summarize(records: &[NormalizedRecord]) -> Summary {
        let total_leads = records.iter().map(|r| r.leads).sum::<f64>().trunc().max(0.0) as u64;
        let total_converted: i64 = records.iter().map(|r| r.converted_leads).sum();
        let conversion_rate_pct = if total_leads > 0 {
            total_converted as f64 / total_leads as f64 * 100.0
        } else {
            0.0
        };
        let active_states = records
            .iter()
            .map(|r| r.state.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Summary {
            total_leads,
            total_converted,
            conversion_rate_pct,
            active_states,
        }
    }

    /// Build the downloadable frame: the selected rows of the cleaned input
    /// with normalized conversion and the derived pricing columns.
    ///
    /// `records` must be the normalized records of `df`, row for row.
    pub fn build_export_frame(
        df: &DataFrame,
        records: &[NormalizedRecord],
        selection: &BTreeSet<String>,
        band: &PriceBand,
    ) -> Result<DataFrame, ProcessorError> {
        if df.height() != records.len() {
            return Err(ProcessorError::LengthMismatch {
                rows: df.height(),
                records: records.len(),
            });
        }

        let mask: Vec<bool> = records.iter().map(|r| selection.contains(&r.state)).collect();
        let mut out = df.filter(&BooleanChunked::from_slice("selected".into(), &mask))?;
        let selected: Vec<&NormalizedRecord> = records
            .iter()
            .filter(|r| selection.contains(&r.state))
            .collect();
        let n = selected.len();

        let conversion: Vec<f64> = selected.iter().map(|r| r.conversion_pct).collect();
        let factors: Vec<f64> = selected.iter().map(|r| r.region_factor).collect();
        let converted: Vec<i64> = selected.iter().map(|r| r.converted_leads).collect();

        out.with_column(Column::new(CONVERSION_COL.into(), conversion))?;
        out.with_column(Column::new(FACTOR_COL.into(), factors))?;
        out.with_column(Column::new(CONVERTED_COL.into(), converted))?;
        out.with_column(Column::new(IDEAL_PRICE_COL.into(), vec![band.ideal; n]))?;
        out.with_column(Column::new(BAND_LOW_COL.into(), vec![band.low; n]))?;
        out.with_column(Column::new(BAND_HIGH_COL.into(), vec![band.high; n]))?;

        Ok(out)
    }
}
