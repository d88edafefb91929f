//! Conversion Normalizer
//! Replaces implausible conversion percentages with a region-scaled target rate.

use crate::config::PricingConfig;
use std::collections::BTreeMap;

/// Region name to multiplicative factor, with a fallback for unknown regions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFactors {
    factors: BTreeMap<String, f64>,
    default_factor: f64,
}

impl Default for RegionFactors {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

impl RegionFactors {
    pub fn new(factors: BTreeMap<String, f64>, default_factor: f64) -> Self {
        Self {
            factors,
            default_factor,
        }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.region_factors.clone(), config.default_region_factor)
    }

    /// Factor for an exact region name, or the default when it is unknown or empty.
    pub fn factor_for(&self, region: &str) -> f64 {
        self.factors
            .get(region)
            .copied()
            .unwrap_or(self.default_factor)
    }

    pub fn regions(&self) -> impl Iterator<Item = (&str, f64)> {
        self.factors.iter().map(|(name, f)| (name.as_str(), *f))
    }
}

/// Conversion rate heuristic.
///
/// Values at or below the threshold are trusted as-is. Values above it are
/// replaced by `target_rate * region_factor * 100`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionNormalizer {
    target_rate: f64,
    threshold_pct: f64,
    factors: RegionFactors,
}

impl Default for ConversionNormalizer {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

impl ConversionNormalizer {
    pub fn new(target_rate: f64, threshold_pct: f64, factors: RegionFactors) -> Self {
        Self {
            target_rate,
            threshold_pct,
            factors,
        }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(
            config.target_rate,
            config.implausible_threshold_pct,
            RegionFactors::from_config(config),
        )
    }

    pub fn factors(&self) -> &RegionFactors {
        &self.factors
    }

    pub fn is_implausible(&self, raw_pct: f64) -> bool {
        raw_pct > self.threshold_pct
    }

    /// Normalized conversion percentage for a raw value in `region`.
    pub fn normalize(&self, raw_pct: f64, region: &str) -> f64 {
        if self.is_implausible(raw_pct) {
            self.target_rate * self.factors.factor_for(region) * 100.0
        } else {
            raw_pct
        }
    }
}
