//! Configuration Module
//! Model constants and UI ranges, loadable from a JSON file.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default region adjustment table.
pub const DEFAULT_REGION_FACTORS: [(&str, f64); 8] = [
    ("Centro", 0.92),
    ("Occidente", 1.05),
    ("Bajío", 0.98),
    ("Noreste", 1.02),
    ("Sureste", 0.90),
    ("Golfo", 0.97),
    ("Noroeste", 1.01),
    ("Sur", 0.93),
];

/// Inclusive numeric range for a UI control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ValueRange {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// All tunable parameters of the pricing model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Target conversion rate as a fraction (0.028 = 2.8%)
    pub target_rate: f64,
    /// Conversion percentages above this are considered implausible
    pub implausible_threshold_pct: f64,
    pub default_region_factor: f64,
    pub region_factors: BTreeMap<String, f64>,

    pub default_ideal_price: f64,
    pub ideal_price_range: ValueRange,
    pub default_band_factor: f64,
    pub band_factor_range: ValueRange,

    /// Upper bound on the conversion multiplier shift
    pub max_multiplier_shift: f64,
    /// Multiplier shift per 10% of price gap
    pub shift_per_ten_pct_gap: f64,

    pub export_file_name: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            target_rate: 0.028,
            implausible_threshold_pct: 5.0,
            default_region_factor: 1.0,
            region_factors: DEFAULT_REGION_FACTORS
                .iter()
                .map(|(name, factor)| (name.to_string(), *factor))
                .collect(),
            default_ideal_price: 1800.0,
            ideal_price_range: ValueRange {
                min: 0.0,
                max: 10_000.0,
                step: 50.0,
            },
            default_band_factor: 0.05,
            band_factor_range: ValueRange {
                min: 0.02,
                max: 0.20,
                step: 0.01,
            },
            max_multiplier_shift: 0.4,
            shift_per_ten_pct_gap: 0.2,
            export_file_name: "estado_pricing_resultados.csv".to_string(),
        }
    }
}

impl PricingConfig {
    /// Load configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: PricingConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject ranges the model cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.target_rate > 0.0 && self.target_rate < 1.0) {
            bail!("target_rate must be in (0, 1), got {}", self.target_rate);
        }
        if self.implausible_threshold_pct <= 0.0 {
            bail!(
                "implausible_threshold_pct must be positive, got {}",
                self.implausible_threshold_pct
            );
        }
        if let Some((region, factor)) = self.region_factors.iter().find(|(_, f)| **f <= 0.0) {
            bail!("region factor for {region} must be positive, got {factor}");
        }

        let price = &self.ideal_price_range;
        if price.min < 0.0 || price.min > price.max {
            bail!("invalid ideal_price_range {}..{}", price.min, price.max);
        }
        let band = &self.band_factor_range;
        if band.min < 0.0 || band.max >= 1.0 || band.min > band.max {
            bail!("invalid band_factor_range {}..{}", band.min, band.max);
        }
        if !(price.min..=price.max).contains(&self.default_ideal_price) {
            bail!("default_ideal_price {} outside range", self.default_ideal_price);
        }
        if !(band.min..=band.max).contains(&self.default_band_factor) {
            bail!("default_band_factor {} outside range", self.default_band_factor);
        }
        if !(0.0..1.0).contains(&self.max_multiplier_shift) || self.shift_per_ten_pct_gap < 0.0 {
            bail!("simulator shift constants out of range");
        }
        Ok(())
    }
}
