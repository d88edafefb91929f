//! Price Simulator
//! Predicts conversion, enrollments and revenue for a proposed price in one state.

use super::{BandPosition, PriceBand, PricingError};
use crate::config::PricingConfig;

/// Inputs for a single-state simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInput {
    pub proposed_price: f64,
    /// Base conversion rate in percent (3.0 = 3%)
    pub base_conversion_pct: f64,
    pub leads: f64,
}

/// Result of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulation {
    pub proposed_price: f64,
    pub gap_pct: f64,
    pub position: BandPosition,
    pub multiplier: f64,
    /// Fractions, not percentages
    pub base_conversion: f64,
    pub predicted_conversion: f64,
    pub enrollments: u64,
    pub revenue: f64,
}

impl Simulation {
    pub fn message(&self) -> &'static str {
        self.position.message()
    }
}

/// Multiplier-based conversion model around a price band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSimulator {
    max_shift: f64,
    shift_per_ten_pct: f64,
}

impl Default for PriceSimulator {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

impl PriceSimulator {
    pub fn new(max_shift: f64, shift_per_ten_pct: f64) -> Self {
        Self {
            max_shift,
            shift_per_ten_pct,
        }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.max_multiplier_shift, config.shift_per_ten_pct_gap)
    }

    /// Percentage deviation of `price` from the band's ideal price.
    pub fn gap_pct(band: &PriceBand, price: f64) -> Result<f64, PricingError> {
        if band.ideal == 0.0 {
            return Err(PricingError::ZeroIdealPrice);
        }
        Ok((price - band.ideal) / band.ideal * 100.0)
    }

    /// Conversion multiplier for a band position and gap.
    pub fn multiplier(&self, position: BandPosition, gap_pct: f64) -> f64 {
        let shift = (gap_pct.abs() / 10.0 * self.shift_per_ten_pct).min(self.max_shift);
        match position {
            BandPosition::Below => 1.0 + shift,
            BandPosition::Above => 1.0 - shift,
            BandPosition::Within => 1.0,
        }
    }

    pub fn simulate(
        &self,
        band: &PriceBand,
        input: SimulationInput,
    ) -> Result<Simulation, PricingError> {
        let price = input.proposed_price;
        if !price.is_finite() || price < 0.0 {
            return Err(PricingError::InvalidPrice(price));
        }

        let gap_pct = Self::gap_pct(band, price)?;
        let position = band.position(price);
        let multiplier = self.multiplier(position, gap_pct);

        let base_conversion = input.base_conversion_pct / 100.0;
        let predicted_conversion = base_conversion * multiplier;
        let enrollments = (input.leads * predicted_conversion).floor().max(0.0) as u64;
        let revenue = enrollments as f64 * price;

        log::debug!(
            "simulate: price={price} gap={gap_pct:.2}% position={position:?} \
             mult={multiplier:.3} enrollments={enrollments}"
        );

        Ok(Simulation {
            proposed_price: price,
            gap_pct,
            position,
            multiplier,
            base_conversion,
            predicted_conversion,
            enrollments,
            revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> PriceBand {
        PriceBand::new(1800.0, 0.05).unwrap()
    }

    fn input(price: f64) -> SimulationInput {
        SimulationInput {
            proposed_price: price,
            base_conversion_pct: 3.0,
            leads: 1000.0,
        }
    }

    #[test]
    fn ideal_price_keeps_conversion() {
        let sim = PriceSimulator::default().simulate(&band(), input(1800.0)).unwrap();
        assert_eq!(sim.gap_pct, 0.0);
        assert_eq!(sim.multiplier, 1.0);
        assert_eq!(sim.position, BandPosition::Within);
        assert_eq!(sim.enrollments, 30);
        assert_eq!(sim.revenue, 54_000.0);
    }

    #[test]
    fn twenty_percent_below_hits_the_shift_cap() {
        let sim = PriceSimulator::default().simulate(&band(), input(1440.0)).unwrap();
        assert_eq!(sim.position, BandPosition::Below);
        assert_eq!(sim.multiplier, 1.4);
        assert!((sim.predicted_conversion - 0.042).abs() < 1e-12);
        // 1000 * (0.03 * 1.4) is just under 42 in binary floating point
        assert_eq!(sim.enrollments, 41);
        assert_eq!(sim.revenue, 41.0 * 1440.0);
    }

    #[test]
    fn twenty_percent_above_lowers_conversion() {
        let sim = PriceSimulator::default().simulate(&band(), input(2160.0)).unwrap();
        assert_eq!(sim.position, BandPosition::Above);
        assert!((sim.multiplier - 0.6).abs() < 1e-12);
        assert_eq!(sim.enrollments, 18);
    }

    #[test]
    fn small_gap_outside_band_scales_linearly() {
        // 1700 is below the 1710 floor, gap is -5.55%
        let sim = PriceSimulator::default().simulate(&band(), input(1700.0)).unwrap();
        assert_eq!(sim.position, BandPosition::Below);
        assert!((sim.multiplier - (1.0 + 5.0 / 9.0 * 0.2)).abs() < 1e-12);
    }

    #[test]
    fn shift_never_exceeds_cap() {
        let simulator = PriceSimulator::default();
        for price in [0.0, 100.0, 5000.0, 10_000.0] {
            let sim = simulator.simulate(&band(), input(price)).unwrap();
            assert!(sim.multiplier >= 0.6 - 1e-12 && sim.multiplier <= 1.4 + 1e-12);
        }
    }

    #[test]
    fn zero_ideal_price_is_rejected() {
        let band = PriceBand::new(0.0, 0.05).unwrap();
        let err = PriceSimulator::default().simulate(&band, input(100.0)).unwrap_err();
        assert_eq!(err, PricingError::ZeroIdealPrice);
    }

    #[test]
    fn invalid_proposed_price_is_rejected() {
        let simulator = PriceSimulator::default();
        assert!(simulator.simulate(&band(), input(-5.0)).is_err());
        assert!(simulator.simulate(&band(), input(f64::INFINITY)).is_err());
    }
}
