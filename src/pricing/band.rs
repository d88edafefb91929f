//! Price Band Calculator

use super::PricingError;

/// Where a price sits relative to the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPosition {
    Below,
    Within,
    Above,
}

impl BandPosition {
    /// Analyst-facing verdict for the simulator.
    pub fn message(&self) -> &'static str {
        match self {
            BandPosition::Below => "📉 Low price → conversion may improve",
            BandPosition::Within => "✔ Price within band → stable conversion",
            BandPosition::Above => "📈 High price → conversion may fall",
        }
    }
}

/// Acceptable price range around the ideal price: `ideal * (1 ∓ factor)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub ideal: f64,
    pub factor: f64,
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    pub fn new(ideal: f64, factor: f64) -> Result<Self, PricingError> {
        if !ideal.is_finite() || ideal < 0.0 || !(0.0..1.0).contains(&factor) {
            return Err(PricingError::InvalidBand { ideal, factor });
        }

        Ok(Self {
            ideal,
            factor,
            low: ideal * (1.0 - factor),
            high: ideal * (1.0 + factor),
        })
    }

    pub fn position(&self, price: f64) -> BandPosition {
        if price < self.low {
            BandPosition::Below
        } else if price > self.high {
            BandPosition::Above
        } else {
            BandPosition::Within
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_factor() {
        let band = PriceBand::new(1800.0, 0.05).unwrap();
        assert_eq!(band.low, 1710.0);
        assert_eq!(band.high, 1890.0);
    }

    #[test]
    fn low_ideal_high_ordering_holds_over_factor_range() {
        for ideal in [0.0, 1.0, 999.99, 1800.0, 10_000.0] {
            let mut factor = 0.02;
            while factor <= 0.20 + 1e-12 {
                let band = PriceBand::new(ideal, factor).unwrap();
                assert!(band.low <= band.ideal && band.ideal <= band.high);
                factor += 0.01;
            }
        }
    }

    #[test]
    fn edges_count_as_within() {
        let band = PriceBand::new(1000.0, 0.1).unwrap();
        assert_eq!(band.position(900.0), BandPosition::Within);
        assert_eq!(band.position(1100.0), BandPosition::Within);
        assert_eq!(band.position(899.99), BandPosition::Below);
        assert_eq!(band.position(1100.01), BandPosition::Above);
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert!(PriceBand::new(-1.0, 0.05).is_err());
        assert!(PriceBand::new(f64::NAN, 0.05).is_err());
        assert!(PriceBand::new(1800.0, 1.0).is_err());
        assert!(PriceBand::new(1800.0, -0.01).is_err());
    }
}
