//! Row types extracted from the loaded DataFrame.

/// One loaded row: a state with its lead estimate and raw conversion rate.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub state: String,
    pub region: String,
    pub leads: f64,
    /// Percent, as read from the CSV after cleaning
    pub conversion_pct: f64,
}

/// A row after the conversion heuristic has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub state: String,
    pub region: String,
    pub leads: f64,
    pub raw_conversion_pct: f64,
    pub conversion_pct: f64,
    pub region_factor: f64,
    /// True when the raw value was replaced
    pub adjusted: bool,
    pub converted_leads: i64,
}
