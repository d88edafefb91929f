//! Chart Plotter Module
//! Leads-by-state bar chart using egui_plot.

use crate::data::NormalizedRecord;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Plot};
use std::collections::BTreeSet;

/// Region palette as RGB, shared with the static renderer.
pub const PALETTE_RGB: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (121, 85, 72),   // Brown
    (96, 125, 139),  // Blue Grey
];

pub fn region_color(index: usize) -> Color32 {
    let (r, g, b) = PALETTE_RGB[index % PALETTE_RGB.len()];
    Color32::from_rgb(r, g, b)
}

/// One bar: total leads of a state.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadsBar {
    pub state: String,
    pub region: String,
    pub leads: f64,
    /// Index into `LeadsChartData::regions`
    pub region_index: usize,
}

/// Bars sorted by leads, descending, plus the region legend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadsChartData {
    pub bars: Vec<LeadsBar>,
    pub regions: Vec<String>,
}

impl LeadsChartData {
    /// Sum leads per state; a state takes the region of its first row.
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let regions: Vec<String> = records
            .iter()
            .map(|r| r.region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut bars: Vec<LeadsBar> = Vec::new();
        for record in records {
            match bars.iter_mut().find(|b| b.state == record.state) {
                Some(bar) => bar.leads += record.leads,
                None => bars.push(LeadsBar {
                    state: record.state.clone(),
                    region: record.region.clone(),
                    leads: record.leads,
                    region_index: regions.iter().position(|r| *r == record.region).unwrap_or(0),
                }),
            }
        }

        bars.sort_by(|a, b| {
            b.leads
                .partial_cmp(&a.leads)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.state.cmp(&b.state))
        });

        Self { bars, regions }
    }

    pub fn max_leads(&self) -> f64 {
        self.bars.iter().map(|b| b.leads).fold(0.0, f64::max)
    }
}

pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the leads bar chart, one series per region for the legend.
    pub fn draw_leads_chart(ui: &mut egui::Ui, data: &LeadsChartData, height: f32) {
        if data.bars.is_empty() {
            ui.label(RichText::new("No leads to chart").color(Color32::GRAY));
            return;
        }

        let labels: Vec<String> = data.bars.iter().map(|b| b.state.clone()).collect();

        Plot::new("leads_by_state")
            .height(height)
            .legend(Legend::default())
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label("Leads")
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (region_index, region) in data.regions.iter().enumerate() {
                    let color = region_color(region_index);
                    let bars: Vec<Bar> = data
                        .bars
                        .iter()
                        .enumerate()
                        .filter(|(_, b)| b.region_index == region_index)
                        .map(|(i, b)| {
                            Bar::new(i as f64, b.leads)
                                .width(0.7)
                                .name(&b.state)
                                .fill(color)
                        })
                        .collect();
                    if bars.is_empty() {
                        continue;
                    }

                    let name = if region.is_empty() { "(no region)" } else { region };
                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(name));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: &str, region: &str, leads: f64) -> NormalizedRecord {
        NormalizedRecord {
            state: state.to_string(),
            region: region.to_string(),
            leads,
            raw_conversion_pct: 2.0,
            conversion_pct: 2.0,
            region_factor: 1.0,
            adjusted: false,
            converted_leads: 0,
        }
    }

    #[test]
    fn bars_are_summed_per_state_and_sorted() {
        let data = LeadsChartData::from_records(&[
            record("Oaxaca", "Sur", 1500.0),
            record("Jalisco", "Occidente", 8000.0),
            record("Oaxaca", "Sur", 7000.0),
            record("CDMX", "Centro", 8000.0),
        ]);

        let order: Vec<&str> = data.bars.iter().map(|b| b.state.as_str()).collect();
        assert_eq!(order, vec!["Oaxaca", "CDMX", "Jalisco"]);
        assert_eq!(data.bars[0].leads, 8500.0);
        assert_eq!(data.regions, vec!["Centro", "Occidente", "Sur"]);
        assert_eq!(data.bars[0].region_index, 2);
        assert_eq!(data.max_leads(), 8500.0);
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(region_color(0), region_color(PALETTE_RGB.len()));
    }
}
