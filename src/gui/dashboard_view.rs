//! Dashboard View
//! Central panel: KPIs, leads chart, summary and price tables, price simulator.

use crate::charts::{ChartPlotter, LeadsChartData};
use crate::gui::format;
use crate::pricing::{BandPosition, Evaluation, PricingError, PricingModel};
use egui::{Color32, ComboBox, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 400.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(255, 193, 7);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Scrollable dashboard for one evaluation.
pub struct DashboardView {
    chart: LeadsChartData,
    sim_state: String,
    proposed_price: f64,
    /// Ideal price the proposed price was last reset to
    last_ideal: Option<f64>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            chart: LeadsChartData::default(),
            sim_state: String::new(),
            proposed_price: 0.0,
            last_ideal: None,
        }
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn chart_data(&self) -> &LeadsChartData {
        &self.chart
    }

    /// Refresh derived view state after a new evaluation.
    pub fn set_evaluation(&mut self, evaluation: &Evaluation) {
        self.chart = LeadsChartData::from_records(&evaluation.records);

        let states = evaluation.states();
        if !states.contains(&self.sim_state) {
            self.sim_state = states.iter().min().cloned().unwrap_or_default();
        }

        // Proposed price follows the ideal price until the user edits it
        if self.last_ideal != Some(evaluation.band.ideal) {
            self.proposed_price = evaluation.band.ideal;
            self.last_ideal = Some(evaluation.band.ideal);
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        model: Option<&PricingModel>,
        evaluation: Option<&Result<Evaluation, PricingError>>,
    ) {
        let (Some(model), Some(evaluation)) = (model, evaluation) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("⬅ Load a CSV file to begin.").size(20.0));
            });
            return;
        };

        let evaluation = match evaluation {
            Ok(evaluation) => evaluation,
            Err(PricingError::EmptySelection) => {
                Self::banner(ui, "⚠ No data for the selected states.", WARNING_COLOR);
                return;
            }
            Err(e) => {
                Self::banner(ui, &format!("Error: {}", e), ERROR_COLOR);
                return;
            }
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Pricing Dashboard by State · Factor X Model");
                ui.add_space(10.0);

                Self::draw_kpis(ui, evaluation);
                ui.add_space(15.0);

                ui.label(RichText::new("Leads and conversion by state").size(16.0).strong());
                ui.add_space(5.0);
                ChartPlotter::draw_leads_chart(ui, &self.chart, CHART_HEIGHT);
                ui.add_space(10.0);
                Self::draw_summary_table(ui, evaluation);

                ui.add_space(15.0);
                ui.separator();
                ui.label(RichText::new("Recommended price by state").size(16.0).strong());
                ui.add_space(5.0);
                Self::draw_price_table(ui, evaluation);

                ui.add_space(15.0);
                ui.separator();
                ui.label(RichText::new("Price simulator by state").size(16.0).strong());
                ui.add_space(5.0);
                self.draw_simulator(ui, model, evaluation);
            });
    }

    fn banner(ui: &mut egui::Ui, text: &str, color: Color32) {
        egui::Frame::none()
            .stroke(egui::Stroke::new(1.5, color))
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(text).size(15.0).color(color));
            });
    }

    fn metric_card(ui: &mut egui::Ui, label: &str, value: &str) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .rounding(14.0)
            .inner_margin(egui::Margin::symmetric(16.0, 12.0))
            .show(ui, |ui| {
                ui.set_min_width(150.0);
                ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                ui.label(RichText::new(value).size(22.0).strong());
            });
    }

    fn draw_kpis(ui: &mut egui::Ui, evaluation: &Evaluation) {
        let summary = &evaluation.summary;
        ui.columns(4, |cols| {
            Self::metric_card(
                &mut cols[0],
                "Estimated leads",
                &format::thousands(summary.total_leads as i64),
            );
            Self::metric_card(
                &mut cols[1],
                "Converted leads",
                &format::thousands(summary.total_converted),
            );
            Self::metric_card(
                &mut cols[2],
                "Conversion rate",
                &format!("{:.2}%", summary.conversion_rate_pct),
            );
            Self::metric_card(&mut cols[3], "Active states", &summary.active_states.to_string());
        });
    }

    fn header(ui: &mut egui::Ui, names: &[&str]) {
        for name in names {
            ui.label(RichText::new(*name).strong().size(12.0));
        }
        ui.end_row();
    }

    fn draw_summary_table(ui: &mut egui::Ui, evaluation: &Evaluation) {
        let mut rows: Vec<_> = evaluation.records.iter().collect();
        rows.sort_by(|a, b| b.leads.partial_cmp(&a.leads).unwrap_or(std::cmp::Ordering::Equal));

        egui::Grid::new("summary_table")
            .striped(true)
            .min_col_width(80.0)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                Self::header(
                    ui,
                    &[
                        "Estado",
                        "Region",
                        "Leads_estimados",
                        "Conversion_Rate",
                        "Leads_convertidos",
                    ],
                );
                for r in rows {
                    ui.label(&r.state);
                    ui.label(&r.region);
                    ui.label(format::thousands(r.leads as i64));
                    let conversion = RichText::new(format!("{:.2}", r.conversion_pct));
                    if r.adjusted {
                        ui.label(conversion.color(WARNING_COLOR))
                            .on_hover_text(format!("Adjusted from {:.2}%", r.raw_conversion_pct));
                    } else {
                        ui.label(conversion);
                    }
                    ui.label(format::thousands(r.converted_leads));
                    ui.end_row();
                }
            });
    }

    fn draw_price_table(ui: &mut egui::Ui, evaluation: &Evaluation) {
        egui::Grid::new("price_table")
            .striped(true)
            .min_col_width(80.0)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                Self::header(ui, &["Estado", "Region", "Precio_Ideal", "Banda_Baja", "Banda_Alta"]);
                for row in &evaluation.price_rows {
                    ui.label(&row.state);
                    ui.label(&row.region);
                    ui.label(format!("{:.2}", row.ideal));
                    ui.label(format!("{:.2}", row.low));
                    ui.label(format!("{:.2}", row.high));
                    ui.end_row();
                }
            });
    }

    fn draw_simulator(&mut self, ui: &mut egui::Ui, model: &PricingModel, evaluation: &Evaluation) {
        let mut states = evaluation.states();
        states.sort();

        ui.horizontal(|ui| {
            ui.label("State:");
            ComboBox::from_id_salt("sim_state")
                .width(180.0)
                .selected_text(&self.sim_state)
                .show_ui(ui, |ui| {
                    for state in &states {
                        ui.selectable_value(&mut self.sim_state, state.clone(), state);
                    }
                });

            ui.add_space(20.0);
            ui.label("Proposed price (MXN):");
            ui.add(
                egui::DragValue::new(&mut self.proposed_price)
                    .range(0.0..=f64::MAX)
                    .speed(10.0)
                    .fixed_decimals(2),
            );
        });

        ui.add_space(8.0);

        match model.simulate(evaluation, &self.sim_state, self.proposed_price) {
            Ok(sim) => {
                let color = match sim.position {
                    BandPosition::Below => Color32::from_rgb(40, 167, 69),
                    BandPosition::Within => ui.visuals().text_color(),
                    BandPosition::Above => ERROR_COLOR,
                };
                ui.label(RichText::new(sim.message()).size(14.0).color(color));
                ui.label(
                    RichText::new(format!(
                        "Gap vs ideal: {:+.2}% · multiplier ×{:.3}",
                        sim.gap_pct, sim.multiplier
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
                ui.add_space(8.0);

                ui.columns(4, |cols| {
                    Self::metric_card(
                        &mut cols[0],
                        "Base conversion",
                        &format::percent(sim.base_conversion),
                    );
                    Self::metric_card(
                        &mut cols[1],
                        "Estimated conversion",
                        &format::percent(sim.predicted_conversion),
                    );
                    Self::metric_card(
                        &mut cols[2],
                        "Estimated enrollments",
                        &format::thousands(sim.enrollments as i64),
                    );
                    Self::metric_card(
                        &mut cols[3],
                        "Estimated revenue",
                        &format::currency(sim.revenue),
                    );
                });
            }
            Err(e) => {
                ui.label(
                    RichText::new(format!("Simulation unavailable: {}", e)).color(ERROR_COLOR),
                );
            }
        }
    }
}
