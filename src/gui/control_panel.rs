//! Control Panel Widget
//! Left side panel with data source, model parameters and state filter.

use crate::config::{PricingConfig, ValueRange};
use crate::pricing::ModelParams;
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// User settings for the pricing model
#[derive(Clone, Debug)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub ideal_price: f64,
    pub band_factor: f64,
}

/// Left side control panel with file selection and model parameters.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub states: Vec<String>,
    pub selected_states: Vec<bool>,
    pub status: String,
    pub is_busy: bool,
    pub export_enabled: bool,
    pub last_export: Option<PathBuf>,
    price_range: ValueRange,
    band_range: ValueRange,
}

impl ControlPanel {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            settings: UserSettings {
                csv_path: None,
                ideal_price: config.default_ideal_price,
                band_factor: config.default_band_factor,
            },
            states: Vec::new(),
            selected_states: Vec::new(),
            status: "Ready".to_string(),
            is_busy: false,
            export_enabled: false,
            last_export: None,
            price_range: config.ideal_price_range,
            band_range: config.band_factor_range,
        }
    }

    /// Replace the available states; every state starts selected.
    pub fn update_states(&mut self, states: &[String]) {
        self.states = states.to_vec();
        self.selected_states = vec![true; states.len()];
    }

    pub fn get_selected_states(&self) -> Vec<String> {
        self.states
            .iter()
            .zip(self.selected_states.iter())
            .filter(|(_, &selected)| selected)
            .map(|(state, _)| state.clone())
            .collect()
    }

    /// Current model request built from the controls.
    pub fn params(&self) -> ModelParams {
        ModelParams {
            ideal_price: self.price_range.clamp(self.settings.ideal_price),
            band_factor: self.band_range.clamp(self.settings.band_factor),
            selected_states: self.get_selected_states().into_iter().collect(),
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("💲 Pricing by State")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Factor X Model").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📂 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    let path_color = if self.settings.csv_path.is_some() {
                        ui.visuals().strong_text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(path_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!self.is_busy, |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Model Parameters =====
        ui.label(RichText::new("⚙ Model Parameters").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 130.0;
        let price = self.price_range;
        let band = self.band_range;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Ideal price (MXN):"));
            ui.add(
                egui::DragValue::new(&mut self.settings.ideal_price)
                    .range(price.min..=price.max)
                    .speed(price.step)
                    .fixed_decimals(2),
            );
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Factor X (band):"));
            ui.add(
                egui::Slider::new(&mut self.settings.band_factor, band.min..=band.max)
                    .step_by(band.step)
                    .fixed_decimals(2),
            );
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== State Filter =====
        ui.label(RichText::new("🗺 Filter by State").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                    if self.states.is_empty() {
                        ui.label(RichText::new("Load a CSV to list states").color(Color32::GRAY));
                    }
                    for (i, state) in self.states.iter().enumerate() {
                        if i < self.selected_states.len() {
                            ui.checkbox(&mut self.selected_states[i], state);
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.selected_states.iter_mut().for_each(|v| *v = true);
            }
            if ui.small_button("Clear All").clicked() {
                self.selected_states.iter_mut().for_each(|v| *v = false);
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("⬇ Download CSV").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }

                ui.add_space(8.0);

                let png_button = egui::Button::new(RichText::new("🖼 Save Chart PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportChart;
                }
            });

            if self.last_export.is_some() {
                ui.add_space(5.0);
                if ui.small_button("Open last export").clicked() {
                    action = ControlPanelAction::OpenExport;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        if self.is_busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&self.status).size(11.0));
            });
        } else {
            let status_color = if self.status.contains("Error") {
                Color32::from_rgb(220, 53, 69)
            } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
                Color32::from_rgb(40, 167, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    ExportCsv,
    ExportChart,
    OpenExport,
}
