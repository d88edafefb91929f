//! Pricing Dashboard Main Application
//! Main window with control panel and dashboard view.

use crate::charts::StaticChartRenderer;
use crate::config::PricingConfig;
use crate::data::DataLoader;
use crate::export::CsvExporter;
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView};
use crate::pricing::{Evaluation, ModelParams, PricingError, PricingModel};
use egui::SidePanel;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread.
/// The loader travels with the result so its file cache survives the round trip.
struct LoadResult {
    loader: DataLoader,
    result: Result<DataFrame, String>,
}

/// Main application window.
pub struct PricingApp {
    config: PricingConfig,
    loader: DataLoader,
    model: Option<PricingModel>,
    control_panel: ControlPanel,
    dashboard: DashboardView,

    // Recomputed whenever the parameters change
    last_params: Option<ModelParams>,
    evaluation: Option<Result<Evaluation, PricingError>>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl PricingApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: PricingConfig,
        initial_csv: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(&config),
            config,
            loader: DataLoader::new(),
            model: None,
            dashboard: DashboardView::new(),
            last_params: None,
            evaluation: None,
            load_rx: None,
            is_loading: false,
        };
        if let Some(path) = initial_csv {
            app.start_load(path);
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Load the CSV in a background thread; unchanged files come from the loader cache.
    fn start_load(&mut self, path: PathBuf) {
        self.control_panel.settings.csv_path = Some(path.clone());
        self.control_panel.set_status("Reading CSV file...");
        self.control_panel.is_busy = true;
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let mut loader = std::mem::take(&mut self.loader);
        thread::spawn(move || {
            let result = loader
                .load_csv(&path)
                .map(|df| df.clone())
                .map_err(|e| e.to_string());
            let _ = tx.send(LoadResult { loader, result });
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult { loader, result }) => {
                self.loader = loader;
                self.is_loading = false;
                self.control_panel.is_busy = false;
                match result {
                    Ok(df) => self.finish_load(df),
                    Err(error) => {
                        log::warn!("CSV load failed: {}", error);
                        self.control_panel.set_status(&format!("Error: {}", error));
                    }
                }
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: loader thread stopped");
                self.is_loading = false;
                self.control_panel.is_busy = false;
            }
        }
    }

    fn finish_load(&mut self, df: DataFrame) {
        let rows = df.height();
        match PricingModel::new(df, &self.config) {
            Ok(model) => {
                self.control_panel.update_states(model.states());
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} states",
                    rows,
                    model.states().len()
                ));
                self.dashboard.clear();
                self.model = Some(model);
                self.last_params = None;
            }
            Err(e) => {
                log::warn!("Cannot build pricing model: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Re-run the model when any parameter changed.
    fn refresh_evaluation(&mut self) {
        let Some(model) = &self.model else {
            self.evaluation = None;
            self.control_panel.export_enabled = false;
            return;
        };

        let params = self.control_panel.params();
        if self.last_params.as_ref() == Some(&params) {
            return;
        }

        let evaluation = model.evaluate(&params);
        if let Ok(evaluation) = &evaluation {
            self.dashboard.set_evaluation(evaluation);
        }
        self.control_panel.export_enabled = evaluation.is_ok();
        self.evaluation = Some(evaluation);
        self.last_params = Some(params);
    }

    /// Handle CSV export of the current evaluation
    fn handle_export_csv(&mut self) {
        let (Some(model), Some(Ok(evaluation))) = (&self.model, &self.evaluation) else {
            self.control_panel.set_status("Nothing to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&self.config.export_file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        let result = model
            .export_frame(evaluation)
            .map_err(|e| e.to_string())
            .and_then(|mut df| CsvExporter::write_csv(&mut df, &path).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                self.control_panel.set_status(&format!("Exported {}", path.display()));
                self.control_panel.last_export = Some(path);
            }
            Err(e) => {
                log::warn!("CSV export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Handle PNG export of the leads chart
    fn handle_export_chart(&mut self) {
        let data = self.dashboard.chart_data();
        if data.bars.is_empty() {
            self.control_panel.set_status("No chart to export");
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("leads_por_estado.png")
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::render_leads_png(data, &path, 1400, 800) {
            Ok(()) => {
                self.control_panel.set_status(&format!("Exported {}", path.display()));
                self.control_panel.last_export = Some(path);
            }
            Err(e) => {
                log::warn!("Chart export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_open_export(&mut self) {
        if let Some(path) = self.control_panel.last_export.clone() {
            if let Err(e) = open::that(&path) {
                log::warn!("Cannot open {}: {}", path.display(), e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for PricingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::ExportCsv => self.handle_export_csv(),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::OpenExport => self.handle_open_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        self.refresh_evaluation();

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard
                .show(ui, self.model.as_ref(), self.evaluation.as_ref());
        });
    }
}
