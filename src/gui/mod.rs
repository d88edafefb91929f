//! GUI module - User interface components

mod app;
mod control_panel;
mod dashboard_view;
pub mod format;

pub use app::PricingApp;
pub use control_panel::{ControlPanel, ControlPanelAction, UserSettings};
pub use dashboard_view::DashboardView;
