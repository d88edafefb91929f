//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{region_color, ChartPlotter, LeadsBar, LeadsChartData, PALETTE_RGB};
pub use renderer::StaticChartRenderer;
