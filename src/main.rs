//! Factor X Pricing - State pricing dashboard
//!
//! Desktop front end for the pricing model.

use anyhow::{anyhow, Result};
use eframe::egui;
use factor_x_pricing::config::PricingConfig;
use factor_x_pricing::gui::PricingApp;
use std::env;
use std::path::PathBuf;

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match arg_value(&args, "--config") {
        Some(path) => PricingConfig::load(path)?,
        None => PricingConfig::default(),
    };
    let initial_csv = arg_value(&args, "--csv").map(PathBuf::from);
    log::info!(
        "Starting with ideal price {} and band factor {}",
        config.default_ideal_price,
        config.default_band_factor
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Pricing by State · Factor X"),
        ..Default::default()
    };

    eframe::run_native(
        "Factor X Pricing",
        options,
        Box::new(move |cc| Ok(Box::new(PricingApp::new(cc, config, initial_csv)))),
    )
    .map_err(|e| anyhow!("GUI error: {e}"))
}
