//! Static Chart Renderer
//! Renders the leads-by-state chart to a PNG file with plotters.
//!
//! Layout:
//! 1. Caption centered at the top
//! 2. One bar per state, sorted by leads, colored by region
//! 3. Region legend in the upper right corner

use crate::charts::{LeadsChartData, PALETTE_RGB};
use plotters::prelude::*;
use std::path::Path;

const CAPTION: &str = "Leads by state";
const FONT: &str = "sans-serif";

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    fn region_rgb(index: usize) -> RGBColor {
        let (r, g, b) = PALETTE_RGB[index % PALETTE_RGB.len()];
        RGBColor(r, g, b)
    }

    /// Render the chart to `path` as PNG.
    pub fn render_leads_png(
        data: &LeadsChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = data.bars.len().max(1);
        let y_max = (data.max_leads() * 1.1).max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption(CAPTION, (FONT, 28))
            .margin(20)
            .x_label_area_size(90)
            .y_label_area_size(70)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)?;

        let label_for = |seg: &SegmentValue<usize>| match seg {
            SegmentValue::CenterOf(i) => data
                .bars
                .get(*i)
                .map(|b| b.state.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&label_for)
            .x_label_style(
                (FONT, 13)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_desc("Leads")
            .draw()?;

        for (region_index, region) in data.regions.iter().enumerate() {
            let color = Self::region_rgb(region_index);
            let bars: Vec<Rectangle<(SegmentValue<usize>, f64)>> = data
                .bars
                .iter()
                .enumerate()
                .filter(|(_, b)| b.region_index == region_index)
                .map(|(i, b)| {
                    let mut rect = Rectangle::new(
                        [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), b.leads)],
                        color.filled(),
                    );
                    rect.set_margin(0, 0, 6, 6);
                    rect
                })
                .collect();
            if bars.is_empty() {
                continue;
            }

            let label = if region.is_empty() { "(no region)" } else { region.as_str() };
            chart
                .draw_series(bars)?
                .label(label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        log::info!("Chart PNG written to {}", path.display());
        Ok(())
    }
}
