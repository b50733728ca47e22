//! Drawing the stack comparison chart.
use crate::simulation::CostTable;
use anyhow::Result;
use log::warn;
use plotters::prelude::*;
use std::path::Path;

/// Size of the chart in pixels
const CHART_SIZE: (u32, u32) = (1200, 700);

/// Headroom above the largest value on the y axis
const Y_AXIS_HEADROOM: f64 = 1.05;

/// Draw a line chart of monthly cost with one line per stack and save it as SVG.
///
/// Nothing is drawn for an empty table.
pub fn draw_chart(file_path: &Path, title: &str, table: &CostTable) -> Result<()> {
    let Some(max_total) = table.max_total() else {
        warn!("No months to plot; skipping chart");
        return Ok(());
    };

    let last_month = table.months().last().map_or(1, |record| record.month);
    let y_max = if max_total.value() > 0.0 {
        max_total.value() * Y_AXIS_HEADROOM
    } else {
        1.0
    };

    let root = SVGBackend::new(file_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(1u32..last_month.max(2), 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Monthly Cost ($)")
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()?;

    for (idx, stack_id) in table.stack_ids().iter().enumerate() {
        let colour = Palette99::pick(idx).to_rgba();
        let points: Vec<(u32, f64)> = table
            .months()
            .iter()
            .map(|record| (record.month, record.totals[idx].value()))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), colour.stroke_width(2)))?
            .label(stack_id.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
            });

        chart.draw_series(
            points
                .into_iter()
                .map(|point| Circle::new(point, 3, colour.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}
