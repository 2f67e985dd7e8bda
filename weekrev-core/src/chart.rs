//! Bar-chart rendering for one report section.

use anyhow::{Context as _, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

pub const CHART_WIDTH: u32 = 900;
pub const CHART_HEIGHT: u32 = 520;

const TITLE_AREA_HEIGHT: i32 = 58;
// Category labels are drawn rotated, so the bottom label area has to be
// tall enough to hold a full label.
const X_LABEL_AREA: i32 = 110;
const Y_LABEL_AREA: i32 = 48;

/// Renders `totals` as a single-series PNG bar chart: one bar per label
/// in the given order, the count printed above each non-zero bar, and
/// rotated category labels. An empty list still produces a chart, just
/// with no bars.
pub fn render_chart(
    title: &str,
    subtitle: &str,
    totals: &[(String, u64)],
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("failed to prepare chart canvas {}", path.display()))?;

    let (header, plot) = root.split_vertically(TITLE_AREA_HEIGHT);
    draw_header(&header, title, subtitle)?;

    let bars = totals.len() as u32;
    let max_count = totals.iter().map(|(_, count)| *count).max().unwrap_or(0);
    // Headroom above the tallest bar for its value annotation.
    let y_max = max_count + max_count / 10 + 1;

    let mut chart = ChartBuilder::on(&plot)
        .margin(12)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d((0u32..bars.max(1)).into_segmented(), 0u64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.max(1) as usize)
        .x_label_formatter(&|segment| segment_label(totals, segment))
        .x_label_style(("sans-serif", 13).into_font().transform(FontTransform::Rotate90))
        .y_desc("Tickets")
        .draw()?;

    if bars > 0 {
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.65).filled())
                .margin(6)
                .data(
                    totals
                        .iter()
                        .enumerate()
                        .map(|(index, (_, count))| (index as u32, *count)),
                ),
        )?;

        let annotation = TextStyle::from(("sans-serif", 13).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(
            totals
                .iter()
                .enumerate()
                .filter(|(_, (_, count))| *count > 0)
                .map(|(index, (_, count))| {
                    Text::new(
                        count.to_string(),
                        (SegmentValue::CenterOf(index as u32), *count),
                        annotation.clone(),
                    )
                }),
        )?;
    }

    root.present()
        .with_context(|| format!("failed to write chart {}", path.display()))?;
    Ok(())
}

fn draw_header<DB: DrawingBackend>(
    header: &DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    subtitle: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (width, _) = header.dim_in_pixel();
    let center = (width / 2) as i32;
    let anchored = Pos::new(HPos::Center, VPos::Top);

    header
        .draw(&Text::new(
            title.to_string(),
            (center, 8),
            TextStyle::from(("sans-serif", 18).into_font()).pos(anchored),
        ))
        .map_err(|error| anyhow::anyhow!("failed to draw chart title: {}", error))?;
    header
        .draw(&Text::new(
            subtitle.to_string(),
            (center, 34),
            TextStyle::from(("sans-serif", 12).into_font())
                .color(&BLACK.mix(0.65))
                .pos(anchored),
        ))
        .map_err(|error| anyhow::anyhow!("failed to draw chart subtitle: {}", error))?;

    Ok(())
}

fn segment_label(totals: &[(String, u64)], segment: &SegmentValue<u32>) -> String {
    let index = match segment {
        SegmentValue::CenterOf(index) | SegmentValue::Exact(index) => *index as usize,
        SegmentValue::Last => return String::new(),
    };
    totals
        .get(index)
        .map(|(label, _)| label.clone())
        .unwrap_or_default()
}
