#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use crate::error::{DashboardError, DashboardResult};
use crate::graph::{Chart, ChartData, ChartType, Series, Slice};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::f64::consts::PI;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Qualitative colours, cycled by series or slice index
const PALETTE: [RGBColor; 10] = [
    RGBColor(99, 110, 250),
    RGBColor(239, 85, 59),
    RGBColor(0, 204, 150),
    RGBColor(171, 99, 250),
    RGBColor(255, 161, 90),
    RGBColor(25, 211, 243),
    RGBColor(255, 102, 146),
    RGBColor(182, 232, 128),
    RGBColor(255, 151, 255),
    RGBColor(254, 203, 82),
];

fn palette(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Rasterises a chart into PNG bytes
///
/// # Arguments
/// * `chart` - Chart produced by `graph::render`
/// * `width` - Width of the image in pixels
/// * `height` - Height of the image in pixels
///
/// # Returns
/// * `DashboardResult<Vec<u8>>` - The encoded PNG, or a `Render` error
///
/// # Implementation Notes
/// * Draws into an in-memory RGB buffer, no temporary files are involved
/// * Bars sharing a category are stacked, positive and negative values apart
pub fn draw_png(chart: &Chart, width: u32, height: u32) -> DashboardResult<Vec<u8>> {
    if !values_are_finite(chart) {
        return Err(DashboardError::Render(
            "chart contains non-finite values".to_string(),
        ));
    }

    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    draw_into(chart, &mut pixels, width, height)
        .map_err(|e| DashboardError::Render(e.to_string()))?;

    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(&pixels, width, height, image::ColorType::Rgb8)
        .map_err(|e| DashboardError::Render(e.to_string()))?;
    Ok(png)
}

fn draw_into(
    chart: &Chart,
    pixels: &mut [u8],
    width: u32,
    height: u32,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::with_buffer(pixels, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    match &chart.data {
        ChartData::Cartesian { categories, series } => {
            draw_cartesian(&root, chart, categories, series)?
        }
        ChartData::Pie { slices } => draw_pie(&root, &chart.title, slices)?,
    }

    root.present()?;
    Ok(())
}

fn draw_cartesian(
    root: &Canvas,
    chart: &Chart,
    categories: &[String],
    series: &[Series],
) -> Result<(), Box<dyn Error>> {
    let slots = categories.len().max(1);
    let (y_min, y_max) = value_range(chart.chart_type, categories, series);

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 26).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(slots as f64 - 0.5), y_min..y_max)?;

    let x_labels = |x: &f64| category_label(categories, *x);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(&x_labels)
        .x_desc(&chart.x_label)
        .y_desc(&chart.y_label)
        .draw()?;

    let slot_of = |x: &str| categories.iter().position(|c| c == x).unwrap_or(0) as f64;

    match chart.chart_type {
        ChartType::Bar => {
            let mut above = vec![0.0; slots];
            let mut below = vec![0.0; slots];
            for (idx, s) in series.iter().enumerate() {
                let color = palette(idx);
                let mut bars = Vec::with_capacity(s.points.len());
                for point in &s.points {
                    let slot = slot_of(&point.x);
                    let base = if point.y >= 0.0 {
                        &mut above[slot as usize]
                    } else {
                        &mut below[slot as usize]
                    };
                    let bottom = *base;
                    *base += point.y;
                    bars.push(Rectangle::new(
                        [(slot - 0.4, bottom), (slot + 0.4, *base)],
                        color.filled(),
                    ));
                }
                ctx.draw_series(bars)?;
            }
        }
        ChartType::Line => {
            for s in series {
                let points: Vec<(f64, f64)> = s.points.iter().map(|p| (slot_of(&p.x), p.y)).collect();
                ctx.draw_series(LineSeries::new(points.clone(), palette(0).stroke_width(2)))?;
                ctx.draw_series(
                    points
                        .into_iter()
                        .map(|p| Circle::new(p, 3, palette(0).filled())),
                )?;
            }
        }
        ChartType::Area => {
            for s in series {
                ctx.draw_series(
                    AreaSeries::new(
                        s.points.iter().map(|p| (slot_of(&p.x), p.y)),
                        0.0,
                        palette(0).mix(0.3),
                    )
                    .border_style(palette(0).stroke_width(2)),
                )?;
            }
        }
        ChartType::Pie => {}
    }

    Ok(())
}

fn draw_pie(root: &Canvas, title: &str, slices: &[Slice]) -> Result<(), Box<dyn Error>> {
    let area = root.titled(title, ("sans-serif", 26).into_font())?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 * 0.35;

    // first slice starts at twelve o'clock, clockwise
    let mut start = -PI / 2.0;
    for (idx, slice) in slices.iter().enumerate() {
        if slice.fraction <= 0.0 {
            continue;
        }
        let sweep = slice.fraction * 2.0 * PI;
        let mid = start + sweep / 2.0;
        let offset = slice.pull * radius;
        let (cx, cy) = (center.0 + offset * mid.cos(), center.1 + offset * mid.sin());

        let steps = (sweep.to_degrees().ceil() as usize).max(2);
        let mut outline = Vec::with_capacity(steps + 2);
        outline.push((cx.round() as i32, cy.round() as i32));
        for step in 0..=steps {
            let angle = start + sweep * step as f64 / steps as f64;
            outline.push((
                (cx + radius * angle.cos()).round() as i32,
                (cy + radius * angle.sin()).round() as i32,
            ));
        }
        area.draw(&Polygon::new(outline, palette(idx).filled()))?;

        let reach = radius * (1.0 + slice.pull) + 12.0;
        let anchor = (
            (center.0 + reach * mid.cos()).round() as i32,
            (center.1 + reach * mid.sin()).round() as i32,
        );
        let h_pos = if mid.cos() >= 0.0 { HPos::Left } else { HPos::Right };
        let style = TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(h_pos, VPos::Center));
        area.draw(&Text::new(slice.label.clone(), anchor, style))?;

        start += sweep;
    }

    Ok(())
}

// Sums can overflow even when every cell is finite
fn values_are_finite(chart: &Chart) -> bool {
    match &chart.data {
        ChartData::Cartesian { series, .. } => series
            .iter()
            .flat_map(|s| &s.points)
            .all(|p| p.y.is_finite()),
        ChartData::Pie { slices } => slices
            .iter()
            .all(|s| s.value.is_finite() && s.fraction.is_finite()),
    }
}

fn value_range(chart_type: ChartType, categories: &[String], series: &[Series]) -> (f64, f64) {
    let mut lo = 0.0_f64;
    let mut hi = 0.0_f64;

    if chart_type == ChartType::Bar {
        let mut above = vec![0.0_f64; categories.len().max(1)];
        let mut below = vec![0.0_f64; categories.len().max(1)];
        for point in series.iter().flat_map(|s| &s.points) {
            let slot = categories.iter().position(|c| c == &point.x).unwrap_or(0);
            if point.y >= 0.0 {
                above[slot] += point.y;
            } else {
                below[slot] += point.y;
            }
        }
        hi = above.into_iter().fold(hi, f64::max);
        lo = below.into_iter().fold(lo, f64::min);
    } else {
        for point in series.iter().flat_map(|s| &s.points) {
            hi = hi.max(point.y);
            lo = lo.min(point.y);
        }
    }

    if hi - lo < f64::EPSILON {
        hi = lo + 1.0;
    }
    let pad = (hi - lo) * 0.05;
    (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
}

fn category_label(categories: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    categories.get(slot as usize).cloned().unwrap_or_default()
}
