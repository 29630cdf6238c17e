use chrono::{Duration, NaiveDate, Utc};
use image::{ExtendedColorType, ImageEncoder, codecs::png::PngEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::{
    error::ChartError,
    model::{DailyRecord, DailySeries, capitalize},
};

/// Canvas size of the rendered chart, in pixels.
const WIDTH: u32 = 1200;
const HEIGHT: u32 = 1000;
/// Vertical gap between the temperature and wind panels.
const PANEL_GAP: u32 = 40;

/// Render the 30-day history as a two-panel PNG: min/max temperature lines
/// on top, wind-speed bars below, sharing a day-granular time axis.
///
/// Draws into a memory buffer, so no display surface is needed. An empty
/// series produces a valid chart with empty panels.
pub fn render_history_chart(series: &DailySeries, city: &str) -> Result<Vec<u8>, ChartError> {
    let mut rgb = vec![0u8; (WIDTH * HEIGHT * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut rgb, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(to_chart_err)?;

        // temperature : wind = 3 : 1
        let (upper, lower) = root.split_vertically((HEIGHT - PANEL_GAP) * 3 / 4);
        let lower = lower.margin(PANEL_GAP, 0, 0, 0);

        let (start, end) = date_range(series);
        draw_temperature_panel(&upper, series, city, start, end)?;
        draw_wind_panel(&lower, series, city, start, end)?;

        root.present().map_err(to_chart_err)?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&rgb, WIDTH, HEIGHT, ExtendedColorType::Rgb8)
        .map_err(|e| ChartError(e.to_string()))?;

    Ok(png)
}

fn draw_temperature_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    series: &DailySeries,
    city: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), ChartError> {
    let (lo, hi) = temp_bounds(series);

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Temperature in {}", capitalize(city)), ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d((start..end).into_segmented(), lo..hi)
        .map_err(to_chart_err)?;

    chart
        .configure_mesh()
        .x_labels(series.len().max(2) / 2 + 1)
        .x_label_formatter(&day_month_label)
        .x_label_style(x_label_style())
        .y_desc("Temperature (°C)")
        .light_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(to_chart_err)?;

    for (i, run) in contiguous_runs(series, |r| r.min_temp_c).iter().enumerate() {
        let anno = chart
            .draw_series(DashedLineSeries::new(
                run.iter().cloned(),
                5,
                4,
                BLUE.stroke_width(1),
            ))
            .map_err(to_chart_err)?;
        if i == 0 {
            anno.label("Minimum t°C")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
        }
    }

    for (i, run) in contiguous_runs(series, |r| r.max_temp_c).iter().enumerate() {
        let anno = chart
            .draw_series(DashedLineSeries::new(
                run.iter().cloned(),
                5,
                4,
                RED.stroke_width(1),
            ))
            .map_err(to_chart_err)?;
        if i == 0 {
            anno.label("Maximum t°C")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(to_chart_err)?;

    Ok(())
}

fn draw_wind_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    series: &DailySeries,
    city: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), ChartError> {
    let max_wind = series
        .iter()
        .filter_map(|r| r.wind_speed_mps)
        .fold(f32::NEG_INFINITY, f32::max);
    let top = if max_wind.is_finite() && max_wind > 0.0 {
        max_wind * 1.1
    } else {
        1.0
    };

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Wind speed in {}", capitalize(city)), ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d((start..end).into_segmented(), 0f32..top)
        .map_err(to_chart_err)?;

    chart
        .configure_mesh()
        .x_labels(series.len().max(2) / 2 + 1)
        .x_label_formatter(&day_month_label)
        .x_label_style(x_label_style())
        .y_desc("Wind (m/s)")
        .light_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(to_chart_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(GREEN.mix(0.5).filled())
                .margin(3)
                .data(
                    series
                        .iter()
                        .filter_map(|r| r.wind_speed_mps.map(|w| (r.date, w))),
                ),
        )
        .map_err(to_chart_err)?;

    Ok(())
}

/// Axis range covering the series, or a one-day fallback so degenerate and
/// empty series still produce a drawable chart.
fn date_range(series: &DailySeries) -> (NaiveDate, NaiveDate) {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if first.date < last.date => (first.date, last.date),
        (Some(only), Some(_)) => (only.date - Duration::days(1), only.date),
        _ => {
            let today = Utc::now().date_naive();
            (today - Duration::days(1), today)
        }
    }
}

fn temp_bounds(series: &DailySeries) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for record in series {
        for value in [record.min_temp_c, record.max_temp_c].into_iter().flatten() {
            lo = lo.min(value);
            hi = hi.max(value);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    // pad the value range so the lines don't hug the frame
    let padding = if (hi - lo).abs() > f32::EPSILON {
        (hi - lo) * 0.1
    } else {
        1.0
    };
    (lo - padding, hi + padding)
}

/// Split a per-day value into runs of consecutive present values, so missing
/// days break the line instead of being interpolated across.
fn contiguous_runs(
    series: &DailySeries,
    value: impl Fn(&DailyRecord) -> Option<f32>,
) -> Vec<Vec<(SegmentValue<NaiveDate>, f32)>> {
    let mut runs = Vec::new();
    let mut run: Vec<(SegmentValue<NaiveDate>, f32)> = Vec::new();

    for record in series {
        match value(record) {
            Some(v) => run.push((SegmentValue::CenterOf(record.date), v)),
            None => {
                if !run.is_empty() {
                    runs.push(std::mem::take(&mut run));
                }
            }
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }
    runs
}

fn day_month_label(value: &SegmentValue<NaiveDate>) -> String {
    match value {
        SegmentValue::Exact(d) | SegmentValue::CenterOf(d) => d.format("%d.%m").to_string(),
        SegmentValue::Last => String::new(),
    }
}

fn x_label_style() -> FontDesc<'static> {
    ("sans-serif", 14).into_font().transform(FontTransform::Rotate90)
}

fn to_chart_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError(err.to_string())
}
