//! SVG bar charts comparing the regime groups.
//!
//! Charts are plain SVG strings: one grouped bar per category with one bar
//! per group, a zero line, category labels, and a legend.

use crate::study::StudyResult;

const WIDTH: f64 = 576.0;
const HEIGHT: f64 = 288.0;
const PADDING: f64 = 36.0;
const LEGEND_WIDTH: f64 = 96.0;
const PALETTE: [&str; 6] = ["#348dc1", "#ff9933", "#af4b64", "#4fa487", "#8c8c8c", "#9b59b6"];

/// Mean, median, and variance of every group side by side.
pub fn comparison_chart(result: &StudyResult) -> String {
    let categories = vec!["mean".to_string(), "median".to_string(), "variance".to_string()];
    let series: Vec<(String, Vec<Option<f64>>)> = result
        .groups
        .iter()
        .map(|g| {
            (
                g.key.clone(),
                vec![g.stats.mean, g.stats.median, g.stats.variance],
            )
        })
        .collect();
    grouped_bar_chart("Central tendency by regime", &categories, &series, WIDTH)
}

/// Yearly returns of every group, keyed by year.
pub fn yearly_returns_chart(result: &StudyResult) -> String {
    let table = result.combined_yearly();
    let categories: Vec<String> = table.rows.iter().map(|r| r.year.to_string()).collect();
    let series: Vec<(String, Vec<Option<f64>>)> = table
        .columns
        .iter()
        .enumerate()
        .map(|(col, key)| (key.clone(), table.rows.iter().map(|r| r.values[col]).collect()))
        .collect();

    let bars = (categories.len() * series.len().max(1)) as f64;
    let width = WIDTH.max(bars * 3.0 + 2.0 * PADDING + LEGEND_WIDTH);
    grouped_bar_chart("Yearly returns by regime", &categories, &series, width)
}

fn grouped_bar_chart(
    title: &str,
    categories: &[String],
    series: &[(String, Vec<Option<f64>>)],
    width: f64,
) -> String {
    let mut svg = svg_header(width, HEIGHT);
    svg.push_str(&format!(
        r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="12" fill="#333">{title}</text>"##,
        x = width / 2.0,
        y = PADDING / 2.0,
        title = escape_xml(title)
    ));

    let (min_v, max_v) = extent(series);
    let plot_right = width - PADDING - LEGEND_WIDTH;
    let inner_width = plot_right - PADDING;
    let zero = scale_value(0.0, min_v, max_v, HEIGHT);

    // Zero line and extent labels
    svg.push_str(&format!(
        r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#8c8c8c" stroke-width="1" />"##,
        x1 = PADDING,
        x2 = plot_right,
        y = zero
    ));
    for value in [min_v, max_v] {
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end">{label}</text>"#,
            x = PADDING - 4.0,
            y = scale_value(value, min_v, max_v, HEIGHT) + 3.0,
            label = format_tick(value)
        ));
    }

    if categories.is_empty() || series.is_empty() {
        svg.push_str(svg_footer());
        return svg;
    }

    let slot = inner_width / categories.len() as f64;
    let bar_width = slot * 0.8 / series.len() as f64;
    // Thin out labels so they don't overlap (~28px per label).
    let label_every = ((28.0 / slot).ceil() as usize).max(1);

    for (c, category) in categories.iter().enumerate() {
        let slot_left = PADDING + slot * c as f64 + slot * 0.1;
        for (s, (_, values)) in series.iter().enumerate() {
            let Some(v) = values.get(c).copied().flatten() else {
                continue;
            };
            if !v.is_finite() {
                continue;
            }
            let y = scale_value(v, min_v, max_v, HEIGHT);
            let (top, bottom) = if y < zero { (y, zero) } else { (zero, y) };
            svg.push_str(&format!(
                r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{color}" />"#,
                x = slot_left + bar_width * s as f64,
                y = top,
                w = bar_width,
                h = (bottom - top).abs(),
                color = PALETTE[s % PALETTE.len()]
            ));
        }
        if c % label_every == 0 {
            svg.push_str(&format!(
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
                x = PADDING + slot * (c as f64 + 0.5),
                y = HEIGHT - PADDING + 14.0,
                label = escape_xml(category)
            ));
        }
    }

    draw_legend(&mut svg, series, plot_right + 12.0);
    svg.push_str(svg_footer());
    svg
}

fn draw_legend(svg: &mut String, series: &[(String, Vec<Option<f64>>)], x: f64) {
    let mut y = PADDING + 10.0;
    for (s, (label, _)) in series.iter().enumerate() {
        svg.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="10" height="10" fill="{color}" />"#,
            x = x,
            y = y - 9.0,
            color = PALETTE[s % PALETTE.len()]
        ));
        svg.push_str(&format!(
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="start" fill="#333">{label}</text>"##,
            x = x + 14.0,
            y = y,
            label = escape_xml(label)
        ));
        y += 16.0;
    }
}

/// Value range of all bars, always including zero.
fn extent(series: &[(String, Vec<Option<f64>>)]) -> (f64, f64) {
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;
    for v in series
        .iter()
        .flat_map(|(_, values)| values.iter().flatten())
        .filter(|v| v.is_finite())
    {
        min = min.min(*v);
        max = max.max(*v);
    }
    (min, max)
}

fn scale_value(value: f64, min_v: f64, max_v: f64, height: f64) -> f64 {
    if (max_v - min_v).abs() < f64::EPSILON {
        return height / 2.0;
    }

    let inner_height = height - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn format_tick(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn svg_header(width: f64, height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="{w:.0}" height="{h:.0}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style>"#,
        w = width,
        h = height
    )
}

fn svg_footer() -> &'static str {
    "</svg>"
}
