//! Score-vs-parameters scatter plots.
//!
//! The plot is laid out first (points, legend entries, axis bounds) and then
//! rasterized into a PNG. The caption doubles as the y-axis label; the
//! legend lists one marker per model family under a "Models" title.

use ab_glyph::{FontRef, PxScale};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use vlm_bench_common::PlotConfig;
use vlm_bench_domain::{Marker, ModelRegistry, ModelScores, NamedColor, PlotError};

const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 60;

const X_LABEL: &str = "Number of trainable parameters (B)";
const LEGEND_TITLE: &str = "Models";
const LABEL_SCALE: f32 = 16.0;
const TICK_SCALE: f32 = 12.0;

static FONT: Lazy<FontRef<'static>> = Lazy::new(|| {
    FontRef::try_from_slice(include_bytes!("../assets/DejaVuSans.ttf"))
        .expect("Invalid embedded font")
});

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const FRAME: Rgb<u8> = Rgb([0, 0, 0]);
const LEGEND_BORDER: Rgb<u8> = Rgb([180, 180, 180]);
const TEXT: Rgb<u8> = Rgb([0, 0, 0]);

/// A plotted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub model: String,
    pub family: String,
    /// Parameter count in billions
    pub params: f64,
    pub score: f64,
    pub marker: Marker,
    pub color: NamedColor,
}

/// One legend swatch per family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub family: String,
    pub marker: Marker,
    pub color: NamedColor,
}

/// Layout of a scatter plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub caption: String,
    pub points: Vec<PlotPoint>,
    pub legend: Vec<LegendEntry>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Where the PNG was written, once rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Y-axis bounds for the given scores: one decimal below the minimum and
/// one decimal above the maximum.
pub fn y_bounds(scores: &ModelScores) -> Result<(f64, f64), PlotError> {
    if scores.is_empty() {
        return Err(PlotError::Empty);
    }

    let min = scores.values().copied().fold(f64::INFINITY, f64::min);
    let max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);

    let lower = (min * 10.0).floor() / 10.0;
    let upper = ((max * 10.0).floor() + 1.0) / 10.0;
    Ok((lower, upper))
}

/// Lay out a scatter plot of `scores` (model -> score).
///
/// Points follow registry order. Non-positive scores are not drawn but
/// still count toward the y bounds.
pub fn layout_scatter(
    registry: &ModelRegistry,
    scores: &ModelScores,
    caption: &str,
    x_max: f64,
) -> Result<ScatterPlot, PlotError> {
    let y_range = y_bounds(scores)?;

    for model in scores.keys() {
        if registry.style_for(model).is_none() {
            warn!(model = %model, "Model missing from registry, not plotted");
        }
    }

    let mut points = Vec::new();
    let mut legend: Vec<LegendEntry> = Vec::new();

    for config in registry.models() {
        let Some(&score) = scores.get(&config.name) else {
            continue;
        };
        if score <= 0.0 {
            continue;
        }
        let Some(style) = registry.family(&config.base_name) else {
            continue;
        };

        if !legend.iter().any(|e| e.family == config.base_name) {
            legend.push(LegendEntry {
                family: config.base_name.clone(),
                marker: style.marker,
                color: style.color,
            });
        }

        points.push(PlotPoint {
            model: config.name.clone(),
            family: config.base_name.clone(),
            params: config.num_params,
            score,
            marker: style.marker,
            color: style.color,
        });
    }

    Ok(ScatterPlot {
        caption: caption.to_string(),
        points,
        legend,
        x_range: (0.0, x_max),
        y_range,
        path: None,
    })
}

/// Lay out, rasterize and save a scatter plot.
#[instrument(skip(registry, scores, config), fields(path = %path.display()))]
pub fn plot_scatter(
    registry: &ModelRegistry,
    scores: &ModelScores,
    path: &Path,
    caption: &str,
    config: &PlotConfig,
) -> Result<ScatterPlot, PlotError> {
    let mut plot = layout_scatter(registry, scores, caption, config.x_max)?;
    let canvas = rasterize(&plot, config)?;

    canvas.save(path).map_err(|e| PlotError::Save {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(points = plot.points.len(), caption = %caption, "Saved scatter plot");
    plot.path = Some(path.to_path_buf());
    Ok(plot)
}

/// Draw the plot into an RGB canvas.
pub fn rasterize(plot: &ScatterPlot, config: &PlotConfig) -> Result<RgbImage, PlotError> {
    let (width, height) = (config.width, config.height);
    if width <= MARGIN_LEFT + MARGIN_RIGHT + 10 || height <= MARGIN_TOP + MARGIN_BOTTOM + 10 {
        return Err(PlotError::InvalidCanvas { width, height });
    }

    let area = PlotArea {
        left: MARGIN_LEFT as f64,
        top: MARGIN_TOP as f64,
        right: (width - MARGIN_RIGHT) as f64,
        bottom: (height - MARGIN_BOTTOM) as f64,
        x_range: plot.x_range,
        y_range: plot.y_range,
    };

    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    // Vertical grid lines and ticks at every unit of x.
    let x_steps = (plot.x_range.1 - plot.x_range.0).floor() as i64;
    for i in 0..=x_steps {
        let x = plot.x_range.0 + i as f64;
        let px = area.px(x).round() as i64;
        vline(&mut canvas, px, area.top as i64, area.bottom as i64, GRID);

        let tick = format!("{x:.0}");
        let (w, _) = text_size(TICK_SCALE, &*FONT, &tick);
        draw_label(&mut canvas, px - w as i64 / 2, area.bottom as i64 + 6, TICK_SCALE, &tick);
    }

    // Horizontal grid lines and ticks every 0.1 of y.
    let y_steps = ((plot.y_range.1 - plot.y_range.0) * 10.0).round() as i64;
    for i in 0..=y_steps {
        let y = plot.y_range.0 + i as f64 / 10.0;
        let py = area.py(y).round() as i64;
        hline(&mut canvas, area.left as i64, area.right as i64, py, GRID);

        let tick = format!("{y:.1}");
        let (w, _) = text_size(TICK_SCALE, &*FONT, &tick);
        let x = area.left as i64 - 6 - w as i64;
        draw_label(&mut canvas, x, py - (TICK_SCALE / 2.0) as i64, TICK_SCALE, &tick);
    }

    let (label_w, _) = text_size(LABEL_SCALE, &*FONT, X_LABEL);
    let center_x = ((area.left + area.right) / 2.0) as i64;
    draw_label(
        &mut canvas,
        center_x - label_w as i64 / 2,
        area.bottom as i64 + 30,
        LABEL_SCALE,
        X_LABEL,
    );
    draw_vertical_label(&mut canvas, 4, ((area.top + area.bottom) / 2.0) as i64, &plot.caption);

    frame(
        &mut canvas,
        area.left as i64,
        area.top as i64,
        area.right as i64,
        area.bottom as i64,
        FRAME,
    );

    let radius = config.marker_size as f64;
    for point in &plot.points {
        let color = Rgb(point.color.rgb());
        fill_marker(
            &mut canvas,
            area.px(point.params),
            area.py(point.score),
            radius,
            point.marker,
            color,
        );
    }

    draw_legend(&mut canvas, &area, &plot.legend, radius);

    Ok(canvas)
}

struct PlotArea {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl PlotArea {
    fn px(&self, x: f64) -> f64 {
        let span = self.x_range.1 - self.x_range.0;
        self.left + (x - self.x_range.0) / span * (self.right - self.left)
    }

    fn py(&self, y: f64) -> f64 {
        let span = self.y_range.1 - self.y_range.0;
        self.bottom - (y - self.y_range.0) / span * (self.bottom - self.top)
    }
}

/// Legend box geometry: a title row followed by one row per family
struct LegendBox {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
    row: i64,
    swatch_x: f64,
    text_x: i64,
}

impl LegendBox {
    fn new(area: &PlotArea, legend: &[LegendEntry], radius: f64) -> Self {
        let row = (radius * 2.0 + 8.0).max(LABEL_SCALE as f64 + 6.0).round() as i64;
        let text_w = legend
            .iter()
            .map(|e| e.family.as_str())
            .chain(std::iter::once(LEGEND_TITLE))
            .map(|text| text_size(LABEL_SCALE, &*FONT, text).0 as i64)
            .max()
            .unwrap_or(0);

        let right = area.right as i64 - 10;
        let left = right - (row + text_w + 12);
        let top = area.top as i64 + 10;
        Self {
            left,
            top,
            right,
            bottom: top + row * (legend.len() as i64 + 1),
            row,
            swatch_x: (left + row / 2) as f64,
            text_x: left + row + 4,
        }
    }

    /// Vertical centre of the `i`-th family row
    fn entry_y(&self, i: usize) -> f64 {
        self.top as f64 + self.row as f64 * (i as f64 + 1.5)
    }
}

fn draw_legend(canvas: &mut RgbImage, area: &PlotArea, legend: &[LegendEntry], radius: f64) {
    if legend.is_empty() {
        return;
    }

    let b = LegendBox::new(area, legend, radius);
    for y in b.top..b.bottom {
        hline(canvas, b.left, b.right, y, BACKGROUND);
    }
    frame(canvas, b.left, b.top, b.right, b.bottom, LEGEND_BORDER);

    let (title_w, _) = text_size(LABEL_SCALE, &*FONT, LEGEND_TITLE);
    let title_y = b.top + (b.row - LABEL_SCALE as i64) / 2;
    draw_label(canvas, (b.left + b.right - title_w as i64) / 2, title_y, LABEL_SCALE, LEGEND_TITLE);

    for (i, entry) in legend.iter().enumerate() {
        let cy = b.entry_y(i);
        fill_marker(canvas, b.swatch_x, cy, radius, entry.marker, Rgb(entry.color.rgb()));
        let text_y = cy as i64 - (LABEL_SCALE / 2.0) as i64;
        draw_label(canvas, b.text_x, text_y, LABEL_SCALE, &entry.family);
    }
}

fn draw_label(canvas: &mut RgbImage, x: i64, y: i64, scale: f32, text: &str) {
    draw_text_mut(canvas, TEXT, x as i32, y as i32, PxScale::from(scale), &*FONT, text);
}

/// Text rotated a quarter turn counter-clockwise, centred on `center_y`
fn draw_vertical_label(canvas: &mut RgbImage, x: i64, center_y: i64, text: &str) {
    let (w, _) = text_size(LABEL_SCALE, &*FONT, text);
    if w == 0 {
        return;
    }

    let mut strip = RgbImage::from_pixel(w + 2, LABEL_SCALE as u32 + 4, BACKGROUND);
    draw_text_mut(&mut strip, TEXT, 0, 0, PxScale::from(LABEL_SCALE), &*FONT, text);
    let rotated = imageops::rotate270(&strip);
    let y = center_y - rotated.height() as i64 / 2;
    imageops::overlay(canvas, &rotated, x, y);
}

fn put(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn hline(canvas: &mut RgbImage, x0: i64, x1: i64, y: i64, color: Rgb<u8>) {
    for x in x0..=x1 {
        put(canvas, x, y, color);
    }
}

fn vline(canvas: &mut RgbImage, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
    for y in y0..=y1 {
        put(canvas, x, y, color);
    }
}

fn frame(canvas: &mut RgbImage, left: i64, top: i64, right: i64, bottom: i64, color: Rgb<u8>) {
    hline(canvas, left, right, top, color);
    hline(canvas, left, right, bottom, color);
    vline(canvas, left, top, bottom, color);
    vline(canvas, right, top, bottom, color);
}

/// Vertices of a marker outline centered on the origin, y pointing down.
/// `None` for the circle.
fn marker_outline(marker: Marker, r: f64) -> Option<Vec<(f64, f64)>> {
    use std::f64::consts::{FRAC_PI_2, PI};

    let regular = |n: usize, offset: f64, radius: f64| -> Vec<(f64, f64)> {
        (0..n)
            .map(|k| {
                let a = offset + 2.0 * PI * k as f64 / n as f64;
                (radius * a.cos(), radius * a.sin())
            })
            .collect()
    };

    let outline = match marker {
        Marker::Circle => return None,
        Marker::Square => {
            let s = r * 0.85;
            vec![(-s, -s), (s, -s), (s, s), (-s, s)]
        }
        Marker::TriangleUp => regular(3, -FRAC_PI_2, r),
        Marker::TriangleDown => regular(3, FRAC_PI_2, r),
        Marker::TriangleRight => regular(3, 0.0, r),
        Marker::TriangleLeft => regular(3, PI, r),
        Marker::Pentagon => regular(5, -FRAC_PI_2, r),
        Marker::Hexagon => regular(6, -FRAC_PI_2, r),
        Marker::Star => (0..10)
            .map(|k| {
                let a = -FRAC_PI_2 + PI * k as f64 / 5.0;
                let radius = if k % 2 == 0 { r } else { r * 0.45 };
                (radius * a.cos(), radius * a.sin())
            })
            .collect(),
        Marker::Diamond => vec![(0.0, -r), (r * 0.7, 0.0), (0.0, r), (-r * 0.7, 0.0)],
    };
    Some(outline)
}

fn inside_polygon(x: f64, y: f64, polygon: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn fill_marker(canvas: &mut RgbImage, cx: f64, cy: f64, r: f64, marker: Marker, color: Rgb<u8>) {
    let outline = marker_outline(marker, r);
    let reach = r.ceil() as i64 + 1;
    let (ix, iy) = (cx.round() as i64, cy.round() as i64);

    for y in (iy - reach)..=(iy + reach) {
        for x in (ix - reach)..=(ix + reach) {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let hit = match &outline {
                None => dx * dx + dy * dy <= r * r,
                Some(poly) => inside_polygon(dx, dy, poly),
            };
            if hit {
                put(canvas, x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(&str, f64)]) -> ModelScores {
        entries.iter().map(|(m, s)| (m.to_string(), *s)).collect()
    }

    #[test]
    fn test_y_bounds() {
        let (lo, hi) = y_bounds(&scores(&[("a", 0.45), ("b", 0.75)])).unwrap();
        assert!((lo - 0.4).abs() < 1e-12);
        assert!((hi - 0.8).abs() < 1e-12);

        let (lo, hi) = y_bounds(&scores(&[("a", 0.0), ("b", 0.9)])).unwrap();
        assert_eq!(lo, 0.0);
        assert!((hi - 1.0).abs() < 1e-12);

        assert!(matches!(y_bounds(&ModelScores::new()), Err(PlotError::Empty)));
    }

    #[test]
    fn test_layout_skips_non_positive_and_unknown() {
        let registry = ModelRegistry::builtin();
        let scores = scores(&[
            ("Qwen2-VL-7B-Instruct", 0.7),
            ("InternVL2_5-1B", 0.5),
            ("Qwen2-VL-2B-Instruct", 0.0),
            ("not-a-model", 0.9),
        ]);

        let plot = layout_scatter(&registry, &scores, "Mean score vs parameters", 9.0).unwrap();

        let models: Vec<_> = plot.points.iter().map(|p| p.model.as_str()).collect();
        // registry order, zero score dropped, unknown model dropped
        assert_eq!(models, vec!["InternVL2_5-1B", "Qwen2-VL-7B-Instruct"]);

        let families: Vec<_> = plot.legend.iter().map(|e| e.family.as_str()).collect();
        assert_eq!(families, vec!["InternVL2_5", "Qwen2-VL"]);
        assert_eq!(plot.legend[0].marker, Marker::Circle);
        assert_eq!(plot.x_range, (0.0, 9.0));
        // y bounds include the zero and the unplotted score
        assert_eq!(plot.y_range.0, 0.0);
        assert!((plot.y_range.1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rasterize_draws_marker_color() {
        let mut registry = ModelRegistry::new();
        registry.insert_family("F", Marker::Square, NamedColor::Red);
        registry.insert_model("m", "F", 4.5);

        let config = PlotConfig::default();
        let plot = layout_scatter(&registry, &scores(&[("m", 0.55)]), "c", 9.0).unwrap();
        let canvas = rasterize(&plot, &config).unwrap();

        assert_eq!(canvas.dimensions(), (1000, 600));
        // centre of the plot area in x, score 0.55 halfway between 0.5 and 0.6
        let area_w = (1000 - MARGIN_LEFT - MARGIN_RIGHT) as f64;
        let area_h = (600 - MARGIN_TOP - MARGIN_BOTTOM) as f64;
        let cx = MARGIN_LEFT as f64 + area_w / 2.0;
        let cy = MARGIN_TOP as f64 + area_h / 2.0;
        assert_eq!(canvas.get_pixel(cx as u32, cy as u32), &Rgb([255, 0, 0]));
        assert_eq!(canvas.get_pixel(1, 1), &BACKGROUND);
    }

    fn has_dark_pixel(canvas: &RgbImage, xs: std::ops::Range<i64>, ys: std::ops::Range<i64>) -> bool {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| x >= 0 && y >= 0)
            .filter_map(|(x, y)| canvas.get_pixel_checked(x as u32, y as u32))
            .any(|p| p.0.iter().all(|&c| c < 100))
    }

    #[test]
    fn test_legend_names_next_to_swatches() {
        let mut registry = ModelRegistry::new();
        registry.insert_family("Alpha", Marker::Circle, NamedColor::Blue);
        registry.insert_family("Beta", Marker::Star, NamedColor::Green);
        registry.insert_model("a-1B", "Alpha", 1.0);
        registry.insert_model("b-3B", "Beta", 3.0);

        let config = PlotConfig::default();
        let plot =
            layout_scatter(&registry, &scores(&[("a-1B", 0.4), ("b-3B", 0.6)]), "c", 9.0).unwrap();
        let canvas = rasterize(&plot, &config).unwrap();

        let area = PlotArea {
            left: MARGIN_LEFT as f64,
            top: MARGIN_TOP as f64,
            right: (config.width - MARGIN_RIGHT) as f64,
            bottom: (config.height - MARGIN_BOTTOM) as f64,
            x_range: plot.x_range,
            y_range: plot.y_range,
        };
        let b = LegendBox::new(&area, &plot.legend, config.marker_size as f64);

        // title row
        assert!(has_dark_pixel(&canvas, b.left + 1..b.right, b.top + 1..b.top + b.row));
        for i in 0..plot.legend.len() {
            let cy = b.entry_y(i) as i64;
            let swatch = canvas.get_pixel(b.swatch_x as u32, cy as u32);
            assert_eq!(swatch, &Rgb(plot.legend[i].color.rgb()));
            let rows = cy - b.row / 2 + 1..cy + b.row / 2;
            assert!(has_dark_pixel(&canvas, b.text_x..b.right, rows), "legend row {i}");
        }
    }

    #[test]
    fn test_axis_labels_drawn() {
        let config = PlotConfig::default();
        let plot = layout_scatter(&ModelRegistry::new(), &scores(&[("m", 0.5)]), "MME score", 9.0)
            .unwrap();
        let canvas = rasterize(&plot, &config).unwrap();
        let (w, h) = (config.width as i64, config.height as i64);
        let bottom = h - MARGIN_BOTTOM as i64;

        // x ticks and x label below the frame
        assert!(has_dark_pixel(&canvas, MARGIN_LEFT as i64..w, bottom + 4..bottom + 22));
        assert!(has_dark_pixel(&canvas, MARGIN_LEFT as i64..w, bottom + 28..h));
        // y label in the left strip, y ticks just left of the frame
        assert!(has_dark_pixel(&canvas, 0..26, MARGIN_TOP as i64..bottom));
        assert!(has_dark_pixel(&canvas, 30..MARGIN_LEFT as i64 - 2, MARGIN_TOP as i64..bottom));
    }

    #[test]
    fn test_rasterize_rejects_tiny_canvas() {
        let plot = layout_scatter(&ModelRegistry::new(), &scores(&[("m", 0.5)]), "c", 9.0).unwrap();
        let config = PlotConfig {
            width: 50,
            height: 50,
            ..PlotConfig::default()
        };
        assert!(matches!(
            rasterize(&plot, &config),
            Err(PlotError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_plot_scatter_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Mean_score_vs_params.png");
        let plot = plot_scatter(
            &ModelRegistry::builtin(),
            &scores(&[("InternVL2_5-8B", 0.8), ("Janus-Pro-7B", 0.6)]),
            &path,
            "Mean score vs parameters",
            &PlotConfig::default(),
        )
        .unwrap();

        assert_eq!(plot.path.as_deref(), Some(path.as_path()));
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 1000);
        assert_eq!(decoded.height(), 600);
    }

    #[test]
    fn test_every_marker_covers_its_centre() {
        let markers = [
            Marker::Circle,
            Marker::Square,
            Marker::TriangleUp,
            Marker::TriangleDown,
            Marker::TriangleRight,
            Marker::TriangleLeft,
            Marker::Pentagon,
            Marker::Hexagon,
            Marker::Star,
            Marker::Diamond,
        ];
        for marker in markers {
            let mut canvas = RgbImage::from_pixel(41, 41, BACKGROUND);
            fill_marker(&mut canvas, 20.0, 20.0, 10.0, marker, FRAME);
            assert_eq!(canvas.get_pixel(20, 20), &FRAME, "{marker:?}");
            assert_eq!(canvas.get_pixel(0, 0), &BACKGROUND, "{marker:?}");
        }
    }
}
