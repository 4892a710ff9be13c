//! Self-contained SVG figure builders.
//!
//! Pure string generation, no I/O: the chart writer and the dashboard embed
//! these directly. Two shapes cover every report figure: a horizontal bar
//! chart and a labeled scatter plot.

const CHART_WIDTH: f64 = 960.0;
const LABEL_GUTTER: f64 = 260.0;
const MARGIN: f64 = 24.0;
const TITLE_BAND: f64 = 48.0;
const AXIS_BAND: f64 = 44.0;
const BAR_ROW: f64 = 32.0;
const BAR_HEIGHT: f64 = 20.0;

const POSITIVE_FILL: &str = "#4878a8";
const NEGATIVE_FILL: &str = "#b85450";
const AXIS_STROKE: &str = "#888888";
const TEXT_FILL: &str = "#222222";

/// Escape text for embedding in SVG markup.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn value_span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if (max - min).abs() < f64::EPSILON {
        max = min + 1.0;
    }
    (min, max)
}

/// Horizontal bar chart: one row per entry, bars anchored at the zero axis
/// so negative values extend left.
pub fn hbar_chart(title: &str, x_label: &str, data: &[(String, f64)]) -> String {
    let plot_w = CHART_WIDTH - LABEL_GUTTER - 2.0 * MARGIN;
    let height = TITLE_BAND + data.len() as f64 * BAR_ROW + AXIS_BAND;
    let (dmin, dmax) = value_span(data.iter().map(|(_, v)| *v));
    let x = |v: f64| LABEL_GUTTER + (v - dmin) / (dmax - dmin) * plot_w;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"Arial, sans-serif\">\n",
        w = CHART_WIDTH,
        h = height
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"28\" font-size=\"17\" font-weight=\"bold\" fill=\"{}\">{}</text>\n",
        MARGIN,
        TEXT_FILL,
        escape(title)
    ));

    let zero_x = x(0.0_f64.clamp(dmin, dmax));
    svg.push_str(&format!(
        "  <line x1=\"{zx}\" y1=\"{y1}\" x2=\"{zx}\" y2=\"{y2}\" stroke=\"{stroke}\" stroke-width=\"1\"/>\n",
        zx = zero_x,
        y1 = TITLE_BAND - 6.0,
        y2 = TITLE_BAND + data.len() as f64 * BAR_ROW + 6.0,
        stroke = AXIS_STROKE
    ));

    for (i, (label, value)) in data.iter().enumerate() {
        let y = TITLE_BAND + i as f64 * BAR_ROW;
        let vx = x(*value);
        let (bar_x, bar_w) = if vx >= zero_x {
            (zero_x, vx - zero_x)
        } else {
            (vx, zero_x - vx)
        };
        let fill = if *value < 0.0 { NEGATIVE_FILL } else { POSITIVE_FILL };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"end\" fill=\"{}\">{}</text>\n",
            LABEL_GUTTER - 8.0,
            y + BAR_HEIGHT * 0.75,
            TEXT_FILL,
            escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{}\" fill=\"{}\"/>\n",
            bar_x, y, bar_w.max(1.0), BAR_HEIGHT, fill
        ));
        let value_anchor = if vx >= zero_x { "start" } else { "end" };
        let value_x = if vx >= zero_x { vx + 6.0 } else { vx - 6.0 };
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"{}\" fill=\"{}\">{:.2}</text>\n",
            value_x,
            y + BAR_HEIGHT * 0.75,
            value_anchor,
            TEXT_FILL,
            value
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"13\" text-anchor=\"middle\" fill=\"{}\">{}</text>\n",
        LABEL_GUTTER + plot_w / 2.0,
        height - 12.0,
        TEXT_FILL,
        escape(x_label)
    ));
    svg.push_str("</svg>\n");
    svg
}

/// Labeled scatter plot: one annotated point per entry.
pub fn scatter_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(String, f64, f64)],
) -> String {
    const WIDTH: f64 = 760.0;
    const HEIGHT: f64 = 520.0;
    const LEFT: f64 = 70.0;
    const BOTTOM: f64 = 56.0;

    let plot_w = WIDTH - LEFT - MARGIN;
    let plot_h = HEIGHT - TITLE_BAND - BOTTOM;

    let (xmin, xmax) = padded_span(points.iter().map(|(_, x, _)| *x));
    let (ymin, ymax) = padded_span(points.iter().map(|(_, _, y)| *y));
    let sx = |v: f64| LEFT + (v - xmin) / (xmax - xmin) * plot_w;
    let sy = |v: f64| TITLE_BAND + plot_h - (v - ymin) / (ymax - ymin) * plot_h;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"Arial, sans-serif\">\n",
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"28\" font-size=\"17\" font-weight=\"bold\" fill=\"{}\">{}</text>\n",
        MARGIN,
        TEXT_FILL,
        escape(title)
    ));

    // Plot frame
    svg.push_str(&format!(
        "  <rect x=\"{}\" y=\"{}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>\n",
        LEFT, TITLE_BAND, plot_w, plot_h, AXIS_STROKE
    ));

    for (label, px, py) in points {
        svg.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"5\" fill=\"{}\" fill-opacity=\"0.85\"/>\n",
            sx(*px),
            sy(*py),
            POSITIVE_FILL
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"{}\">{}</text>\n",
            sx(*px) + 8.0,
            sy(*py) - 6.0,
            TEXT_FILL,
            escape(label)
        ));
    }

    // Axis extent labels
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{:.1}\" font-size=\"11\" fill=\"{}\">{:.2}</text>\n",
        LEFT,
        TITLE_BAND + plot_h + 16.0,
        TEXT_FILL,
        xmin
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\" fill=\"{}\">{:.2}</text>\n",
        LEFT + plot_w,
        TITLE_BAND + plot_h + 16.0,
        TEXT_FILL,
        xmax
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\" fill=\"{}\">{:.2}</text>\n",
        LEFT - 8.0,
        TITLE_BAND + 12.0,
        TEXT_FILL,
        ymax
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\" fill=\"{}\">{:.2}</text>\n",
        LEFT - 8.0,
        TITLE_BAND + plot_h,
        TEXT_FILL,
        ymin
    ));

    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"13\" text-anchor=\"middle\" fill=\"{}\">{}</text>\n",
        LEFT + plot_w / 2.0,
        HEIGHT - 12.0,
        TEXT_FILL,
        escape(x_label)
    ));
    svg.push_str(&format!(
        "  <text x=\"16\" y=\"{:.1}\" font-size=\"13\" text-anchor=\"middle\" fill=\"{}\" transform=\"rotate(-90 16 {:.1})\">{}</text>\n",
        TITLE_BAND + plot_h / 2.0,
        TEXT_FILL,
        TITLE_BAND + plot_h / 2.0,
        escape(y_label)
    ));
    svg.push_str("</svg>\n");
    svg
}

fn padded_span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = if (max - min).abs() < f64::EPSILON {
        min.abs().max(1.0)
    } else {
        max - min
    };
    (min - span * 0.05, max + span * 0.05)
}
