// SVG rendering of a histogram. The canvas is 1000x600, bars are drawn
// half-transparent with black edges.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::histogram::{Histogram, PlotLabels};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const BAR_FILL: &str = "#1f77b4";
const BAR_OPACITY: f64 = 0.75;

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn write_svg(histogram: &Histogram, labels: &PlotLabels, out: &mut impl Write) -> std::io::Result<()> {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;
    let bar_width = plot_width / histogram.n_bins() as f64;
    let max_count = histogram.max_count();

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = HEIGHT
    )?;
    writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="20">{}</text>"#,
        WIDTH / 2.0,
        MARGIN_TOP / 2.0 + 5.0,
        escape(&labels.title)
    )?;

    writeln!(out, r#"<g fill="{}" fill-opacity="{}" stroke="black" stroke-width="1">"#, BAR_FILL, BAR_OPACITY)?;
    for (i, c) in histogram.counts().iter().enumerate() {
        if *c == 0 {
            continue;
        }
        let height = *c as f64 / max_count as f64 * plot_height;
        writeln!(
            out,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/>"#,
            MARGIN_LEFT + i as f64 * bar_width,
            baseline - height,
            bar_width,
            height
        )?;
    }
    writeln!(out, "</g>")?;

    // Axes
    writeln!(
        out,
        r#"<path d="M{l} {t} V{b} H{r}" fill="none" stroke="black"/>"#,
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = baseline,
        r = MARGIN_LEFT + plot_width
    )?;
    writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
        MARGIN_LEFT,
        baseline + 18.0,
        format_edge(histogram.min_edge())
    )?;
    writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
        MARGIN_LEFT + plot_width,
        baseline + 18.0,
        format_edge(histogram.max_edge())
    )?;
    writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="end" font-size="12">0</text>"#,
        MARGIN_LEFT - 6.0,
        baseline + 4.0
    )?;
    if max_count > 0 {
        writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="end" font-size="12">{}</text>"#,
            MARGIN_LEFT - 6.0,
            MARGIN_TOP + 4.0,
            max_count
        )?;
    }

    writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="14">{}</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        HEIGHT - 20.0,
        escape(&labels.x_label)
    )?;
    writeln!(
        out,
        r#"<text x="25" y="{y}" text-anchor="middle" font-size="14" transform="rotate(-90 25 {y})">{}</text>"#,
        escape(&labels.y_label),
        y = MARGIN_TOP + plot_height / 2.0
    )?;
    writeln!(out, "</svg>")?;
    Ok(())
}

pub fn save_svg(histogram: &Histogram, labels: &PlotLabels, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_svg(histogram, labels, &mut out)?;
    out.flush()?;
    info!("Wrote histogram to {}", path.display());
    Ok(())
}

fn format_edge(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{:.0}", x)
    } else {
        format!("{:.1}", x)
    }
}
