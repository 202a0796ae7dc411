use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::grid::{CircleBatch, GridScene};
use super::minimap::MinimapScene;

const BACKGROUND: &str = "#0d1117";
const MINIMAP_GAP: f32 = 16.0;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_batch(svg: &mut String, batch: &CircleBatch) {
    if batch.circles.is_empty() {
        return;
    }
    let fill = batch.style.fill.as_deref().unwrap_or("none");
    let _ = write!(svg, r#"<path fill="{}""#, escape(fill));
    if let Some(stroke) = &batch.style.stroke {
        let _ = write!(
            svg,
            r#" stroke="{}" stroke-width="{:.2}""#,
            escape(stroke),
            batch.style.stroke_width
        );
    }
    let _ = writeln!(svg, r#" d="{}"/>"#, batch.path_data());
}

fn push_grid(svg: &mut String, grid: &GridScene) {
    for header in &grid.headers {
        let rect = header.rect;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="2" fill="{}"/>"#,
            rect.left(),
            rect.top(),
            rect.width(),
            rect.height(),
            header.fill
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" font-family="sans-serif" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
            rect.center().x,
            rect.center().y,
            rect.height() * 0.9,
            header.text_color,
            header.year
        );
    }

    for batch in &grid.batches {
        push_batch(svg, batch);
    }
    push_batch(svg, &grid.borders);
}

fn push_minimap(svg: &mut String, minimap: &MinimapScene, offset_x: f32) {
    let config = &minimap.config;
    let _ = writeln!(svg, r#"<g transform="translate({offset_x:.2},0)">"#);

    let ghost = minimap.ghost;
    let _ = writeln!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.2}"/>"#,
        ghost.left(),
        ghost.top(),
        ghost.width(),
        ghost.height(),
        escape(&config.ghost_color),
        config.ghost_opacity
    );

    for band in &minimap.bands {
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"><title>{}</title></rect>"#,
            band.rect.left(),
            band.rect.top(),
            band.rect.width(),
            band.rect.height(),
            escape(&band.color),
            escape(band.label.as_deref().unwrap_or(""))
        );
    }

    for tick in &minimap.ticks {
        let _ = writeln!(
            svg,
            r#"<line x1="0" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="1"/>"#,
            config.width,
            escape(&config.tick_color),
            y = tick.y
        );
    }

    for event in &minimap.events {
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"><title>{}</title></rect>"#,
            event.rect.left(),
            event.rect.top(),
            event.rect.width(),
            event.rect.height(),
            escape(&event.color),
            escape(&event.label)
        );
    }

    svg.push_str("</g>\n");
}

pub fn to_svg(grid: &GridScene, minimap: &MinimapScene) -> String {
    let minimap_x = grid.width + MINIMAP_GAP;
    let width = minimap_x + minimap.config.width;
    let height = grid.height.max(minimap.height);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.2} {height:.2}">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="{BACKGROUND}"/>"#);
    push_grid(&mut svg, grid);
    push_minimap(&mut svg, minimap, minimap_x);
    svg.push_str("</svg>\n");
    svg
}

pub fn write_svg(path: &Path, grid: &GridScene, minimap: &MinimapScene) -> Result<()> {
    fs::write(path, to_svg(grid, minimap))
        .with_context(|| format!("failed to write SVG to {}", path.display()))
}
