use std::f32::consts::TAU;

use eframe::egui::{
    self, Color32, Frame, Id, Margin, Mesh, Order, Pos2, Rect, RichText, Shape, Stroke, TextWrapMode,
    Vec2,
};

use crate::calendar::CircleBatch;
use crate::color::{normalize_to_hex, parse_hex};

use super::interaction::Tooltip;

const CIRCLE_SEGMENTS: usize = 18;
const FALLBACK_COLOR: Color32 = Color32::from_rgb(128, 128, 128);

pub(super) fn color32(value: &str) -> Color32 {
    let rgb = parse_hex(value).or_else(|| parse_hex(&normalize_to_hex(value)));
    match rgb {
        Some([r, g, b]) => Color32::from_rgb(r, g, b),
        None => FALLBACK_COLOR,
    }
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn push_circle_fan(mesh: &mut Mesh, center: Pos2, radius: f32, color: Color32) {
    let base = mesh.vertices.len() as u32;
    mesh.colored_vertex(center, color);
    for step in 0..CIRCLE_SEGMENTS {
        let angle = step as f32 / CIRCLE_SEGMENTS as f32 * TAU;
        mesh.colored_vertex(center + Vec2::angled(angle) * radius, color);
    }
    for step in 0..CIRCLE_SEGMENTS as u32 {
        let next = (step + 1) % CIRCLE_SEGMENTS as u32;
        mesh.add_triangle(base, base + 1 + step, base + 1 + next);
    }
}

fn push_ring(mesh: &mut Mesh, center: Pos2, radius: f32, width: f32, color: Color32) {
    let inner = (radius - width * 0.5).max(0.0);
    let outer = radius + width * 0.5;
    let base = mesh.vertices.len() as u32;
    for step in 0..CIRCLE_SEGMENTS {
        let direction = Vec2::angled(step as f32 / CIRCLE_SEGMENTS as f32 * TAU);
        mesh.colored_vertex(center + direction * inner, color);
        mesh.colored_vertex(center + direction * outer, color);
    }
    for step in 0..CIRCLE_SEGMENTS as u32 {
        let next = (step + 1) % CIRCLE_SEGMENTS as u32;
        let (inner_a, outer_a) = (base + step * 2, base + step * 2 + 1);
        let (inner_b, outer_b) = (base + next * 2, base + next * 2 + 1);
        mesh.add_triangle(inner_a, outer_a, outer_b);
        mesh.add_triangle(inner_a, outer_b, inner_b);
    }
}

// Fills and rings share one mesh, so each batch is a single shape.
pub(super) fn batch_shapes(batch: &CircleBatch, offset: Vec2, clip: Rect, out: &mut Vec<Shape>) {
    let fill = batch.style.fill.as_deref().map(color32);
    let stroke = batch.style.stroke.as_deref().map(color32);
    let stroke_width = batch.style.stroke_width;

    let mut mesh = Mesh::default();
    for circle in &batch.circles {
        let center = circle.center + offset;
        if !circle_visible(clip, center, circle.radius + stroke_width) {
            continue;
        }
        if let Some(fill) = fill {
            push_circle_fan(&mut mesh, center, circle.radius, fill);
        }
        if let Some(stroke) = stroke
            && stroke_width > 0.0
        {
            push_ring(&mut mesh, center, circle.radius, stroke_width, stroke);
        }
    }

    if !mesh.is_empty() {
        out.push(Shape::mesh(mesh));
    }
}

pub(super) fn draw_tooltip(ctx: &egui::Context, id: &str, tooltip: &Tooltip) {
    let background = color32(&tooltip.background);
    let text_color = color32(tooltip.text_color);

    egui::Area::new(Id::new(("life-calendar-tooltip", id)))
        .order(Order::Tooltip)
        .fixed_pos(tooltip.position)
        .interactable(false)
        .show(ctx, |ui| {
            ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
            Frame::NONE
                .fill(background)
                .stroke(Stroke::new(1.0, with_alpha(text_color, 0.25)))
                .corner_radius(4)
                .inner_margin(Margin::same(6))
                .show(ui, |ui| {
                    ui.label(RichText::new(&tooltip.text).color(text_color).size(12.5));
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_hex_and_named_colors() {
        assert_eq!(color32("#ff0000"), Color32::from_rgb(255, 0, 0));
        assert_eq!(color32("white"), Color32::from_rgb(255, 255, 255));
        assert_eq!(color32("var(--accent)"), FALLBACK_COLOR);
    }

    #[test]
    fn batch_mesh_skips_offscreen_circles() {
        use chrono::NaiveDate;

        use crate::calendar::{GridConfig, MinimapConfig, RenderRequest, render};
        use crate::notes::NoteIndex;
        use crate::settings::Settings;

        let settings = Settings {
            birthday: "1990-05-15".into(),
            max_age: 1,
            ..Settings::default()
        };
        let rendered = render(&RenderRequest {
            settings: &settings,
            notes: &NoteIndex::default(),
            today: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            container_width: 1200.0,
            minimap_height: 600.0,
            grid: &GridConfig::default(),
            minimap: &MinimapConfig::default(),
        })
        .unwrap();

        let batch = &rendered.grid.batches[0];
        assert!(batch.style.stroke.is_none());
        let first = batch.circles[0];
        let clip = Rect::from_center_size(first.center, Vec2::splat(20.0));
        let visible = batch
            .circles
            .iter()
            .filter(|circle| circle_visible(clip, circle.center, circle.radius))
            .count();
        assert!(visible >= 1 && visible < batch.circles.len());

        let mut shapes = Vec::new();
        batch_shapes(batch, Vec2::ZERO, clip, &mut shapes);
        assert_eq!(shapes.len(), 1);
        let Some(Shape::Mesh(mesh)) = shapes.first() else {
            panic!("expected a mesh");
        };
        assert_eq!(mesh.vertices.len(), visible * (CIRCLE_SEGMENTS + 1));
        assert_eq!(mesh.indices.len(), visible * CIRCLE_SEGMENTS * 3);
    }

    #[test]
    fn ringed_batches_stay_one_shape_each() {
        use chrono::{Duration, NaiveDate};

        use crate::calendar::{GridConfig, MinimapConfig, RenderRequest, render};
        use crate::notes::NoteIndex;
        use crate::settings::Settings;

        let settings = Settings {
            birthday: "1990-05-15".into(),
            max_age: 1,
            ..Settings::default()
        };
        let birth = NaiveDate::from_ymd_opt(1990, 5, 15).unwrap();
        let mut notes = NoteIndex::default();
        for offset in 0..200 {
            let key = (birth + Duration::days(offset)).format("%Y-%m-%d").to_string();
            notes.insert(&key, &format!("{key}.md"));
        }
        let rendered = render(&RenderRequest {
            settings: &settings,
            notes: &notes,
            today: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            container_width: 1200.0,
            minimap_height: 600.0,
            grid: &GridConfig::default(),
            minimap: &MinimapConfig::default(),
        })
        .unwrap();

        let scene = &rendered.grid;
        let ringed = scene
            .batches
            .iter()
            .find(|batch| batch.style.stroke.is_some())
            .expect("note days carry a ring");
        assert_eq!(ringed.circles.len(), 200);

        let clip = Rect::from_min_size(Pos2::ZERO, Vec2::new(scene.width, scene.height) + Vec2::splat(50.0));
        let mut shapes = Vec::new();
        for batch in &scene.batches {
            batch_shapes(batch, Vec2::ZERO, clip, &mut shapes);
        }
        assert_eq!(shapes.len(), scene.batches.len());

        let mut ring_shapes = Vec::new();
        batch_shapes(ringed, Vec2::ZERO, clip, &mut ring_shapes);
        let [Shape::Mesh(mesh)] = ring_shapes.as_slice() else {
            panic!("expected a single mesh");
        };
        assert_eq!(mesh.vertices.len(), 200 * (3 * CIRCLE_SEGMENTS + 1));
        assert_eq!(mesh.indices.len(), 200 * 3 * CIRCLE_SEGMENTS * 3);
    }
}
