use eframe::egui::{self, Align2, CursorIcon, FontId, PointerButton, Sense, Ui, vec2};

use crate::calendar::RenderedCalendar;

use super::super::interaction::{Button, Cursor, HostAction, InteractionController};
use super::super::render_utils::{batch_shapes, color32, draw_tooltip};
use super::super::ViewModel;

fn paint_grid(
    ui: &mut Ui,
    calendar: &RenderedCalendar,
    controller: &mut InteractionController,
) -> Option<HostAction> {
    let scene = &calendar.grid;
    let (rect, response) = ui.allocate_exact_size(vec2(scene.width, scene.height), Sense::click());
    let painter = ui.painter_at(rect);
    let clip = painter.clip_rect();
    let offset = rect.min.to_vec2();

    for header in &scene.headers {
        let header_rect = header.rect.translate(offset);
        if !clip.intersects(header_rect) {
            continue;
        }
        painter.rect_filled(header_rect, 2.0, color32(header.fill));
        painter.text(
            header_rect.center(),
            Align2::CENTER_CENTER,
            header.year.to_string(),
            if header.milestone {
                FontId::monospace(header_rect.height() * 0.95)
            } else {
                FontId::proportional(header_rect.height() * 0.8)
            },
            color32(header.text_color),
        );
    }

    let mut shapes = Vec::with_capacity(scene.draw_calls());
    for batch in &scene.batches {
        batch_shapes(batch, offset, clip, &mut shapes);
    }
    batch_shapes(&scene.borders, offset, clip, &mut shapes);
    painter.extend(shapes);

    match response.hover_pos() {
        Some(pointer) => {
            if controller.grid_hover(calendar, pointer - offset, pointer) == Cursor::Pointer {
                ui.output_mut(|output| {
                    output.cursor_icon = CursorIcon::PointingHand;
                });
            }
        }
        None => controller.grid_leave(),
    }

    let button = if response.clicked_by(PointerButton::Primary) {
        Button::Primary
    } else if response.clicked_by(PointerButton::Middle) {
        Button::Middle
    } else if response.clicked_by(PointerButton::Secondary) {
        Button::Secondary
    } else {
        return None;
    };
    let pointer = response.interact_pointer_pos()?;
    controller.grid_click(calendar, pointer - offset, button)
}

// Before the first frame measures the scroll area, the caller passes the
// space the area is about to fill.
fn centered_offset(center_y: f32, viewport_height: f32) -> f32 {
    (center_y - viewport_height * 0.5).max(0.0)
}

impl ViewModel {
    pub(in crate::app) fn draw_grid(&mut self, ui: &mut Ui) {
        let Some(Ok(calendar)) = &self.rendered else {
            return;
        };

        let mut scroll = egui::ScrollArea::both()
            .id_salt("life_grid")
            .auto_shrink([false, false]);
        if let Some(center_y) = self.pending_scroll.take() {
            let viewport = if self.grid_viewport_height > 0.0 {
                self.grid_viewport_height
            } else {
                ui.available_height()
            };
            scroll = scroll.vertical_scroll_offset(centered_offset(center_y, viewport));
        }

        let controller = &mut self.controller;
        let output = scroll.show(ui, |ui| paint_grid(ui, calendar, controller));
        self.grid_viewport_height = output.inner_rect.height();

        if let Some(tooltip) = &self.controller.grid.tooltip {
            draw_tooltip(ui.ctx(), "grid", tooltip);
        }
        if let Some(action) = output.inner {
            self.apply_action(action);
        }
    }
}
