use std::time::Instant;

use eframe::egui::{Align2, CursorIcon, FontId, PointerButton, Sense, Stroke, Ui, pos2, vec2};

use crate::calendar::RenderedCalendar;

use super::super::interaction::{Cursor, HostAction, InteractionController};
use super::super::render_utils::{color32, draw_tooltip, with_alpha};
use super::super::ViewModel;

fn paint_minimap(
    ui: &mut Ui,
    calendar: &RenderedCalendar,
    controller: &mut InteractionController,
) -> Option<HostAction> {
    let minimap = &calendar.minimap;
    let config = &minimap.config;
    let (rect, response) = ui.allocate_exact_size(
        vec2(config.width, ui.available_height()),
        Sense::click(),
    );
    let painter = ui.painter_at(rect);
    let offset = rect.min.to_vec2();

    painter.rect_filled(
        minimap.ghost.translate(offset),
        2.0,
        with_alpha(color32(&config.ghost_color), config.ghost_opacity),
    );
    for band in &minimap.bands {
        painter.rect_filled(band.rect.translate(offset), 0.0, color32(&band.color));
    }

    let tick_stroke = Stroke::new(1.0, color32(&config.tick_color));
    for tick in &minimap.ticks {
        let y = rect.top() + tick.y;
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], tick_stroke);
        painter.text(
            pos2(rect.right() - 1.0, y - 1.0),
            Align2::RIGHT_BOTTOM,
            tick.years.to_string(),
            FontId::proportional(9.0),
            tick_stroke.color,
        );
    }

    for event in &minimap.events {
        painter.rect_filled(event.rect.translate(offset), 0.0, color32(&event.color));
    }

    match response.hover_pos() {
        Some(pointer) => {
            if controller.minimap_hover(calendar, pointer - offset, pointer) == Cursor::Pointer {
                ui.output_mut(|output| {
                    output.cursor_icon = CursorIcon::PointingHand;
                });
            }
        }
        None => controller.minimap_leave(),
    }

    if !response.clicked_by(PointerButton::Primary) {
        return None;
    }
    let pointer = response.interact_pointer_pos()?;
    controller.minimap_click(calendar, pointer - offset, Instant::now())
}

impl ViewModel {
    pub(in crate::app) fn draw_minimap(&mut self, ui: &mut Ui) {
        let Some(Ok(calendar)) = &self.rendered else {
            return;
        };

        let action = paint_minimap(ui, calendar, &mut self.controller);

        if let Some(tooltip) = &self.controller.minimap.tooltip {
            draw_tooltip(ui.ctx(), "minimap", tooltip);
        }
        if let Some(action) = action {
            self.apply_action(action);
        }
    }
}
