use std::time::Instant;

use eframe::egui::{self, Align, Context, Layout, RichText, Vec2, vec2};

use crate::calendar::{GridConfig, MinimapConfig, RenderRequest, render};
use crate::notes::{NoteRequest, SystemOpener, fulfil};
use crate::vault::Vault;

use super::super::debounce::Debouncer;
use super::super::interaction::{HostAction, InteractionController};
use super::super::ViewModel;

const MINIMAP_PANEL_MARGIN: f32 = 8.0;

impl ViewModel {
    pub(in crate::app) fn new(vault: Vault) -> Self {
        Self {
            vault,
            grid_config: GridConfig::default(),
            minimap_config: MinimapConfig::default(),
            rendered: None,
            rendered_size: Vec2::ZERO,
            observed_size: Vec2::ZERO,
            controller: InteractionController::default(),
            resize: Debouncer::default(),
            pending_scroll: None,
            scroll_to_today: true,
            grid_viewport_height: 0.0,
            opener: Box::new(SystemOpener),
        }
    }

    /// Full re-derivation for the given container size. Failures become the
    /// inline message shown instead of the grid.
    pub(in crate::app) fn rerender(&mut self, size: Vec2) {
        self.controller.teardown();
        let result = render(&RenderRequest {
            settings: &self.vault.settings,
            notes: &self.vault.notes,
            today: self.vault.today,
            container_width: size.x,
            minimap_height: size.y,
            grid: &self.grid_config,
            minimap: &self.minimap_config,
        });

        if let Err(error) = &result {
            log::warn!("calendar not rendered: {error}");
        }
        self.rendered = Some(result.map_err(|error| error.to_string()));
        self.rendered_size = size;
    }

    fn track_container(&mut self, ctx: &Context, size: Vec2) {
        let now = Instant::now();
        if self.rendered.is_none() {
            self.observed_size = size;
            self.rerender(size);
            return;
        }

        if (size - self.observed_size).length() > 0.5 {
            self.observed_size = size;
            if (size - self.rendered_size).length() > 0.5 {
                self.resize.schedule(now);
            } else {
                self.resize.cancel();
            }
        }

        if self.resize.poll(now) {
            log::debug!("container settled at {:.0}x{:.0}", size.x, size.y);
            self.rerender(self.observed_size);
        } else if let Some(remaining) = self.resize.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }

    pub(in crate::app) fn scroll_to_key(&mut self, date_key: &str) {
        let Some(Ok(calendar)) = &self.rendered else {
            return;
        };
        if let Some(entry) = calendar.grid.geometry_for(date_key) {
            self.pending_scroll = Some(entry.center.y);
        }
    }

    pub(in crate::app) fn apply_action(&mut self, action: HostAction) {
        match action {
            HostAction::ScrollTo { center_y } => self.pending_scroll = Some(center_y),
            HostAction::Note(request) => {
                let created = fulfil(&request, &self.vault.root, self.opener.as_ref());
                if created && let NoteRequest::Create {
                    relative_path,
                    date_key,
                    ..
                } = &request
                {
                    self.vault.record_created_note(date_key, relative_path);
                    self.rerender(self.rendered_size);
                }
            }
        }
    }

    pub(in crate::app) fn teardown(&mut self) {
        self.controller.teardown();
        self.resize.cancel();
    }

    fn status_text(&self) -> Option<String> {
        let Some(Ok(calendar)) = &self.rendered else {
            return None;
        };
        Some(format!(
            "{} days  |  {} rows  |  {} draw calls",
            calendar.grid.geometry.len(),
            calendar.grid.rows,
            calendar.grid.draw_calls()
        ))
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, reload_requested: &mut bool, is_loading: bool) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Life calendar");
                    ui.separator();
                    ui.label(format!("vault: {}", self.vault.root.display()));
                    ui.label(format!("notes: {}", self.vault.notes.len()));
                    if !self.vault.settings.birthday.is_empty() {
                        ui.label(format!("born: {}", self.vault.settings.birthday));
                    }
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Today").clicked() {
                        self.scroll_to_today = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = self.status_text() {
                            ui.label(status);
                        }
                    });
                });
            });

        let minimap_width = self.minimap_config.width;
        let minimap_panel = egui::SidePanel::right("minimap")
            .resizable(false)
            .exact_width(minimap_width + MINIMAP_PANEL_MARGIN * 2.0)
            .show(ctx, |ui| {
                let height = ui.available_height();
                if matches!(self.rendered, Some(Ok(_))) {
                    self.draw_minimap(ui);
                } else {
                    ui.allocate_space(vec2(minimap_width, height));
                }
                height
            });
        let minimap_height = minimap_panel.inner;

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reading daily notes...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
                return;
            }

            let container = vec2(ui.available_width() + minimap_width, minimap_height);
            self.track_container(ctx, container);

            if self.scroll_to_today {
                self.scroll_to_today = false;
                let today = match &self.rendered {
                    Some(Ok(calendar)) => Some(calendar.today_key()),
                    _ => None,
                };
                if let Some(key) = today {
                    self.scroll_to_key(&key);
                }
            }

            if matches!(self.rendered, Some(Ok(_))) {
                self.draw_grid(ui);
            } else if let Some(Err(message)) = &self.rendered {
                self.draw_message(ui, message);
            }
        });
    }

    fn draw_message(&self, ui: &mut egui::Ui, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("Calendar unavailable");
            ui.add_space(6.0);
            ui.label(message);
            ui.add_space(6.0);
            ui.label(
                RichText::new(format!(
                    "Edit {} and press Reload.",
                    self.vault.settings_path.display()
                ))
                .weak(),
            );
        });
    }
}
