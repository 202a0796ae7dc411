use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::calendar::{GridConfig, MinimapConfig, RenderedCalendar};
use crate::notes::NoteOpener;
use crate::vault::{LaunchOptions, Vault, load_vault};

mod debounce;
mod grid;
mod interaction;
mod minimap;
mod render_utils;
mod ui;

use debounce::Debouncer;
use interaction::InteractionController;

type LoadResult = Result<Vault, String>;

pub struct LifeCalendarApp {
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    vault: Vault,
    grid_config: GridConfig,
    minimap_config: MinimapConfig,
    rendered: Option<Result<RenderedCalendar, String>>,
    rendered_size: Vec2,
    /// Latest container size seen; differs from `rendered_size` while a
    /// resize is settling.
    observed_size: Vec2,
    controller: InteractionController,
    resize: Debouncer,
    pending_scroll: Option<f32>,
    scroll_to_today: bool,
    grid_viewport_height: f32,
    opener: Box<dyn NoteOpener>,
}

impl LifeCalendarApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::start_load(options.clone());
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(options: LaunchOptions) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_vault(&options).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(options: LaunchOptions) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(options),
        }
    }

    fn ready(vault: Vault) -> AppState {
        log::info!(
            "loaded vault {} ({} notes)",
            vault.root.display(),
            vault.notes.len()
        );
        AppState::Ready(Box::new(ViewModel::new(vault)))
    }
}

impl eframe::App for LifeCalendarApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(vault) => Self::ready(vault),
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reading daily notes...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the notes vault");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.options.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if ctx.input(|input| input.viewport().close_requested()) {
                    model.teardown();
                }

                if reload_requested && self.reload_rx.is_none() {
                    model.teardown();
                    self.reload_rx = Some(Self::spawn_load(self.options.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(vault) => Self::ready(vault),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if matches!(self.state, AppState::Loading { .. }) {
            ctx.request_repaint();
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
