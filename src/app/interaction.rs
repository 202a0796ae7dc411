use std::time::{Duration, Instant};

use eframe::egui::{Pos2, vec2};

use crate::age::{age_at, format_age};
use crate::calendar::{GeometryEntry, RenderedCalendar};
use crate::color::pick_contrasting_text_color;
use crate::notes::{NoteRequest, derived_note_path};

pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

const HOVER_REACH: f32 = 1.2;
const TOOLTIP_OFFSET: f32 = 14.0;
const AMBIENT_TOOLTIP_BACKGROUND: &str = "#2d333b";

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub key: String,
    pub text: String,
    pub background: String,
    pub text_color: &'static str,
    pub position: Pos2,
}

impl Tooltip {
    fn new(key: String, text: String, background: &str, pointer: Pos2) -> Self {
        Self {
            key,
            text,
            background: background.to_owned(),
            text_color: pick_contrasting_text_color(background),
            position: pointer + vec2(TOOLTIP_OFFSET, TOOLTIP_OFFSET),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SurfaceState {
    pub last_hovered_key: Option<String>,
    pub tooltip: Option<Tooltip>,
}

impl SurfaceState {
    fn clear(&mut self) {
        self.last_hovered_key = None;
        self.tooltip = None;
    }

    fn show(&mut self, key: &str, pointer: Pos2, build: impl FnOnce() -> (String, String)) {
        if self.last_hovered_key.as_deref() == Some(key)
            && let Some(tooltip) = self.tooltip.as_mut()
        {
            tooltip.position = pointer + vec2(TOOLTIP_OFFSET, TOOLTIP_OFFSET);
            return;
        }

        let (text, background) = build();
        self.tooltip = Some(Tooltip::new(key.to_owned(), text, &background, pointer));
        self.last_hovered_key = Some(key.to_owned());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostAction {
    ScrollTo { center_y: f32 },
    Note(NoteRequest),
}

#[derive(Clone, Debug, Default)]
struct ClickMemory {
    last_clicked_date: Option<String>,
    last_click_time: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    pub grid: SurfaceState,
    pub minimap: SurfaceState,
    minimap_clicks: ClickMemory,
}

fn grid_tooltip_text(calendar: &RenderedCalendar, entry: &GeometryEntry) -> String {
    let day = &entry.day;
    let mut lines = vec![
        format!("Age {}", age_at(calendar.birth, day.date)),
        day.date.format("%a %Y-%m-%d").to_string(),
    ];
    if let Some(label) = day.event_name.as_ref().or(day.period_label.as_ref()) {
        lines.push(label.clone());
    }
    lines.join("\n")
}

fn note_request(calendar: &RenderedCalendar, entry: &GeometryEntry, new_tab: bool) -> NoteRequest {
    match &entry.day.note_path {
        Some(path) => NoteRequest::Open {
            relative_path: path.clone(),
            new_tab,
        },
        None => NoteRequest::Create {
            relative_path: derived_note_path(&calendar.note_folder, &entry.date_key),
            date_key: entry.date_key.clone(),
            new_tab,
        },
    }
}

impl InteractionController {
    pub fn grid_hover(&mut self, calendar: &RenderedCalendar, pointer: Pos2, screen: Pos2) -> Cursor {
        let Some(entry) = calendar
            .grid
            .nearest_within(pointer, |radius| radius * HOVER_REACH)
        else {
            self.grid.clear();
            return Cursor::Default;
        };

        self.grid.show(&entry.date_key, screen, || {
            (grid_tooltip_text(calendar, entry), entry.fill_color.clone())
        });
        Cursor::Pointer
    }

    pub fn grid_leave(&mut self) {
        self.grid.clear();
    }

    pub fn grid_click(&self, calendar: &RenderedCalendar, pointer: Pos2, button: Button) -> Option<HostAction> {
        let new_tab = match button {
            Button::Primary => false,
            Button::Middle => true,
            Button::Secondary => return None,
        };

        let entry = calendar
            .grid
            .nearest_within(pointer, |radius| (radius * 1.1).max(radius + 3.0))?;
        Some(HostAction::Note(note_request(calendar, entry, new_tab)))
    }

    pub fn minimap_hover(&mut self, calendar: &RenderedCalendar, pointer: Pos2, screen: Pos2) -> Cursor {
        let minimap = &calendar.minimap;

        if let Some(band) = minimap.band_at(pointer) {
            self.minimap.show(&format!("period:{}", band.start_key), screen, || {
                let mut text = format!(
                    "Age {} - {}",
                    format_age(band.start_age),
                    format_age(band.end_age)
                );
                if let Some(label) = &band.label {
                    text.push('\n');
                    text.push_str(label);
                }
                (text, band.color.clone())
            });
            return Cursor::Pointer;
        }

        if let Some(event) = minimap.event_at(pointer.y) {
            self.minimap.show(&format!("event:{}", event.date_key), screen, || {
                let text = format!(
                    "Age {}\n{}\n{}",
                    age_at(calendar.birth, event.date),
                    event.date.format("%Y-%m-%d"),
                    event.label
                );
                (text, event.color.clone())
            });
            return Cursor::Pointer;
        }

        let age = format_age(minimap.age_at(pointer.y));
        self.minimap.show(&format!("age:{age}"), screen, || {
            (format!("Age {age}"), AMBIENT_TOOLTIP_BACKGROUND.to_owned())
        });
        Cursor::Default
    }

    pub fn minimap_leave(&mut self) {
        self.minimap.clear();
    }

    // A second click on the same event within the window opens its note.
    pub fn minimap_click(
        &mut self,
        calendar: &RenderedCalendar,
        pointer: Pos2,
        now: Instant,
    ) -> Option<HostAction> {
        let minimap = &calendar.minimap;

        if let Some(band) = minimap.band_at(pointer) {
            let entry = calendar.grid.geometry_for(&band.start_key)?;
            return Some(HostAction::ScrollTo {
                center_y: entry.center.y,
            });
        }

        let event = minimap.event_at(pointer.y)?;
        let entry = calendar.grid.geometry_for(&event.date_key)?;

        let is_repeat = self.minimap_clicks.last_clicked_date.as_deref() == Some(event.date_key.as_str())
            && self
                .minimap_clicks
                .last_click_time
                .is_some_and(|last| now.saturating_duration_since(last) <= DOUBLE_CLICK_WINDOW);

        if is_repeat {
            self.minimap_clicks = ClickMemory::default();
            return Some(HostAction::Note(note_request(calendar, entry, false)));
        }

        self.minimap_clicks = ClickMemory {
            last_clicked_date: Some(event.date_key.clone()),
            last_click_time: Some(now),
        };
        Some(HostAction::ScrollTo {
            center_y: entry.center.y,
        })
    }

    pub fn teardown(&mut self) {
        self.grid.clear();
        self.minimap.clear();
        self.minimap_clicks = ClickMemory::default();
    }
}
