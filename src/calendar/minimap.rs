use chrono::NaiveDate;
use eframe::egui::{Pos2, Rect, pos2};

use crate::age::age_in_years;
use crate::notes::DateFormat;

use super::plan::{PaintInstruction, PeriodSpan, day_records};
use super::range::DateRange;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Clone, Debug)]
pub struct MinimapConfig {
    pub width: f32,
    pub top_padding: f32,
    pub band_x: f32,
    pub band_width: f32,
    pub event_x: f32,
    pub event_width: f32,
    pub event_height: f32,
    pub event_hit_slop: f32,
    pub tick_years: u32,
    pub ghost_color: String,
    pub ghost_opacity: f32,
    pub tick_color: String,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            width: 72.0,
            top_padding: 20.0,
            band_x: 10.0,
            band_width: 18.0,
            event_x: 34.0,
            event_width: 24.0,
            event_height: 3.0,
            event_hit_slop: 2.0,
            tick_years: 10,
            ghost_color: "#c9d1d9".to_owned(),
            ghost_opacity: 0.08,
            tick_color: "#57606a".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MinimapPeriodBand {
    pub rect: Rect,
    pub color: String,
    pub label: Option<String>,
    pub start_age: f64,
    pub end_age: f64,
    /// Key of the first in-range day, used to scroll the grid.
    pub start_key: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MinimapEvent {
    pub date_key: String,
    pub date: NaiveDate,
    pub color: String,
    pub label: String,
    pub progress: f32,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecadeTick {
    pub years: u32,
    pub y: f32,
}

#[derive(Clone, Debug)]
pub struct MinimapScene {
    pub config: MinimapConfig,
    pub height: f32,
    pub max_age_years: u32,
    pub ghost: Rect,
    pub bands: Vec<MinimapPeriodBand>,
    pub ticks: Vec<DecadeTick>,
    pub events: Vec<MinimapEvent>,
}

impl MinimapScene {
    fn axis_length(&self) -> f32 {
        (self.height - self.config.top_padding * 2.0).max(1.0)
    }

    pub fn y_for_progress(&self, progress: f32) -> f32 {
        self.config.top_padding + progress * self.axis_length()
    }

    pub fn progress_at(&self, y: f32) -> f32 {
        ((y - self.config.top_padding) / self.axis_length()).clamp(0.0, 1.0)
    }

    pub fn age_at(&self, y: f32) -> f64 {
        self.progress_at(y) as f64 * self.max_age_years as f64
    }

    /// Band under the pointer; the pointer must be inside the band column.
    pub fn band_at(&self, position: Pos2) -> Option<&MinimapPeriodBand> {
        let in_column = position.x >= self.config.band_x
            && position.x <= self.config.band_x + self.config.band_width;
        if !in_column {
            return None;
        }
        self.bands
            .iter()
            .find(|band| position.y >= band.rect.top() && position.y <= band.rect.bottom())
    }

    pub fn event_at(&self, y: f32) -> Option<&MinimapEvent> {
        let slop = self.config.event_hit_slop;
        self.events
            .iter()
            .find(|event| y >= event.rect.top() - slop && y <= event.rect.bottom() + slop)
    }
}

pub fn render_minimap(
    plan: &[PaintInstruction],
    range: &DateRange,
    periods: &[PeriodSpan],
    max_age_years: u32,
    format: &DateFormat,
    config: &MinimapConfig,
    height: f32,
) -> MinimapScene {
    let total_days = (max_age_years as f64 * DAYS_PER_YEAR).max(1.0);
    let progress_of = |date: NaiveDate| (range.days_since_start(date) as f64 / total_days) as f32;

    let mut scene = MinimapScene {
        config: config.clone(),
        height,
        max_age_years,
        ghost: Rect::NOTHING,
        bands: Vec::new(),
        ticks: Vec::new(),
        events: Vec::new(),
    };

    let top = scene.y_for_progress(0.0);
    let bottom = scene.y_for_progress(1.0);
    scene.ghost = Rect::from_min_max(
        pos2(config.band_x, top),
        pos2(config.band_x + config.band_width, bottom),
    );

    for period in periods {
        let start_progress = progress_of(period.start);
        let end_progress = progress_of(period.end);
        if start_progress > 1.0 || end_progress < 0.0 {
            continue;
        }

        let from = scene.y_for_progress(start_progress.clamp(0.0, 1.0));
        let to = scene.y_for_progress(end_progress.clamp(0.0, 1.0));
        let start = period.start.clamp(range.start, range.end);
        let end = period.end.clamp(range.start, range.end);

        scene.bands.push(MinimapPeriodBand {
            rect: Rect::from_min_max(
                pos2(config.band_x, from),
                pos2(config.band_x + config.band_width, to.max(from + 1.0)),
            ),
            color: period.color.clone(),
            label: period.label.clone(),
            start_age: age_in_years(range.start, start),
            end_age: age_in_years(range.start, end),
            start_key: format.format(start),
        });
    }

    let step = config.tick_years.max(1);
    scene.ticks = (1..)
        .map(|index| index * step)
        .take_while(|years| *years < max_age_years)
        .map(|years| DecadeTick {
            years,
            y: scene.y_for_progress((years as f64 / max_age_years as f64) as f32),
        })
        .collect();

    let half_height = config.event_height * 0.5;
    for day in day_records(plan).filter(|day| day.is_minimap_event()) {
        let (Some(color), Some(label)) = (&day.override_color, &day.event_name) else {
            continue;
        };
        let progress = progress_of(day.date).clamp(0.0, 1.0);
        let y = scene.y_for_progress(progress);
        scene.events.push(MinimapEvent {
            date_key: day.date_key.clone(),
            date: day.date,
            color: color.clone(),
            label: label.clone(),
            progress,
            rect: Rect::from_min_max(
                pos2(config.event_x, y - half_height),
                pos2(config.event_x + config.event_width, y + half_height),
            ),
        });
    }

    log::debug!(
        "minimap: {} bands, {} ticks, {} events",
        scene.bands.len(),
        scene.ticks.len(),
        scene.events.len()
    );
    scene
}
