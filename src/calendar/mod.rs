mod grid;
mod minimap;
mod plan;
mod range;
mod spatial;
mod svg;

use std::time::Instant;

use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::notes::{DateFormat, NoteIndex};
use crate::settings::{MAX_AGE_RANGE, Settings};

use grid::GridScene;
use minimap::MinimapScene;
use range::DateRange;

pub use grid::{CircleBatch, GeometryEntry, GridConfig};
pub use minimap::MinimapConfig;
pub use svg::write_svg;

pub struct RenderRequest<'a> {
    pub settings: &'a Settings,
    pub notes: &'a NoteIndex,
    pub today: NaiveDate,
    pub container_width: f32,
    pub minimap_height: f32,
    pub grid: &'a GridConfig,
    pub minimap: &'a MinimapConfig,
}

pub struct RenderedCalendar {
    pub range: DateRange,
    pub format: DateFormat,
    pub birth: NaiveDate,
    pub note_folder: String,
    pub grid: GridScene,
    pub minimap: MinimapScene,
}

impl RenderedCalendar {
    pub fn today_key(&self) -> String {
        self.format.format(self.range.today)
    }
}

fn parse_birthday(settings: &Settings) -> Result<NaiveDate, CalendarError> {
    let birthday = settings.birthday.trim();
    if birthday.is_empty() {
        return Err(CalendarError::MissingBirthday);
    }
    NaiveDate::parse_from_str(birthday, "%Y-%m-%d")
        .map_err(|_| CalendarError::InvalidBirthday(birthday.to_owned()))
}

pub fn render(request: &RenderRequest<'_>) -> Result<RenderedCalendar, CalendarError> {
    let started = Instant::now();
    let settings = request.settings;

    let birth = parse_birthday(settings)?;
    if !MAX_AGE_RANGE.contains(&(settings.max_age as i64)) {
        return Err(CalendarError::InvalidMaxAge(settings.max_age as i64));
    }
    let format = DateFormat::parse(&settings.daily_note_format)?;
    let range = DateRange::for_life(birth, settings.max_age, request.today)?;
    let periods = plan::resolve_periods(&settings.periods, request.today)?;

    let paint_plan = plan::build_paint_plan(&range, request.notes, &periods, &format);
    let grid = grid::render_grid(&paint_plan, request.grid, request.container_width);
    let minimap = minimap::render_minimap(
        &paint_plan,
        &range,
        &periods,
        settings.max_age,
        &format,
        request.minimap,
        request.minimap_height,
    );

    log::debug!(
        "rendered {} days ({} per row, {} draw calls) in {:.1?}",
        grid.geometry.len(),
        grid.days_per_row,
        grid.draw_calls(),
        started.elapsed()
    );

    Ok(RenderedCalendar {
        range,
        format,
        birth,
        note_folder: settings.daily_note_folder.clone(),
        grid,
        minimap,
    })
}
