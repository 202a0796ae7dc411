use std::collections::HashMap;
use std::f32::consts::PI;
use std::fmt::Write as _;

use eframe::egui::{Pos2, Rect, pos2, vec2};

use crate::color::{adjust_brightness, derive_note_color};

use super::plan::{DayRecord, PaintInstruction};
use super::spatial::{DEFAULT_CELL_SIZE, SpatialIndex};

#[derive(Clone, Debug)]
pub struct GridConfig {
    pub square_size: f32,
    pub gap: f32,
    pub header_span: usize,
    pub minimap_width: f32,
    pub margin: f32,
    pub fill_ratio: f32,
    pub event_multiplier: f32,
    pub base_multiplier: f32,
    pub cell_size: f32,
    pub empty_color: String,
    pub note_color: String,
    pub border_color: String,
    pub border_width: f32,
    pub note_stroke_width: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            square_size: 10.0,
            gap: 3.0,
            header_span: 4,
            minimap_width: 72.0,
            margin: 16.0,
            fill_ratio: 0.85,
            event_multiplier: 1.15,
            base_multiplier: 1.0,
            cell_size: DEFAULT_CELL_SIZE,
            empty_color: "#2b3038".to_owned(),
            note_color: "#6fa8dc".to_owned(),
            border_color: "#ff5a5f".to_owned(),
            border_width: 1.6,
            note_stroke_width: 1.4,
        }
    }
}

impl GridConfig {
    pub fn pitch(&self) -> f32 {
        self.square_size + self.gap
    }

    pub fn days_per_row(&self, container_width: f32) -> usize {
        let available = container_width - self.minimap_width - self.margin * 2.0;
        let columns = (available / self.pitch()).floor();
        let columns = if columns.is_finite() && columns > 0.0 {
            columns as usize
        } else {
            0
        };
        columns.max(self.header_span + 1)
    }

    pub fn radius_for(&self, has_override: bool) -> f32 {
        let multiplier = if has_override {
            self.event_multiplier
        } else {
            self.base_multiplier
        };
        (self.square_size * self.square_size / PI).sqrt() * self.fill_ratio * multiplier
    }

    pub fn fill_for(&self, day: &DayRecord) -> String {
        if let Some(color) = &day.override_color {
            color.clone()
        } else if let Some(color) = &day.period_color {
            color.clone()
        } else if day.has_note {
            self.note_color.clone()
        } else {
            self.empty_color.clone()
        }
    }

    pub fn note_stroke_for(&self, day: &DayRecord, fill: &str) -> Option<String> {
        if !day.has_note || day.override_color.is_some() {
            return None;
        }
        Some(derive_note_color(
            day.period_color.as_deref(),
            &adjust_brightness(fill, -40),
        ))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchStyle {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Pos2,
    pub radius: f32,
}

#[derive(Clone, Debug)]
pub struct CircleBatch {
    pub style: BatchStyle,
    pub circles: Vec<Circle>,
}

impl CircleBatch {
    fn new(style: BatchStyle) -> Self {
        Self {
            style,
            circles: Vec::new(),
        }
    }

    pub fn path_data(&self) -> String {
        let mut d = String::with_capacity(self.circles.len() * 48);
        for circle in &self.circles {
            let Circle { center, radius: r } = *circle;
            let _ = write!(
                d,
                "M{:.2},{:.2}a{r:.2},{r:.2} 0 1,0 {:.2},0a{r:.2},{r:.2} 0 1,0 {:.2},0",
                center.x - r,
                center.y,
                r * 2.0,
                -r * 2.0,
            );
        }
        d
    }
}

#[derive(Clone, Debug)]
pub struct YearHeader {
    pub year: i32,
    pub rect: Rect,
    pub milestone: bool,
    pub fill: &'static str,
    pub text_color: &'static str,
}

impl YearHeader {
    fn new(year: i32, rect: Rect) -> Self {
        let milestone = year.rem_euclid(5) == 0;
        let (fill, text_color) = if milestone {
            ("#c9a227", "#1b1b1b")
        } else {
            ("#2d333b", "#c9d1d9")
        };
        Self {
            year,
            rect,
            milestone,
            fill,
            text_color,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeometryEntry {
    pub center: Pos2,
    pub radius: f32,
    pub date_key: String,
    pub fill_color: String,
    pub day: DayRecord,
}

#[derive(Clone, Debug)]
pub struct GridScene {
    pub width: f32,
    pub height: f32,
    pub days_per_row: usize,
    pub rows: usize,
    pub batches: Vec<CircleBatch>,
    pub borders: CircleBatch,
    pub headers: Vec<YearHeader>,
    pub geometry: Vec<GeometryEntry>,
    pub index: SpatialIndex<usize>,
    lookup: HashMap<String, usize>,
}

impl GridScene {
    pub fn geometry_for(&self, date_key: &str) -> Option<&GeometryEntry> {
        self.lookup
            .get(date_key)
            .and_then(|index| self.geometry.get(*index))
    }

    pub fn nearest_within(
        &self,
        position: Pos2,
        reach: impl Fn(f32) -> f32,
    ) -> Option<&GeometryEntry> {
        if self.index.is_empty() {
            return None;
        }
        self.index
            .query_near(position)
            .filter_map(|index| self.geometry.get(*index))
            .map(|entry| (entry, entry.center.distance(position)))
            .filter(|(entry, distance)| *distance <= reach(entry.radius))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entry, _)| entry)
    }

    pub fn draw_calls(&self) -> usize {
        self.batches.len() + usize::from(!self.borders.circles.is_empty())
    }
}

pub fn render_grid(plan: &[PaintInstruction], config: &GridConfig, container_width: f32) -> GridScene {
    let pitch = config.pitch();
    let days_per_row = config.days_per_row(container_width);
    let origin = pos2(config.margin, config.margin);

    let mut row = 0usize;
    let mut col = 0usize;
    let mut headers = Vec::new();
    let mut geometry = Vec::with_capacity(plan.len());
    let mut index = SpatialIndex::new(config.cell_size);
    let mut lookup = HashMap::with_capacity(plan.len());
    let mut batches: Vec<CircleBatch> = Vec::new();
    let mut batch_by_style: HashMap<(Option<String>, Option<String>, u32), usize> = HashMap::new();
    let mut borders = CircleBatch::new(BatchStyle {
        fill: None,
        stroke: Some(config.border_color.clone()),
        stroke_width: config.border_width,
    });

    for instruction in plan {
        match instruction {
            PaintInstruction::YearMarker { year } => {
                if col > 0 && col + config.header_span > days_per_row {
                    row += 1;
                    col = 0;
                }
                let min = origin + vec2(col as f32 * pitch, row as f32 * pitch);
                let size = vec2(config.header_span as f32 * pitch - config.gap, config.square_size);
                headers.push(YearHeader::new(*year, Rect::from_min_size(min, size)));
                col += config.header_span;
            }
            PaintInstruction::DayMarker(day) => {
                if col >= days_per_row {
                    row += 1;
                    col = 0;
                }
                let center = origin
                    + vec2(
                        col as f32 * pitch + config.square_size * 0.5,
                        row as f32 * pitch + config.square_size * 0.5,
                    );
                col += 1;

                let radius = config.radius_for(day.override_color.is_some());
                let fill = config.fill_for(day);
                let stroke = config.note_stroke_for(day, &fill);
                let stroke_width = if stroke.is_some() {
                    config.note_stroke_width
                } else {
                    0.0
                };

                let key = (Some(fill.clone()), stroke.clone(), stroke_width.to_bits());
                let batch_index = *batch_by_style.entry(key).or_insert_with(|| {
                    batches.push(CircleBatch::new(BatchStyle {
                        fill: Some(fill.clone()),
                        stroke,
                        stroke_width,
                    }));
                    batches.len() - 1
                });
                batches[batch_index].circles.push(Circle { center, radius });

                if day.is_specially_bordered() {
                    borders.circles.push(Circle {
                        center,
                        radius: radius + config.border_width,
                    });
                }

                let entry_index = geometry.len();
                index.insert(center, entry_index);
                lookup.insert(day.date_key.clone(), entry_index);
                geometry.push(GeometryEntry {
                    center,
                    radius,
                    date_key: day.date_key.clone(),
                    fill_color: fill,
                    day: day.clone(),
                });
            }
        }
    }

    let rows = if plan.is_empty() { 0 } else { row + 1 };
    let width = config.margin * 2.0 + days_per_row as f32 * pitch - config.gap;
    let height = config.margin * 2.0 + rows as f32 * pitch - config.gap;

    log::debug!(
        "grid: {} days in {rows} rows of {days_per_row}, {} batches, {}px index buckets",
        index.len(),
        batches.len(),
        index.cell_size()
    );

    GridScene {
        width,
        height: height.max(config.margin * 2.0),
        days_per_row,
        rows,
        batches,
        borders,
        headers,
        geometry,
        index,
        lookup,
    }
}
