use chrono::{Datelike, NaiveDate};

use crate::color::normalize_to_hex;
use crate::error::CalendarError;
use crate::notes::{DateFormat, NoteIndex};
use crate::settings::Period;

use super::range::DateRange;

const PERIOD_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub date_key: String,
    pub is_today: bool,
    pub has_note: bool,
    pub note_path: Option<String>,
    pub period_color: Option<String>,
    pub period_label: Option<String>,
    pub override_color: Option<String>,
    pub event_name: Option<String>,
}

impl DayRecord {
    pub fn is_specially_bordered(&self) -> bool {
        self.is_today || (self.override_color.is_some() && self.event_name.is_some())
    }

    pub fn is_minimap_event(&self) -> bool {
        self.override_color.is_some() && self.event_name.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PaintInstruction {
    YearMarker { year: i32 },
    DayMarker(DayRecord),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub color: String,
    pub label: Option<String>,
}

impl PeriodSpan {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn parse_period_date(value: &str, index: usize, field: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(value.trim(), PERIOD_DATE_FORMAT).map_err(|_| {
        CalendarError::InvalidPeriod {
            index,
            reason: format!("{field} {value:?} is not a YYYY-MM-DD date"),
        }
    })
}

pub fn resolve_periods(
    periods: &[Period],
    today: NaiveDate,
) -> Result<Vec<PeriodSpan>, CalendarError> {
    let mut spans = Vec::with_capacity(periods.len());
    for (index, period) in periods.iter().enumerate() {
        let start = parse_period_date(&period.start, index, "start")?;
        let end = if period.is_open_ended() {
            today
        } else {
            parse_period_date(&period.end, index, "end")?
        };

        if end < start {
            log::warn!("skipping period #{index}: ends ({end}) before it starts ({start})");
            continue;
        }

        spans.push(PeriodSpan {
            start,
            end,
            color: normalize_to_hex(&period.color),
            label: period.label.clone(),
        });
    }
    Ok(spans)
}

pub fn build_paint_plan(
    range: &DateRange,
    notes: &NoteIndex,
    periods: &[PeriodSpan],
    format: &DateFormat,
) -> Vec<PaintInstruction> {
    let day_count = range.day_count();
    let year_count = (range.end.year() - range.start.year() + 1).max(0) as usize;
    let mut plan = Vec::with_capacity(day_count + year_count);

    for (index, date) in range.days().enumerate() {
        if index == 0 || (date.month() == 1 && date.day() == 1) {
            plan.push(PaintInstruction::YearMarker { year: date.year() });
        }

        let date_key = format.format(date);
        let note_path = notes.path_for(&date_key).map(str::to_owned);
        let has_note = notes.keys.contains(&date_key) && note_path.is_some();
        let period = periods.iter().find(|period| period.contains(date));

        plan.push(PaintInstruction::DayMarker(DayRecord {
            date,
            is_today: date == range.today,
            has_note,
            note_path,
            period_color: period.map(|period| period.color.clone()),
            period_label: period.and_then(|period| period.label.clone()),
            override_color: notes.overrides.get(&date_key).cloned(),
            event_name: notes.events.get(&date_key).cloned(),
            date_key,
        }));
    }

    plan
}

pub fn day_records(plan: &[PaintInstruction]) -> impl Iterator<Item = &DayRecord> {
    plan.iter().filter_map(|instruction| match instruction {
        PaintInstruction::DayMarker(day) => Some(day),
        PaintInstruction::YearMarker { .. } => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn iso() -> DateFormat {
        DateFormat::parse("YYYY-MM-DD").unwrap()
    }

    fn period(start: &str, end: &str, color: &str, label: Option<&str>) -> Period {
        Period {
            start: start.into(),
            end: end.into(),
            color: color.into(),
            label: label.map(str::to_owned),
        }
    }

    fn counts(plan: &[PaintInstruction]) -> (usize, Vec<i32>) {
        let days = day_records(plan).count();
        let years = plan
            .iter()
            .filter_map(|instruction| match instruction {
                PaintInstruction::YearMarker { year } => Some(*year),
                PaintInstruction::DayMarker(_) => None,
            })
            .collect();
        (days, years)
    }

    #[test]
    fn one_year_life_without_notes() {
        let range = DateRange::for_life(date("1990-05-15"), 1, date("2024-03-01")).unwrap();
        let plan = build_paint_plan(&range, &NoteIndex::default(), &[], &iso());

        let (days, years) = counts(&plan);
        assert_eq!(days, 366);
        assert_eq!(years, vec![1990, 1991]);
        assert!(matches!(plan[0], PaintInstruction::YearMarker { year: 1990 }));

        let first = day_records(&plan).next().unwrap();
        assert_eq!(first.date_key, "1990-05-15");
        assert!(!first.is_today);
        assert!(day_records(&plan).all(|day| day.period_color.is_none() && !day.has_note));
    }

    #[test]
    fn today_is_flagged_once() {
        let range = DateRange::for_life(date("1990-05-15"), 1, date("1990-05-15")).unwrap();
        let plan = build_paint_plan(&range, &NoteIndex::default(), &[], &iso());
        let today = day_records(&plan).filter(|day| day.is_today).collect::<Vec<_>>();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date_key, "1990-05-15");
    }

    #[test]
    fn january_first_start_is_not_double_counted() {
        let range = DateRange::for_life(date("2000-01-01"), 2, date("2001-01-01")).unwrap();
        let plan = build_paint_plan(&range, &NoteIndex::default(), &[], &iso());

        let (days, years) = counts(&plan);
        assert_eq!(days, range.day_count());
        assert_eq!(days, 366 + 365 + 1);
        assert_eq!(years, vec![2000, 2001, 2002]);
        assert!(matches!(plan[0], PaintInstruction::YearMarker { year: 2000 }));
        assert!(matches!(&plan[1], PaintInstruction::DayMarker(day) if day.date_key == "2000-01-01"));
    }

    #[test]
    fn every_day_appears_once_in_order() {
        let range = DateRange::for_life(date("1987-12-30"), 3, date("1990-01-01")).unwrap();
        let plan = build_paint_plan(&range, &NoteIndex::default(), &[], &iso());
        let mut expected = range.start;
        for day in day_records(&plan) {
            assert_eq!(day.date, expected);
            expected = expected.succ_opt().unwrap();
        }
        assert_eq!(expected, range.end.succ_opt().unwrap());
    }

    #[test]
    fn first_declared_period_wins() {
        let today = date("2030-01-01");
        let periods = resolve_periods(
            &[
                period("2000-01-01", "2000-12-31", "#112233", Some("School")),
                period("2000-06-01", "2001-06-01", "#445566", Some("Job")),
            ],
            today,
        )
        .unwrap();
        let range = DateRange::for_life(date("1999-06-01"), 3, today).unwrap();
        let plan = build_paint_plan(&range, &NoteIndex::default(), &periods, &iso());

        let find = |key: &str| day_records(&plan).find(|day| day.date_key == key).unwrap();
        assert_eq!(find("2000-07-01").period_color.as_deref(), Some("#112233"));
        assert_eq!(find("2000-07-01").period_label.as_deref(), Some("School"));
        assert_eq!(find("2001-03-01").period_color.as_deref(), Some("#445566"));
        assert_eq!(find("1999-12-31").period_color, None);
    }

    #[test]
    fn open_ended_period_runs_until_today() {
        let today = date("2020-06-15");
        let spans = resolve_periods(&[period("2020-01-01", "present", "red", None)], today).unwrap();
        assert_eq!(spans[0].end, today);
        assert_eq!(spans[0].color, "#ff0000");
        assert!(spans[0].contains(today));
        assert!(!spans[0].contains(date("2020-06-16")));
    }

    #[test]
    fn malformed_period_is_reported() {
        let today = date("2020-06-15");
        let error = resolve_periods(
            &[
                period("2020-01-01", "", "#fff", None),
                period("soon", "", "#fff", None),
            ],
            today,
        )
        .unwrap_err();
        assert!(matches!(error, CalendarError::InvalidPeriod { index: 1, .. }));
    }

    #[test]
    fn inverted_period_is_skipped() {
        let spans = resolve_periods(
            &[period("2020-05-01", "2020-01-01", "#fff", None)],
            date("2021-01-01"),
        )
        .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn note_requires_key_and_path() {
        let mut notes = NoteIndex::default();
        notes.insert("1990-05-20", "1990-05-20.md");
        notes.keys.insert("1990-05-21".into());
        notes.overrides.insert("1990-05-20".into(), "#aabbcc".into());
        notes.events.insert("1990-05-20".into(), "Party".into());

        let range = DateRange::for_life(date("1990-05-15"), 1, date("2000-01-01")).unwrap();
        let plan = build_paint_plan(&range, &notes, &[], &iso());
        let find = |key: &str| day_records(&plan).find(|day| day.date_key == key).unwrap();

        let party = find("1990-05-20");
        assert!(party.has_note);
        assert_eq!(party.note_path.as_deref(), Some("1990-05-20.md"));
        assert_eq!(party.override_color.as_deref(), Some("#aabbcc"));
        assert!(party.is_specially_bordered());
        assert!(party.is_minimap_event());
        assert!(!find("1990-05-21").has_note);
    }
}
