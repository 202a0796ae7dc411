use chrono::{Months, NaiveDate};

use crate::error::CalendarError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub today: NaiveDate,
}

impl DateRange {
    pub fn for_life(
        birth: NaiveDate,
        max_age_years: u32,
        today: NaiveDate,
    ) -> Result<Self, CalendarError> {
        let end = max_age_years
            .checked_mul(12)
            .and_then(|months| birth.checked_add_months(Months::new(months)))
            .ok_or_else(|| CalendarError::RangeOverflow(birth.to_string()))?;

        Ok(Self {
            start: birth,
            end,
            today,
        })
    }

    pub fn day_count(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn days_since_start(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn one_year_range_is_inclusive() {
        let range = DateRange::for_life(date("1990-05-15"), 1, date("2020-01-01")).unwrap();
        assert_eq!(range.end, date("1991-05-15"));
        assert_eq!(range.day_count(), 366);
        assert_eq!(range.days().count(), 366);
    }

    #[test]
    fn leap_day_birth_clamps_end() {
        let range = DateRange::for_life(date("2000-02-29"), 1, date("2000-03-01")).unwrap();
        assert_eq!(range.end, date("2001-02-28"));
    }
}
