use chrono::{Datelike, NaiveDate};

// Feb 29 birthdays fall on March 1 in common years.
fn anniversary(birth: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

fn age_year_fraction(birth: NaiveDate, target: NaiveDate) -> Option<f64> {
    let this_year = anniversary(birth, target.year())?;
    let (start, end) = if target >= this_year {
        (this_year, anniversary(birth, target.year() + 1)?)
    } else {
        (anniversary(birth, target.year() - 1)?, this_year)
    };

    let length = (end - start).num_days();
    if length <= 0 {
        return None;
    }
    Some((target - start).num_days() as f64 / length as f64)
}

pub fn age_in_years(birth: NaiveDate, target: NaiveDate) -> f64 {
    let mut years = target.year() - birth.year();
    if (target.month(), target.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }

    let fraction = age_year_fraction(birth, target).unwrap_or(0.0);
    (years as f64 + fraction).max(0.0)
}

pub fn age_at(birth: NaiveDate, target: NaiveDate) -> String {
    format_age(age_in_years(birth, target))
}

pub fn format_age(age: f64) -> String {
    let truncated = ((age.max(0.0) * 10.0) + 1e-9).floor() / 10.0;
    format!("{truncated:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn exact_anniversary_is_whole() {
        let birth = date("1990-05-15");
        assert_eq!(age_at(birth, date("2015-05-15")), "25.0");
        assert_eq!(age_at(birth, birth), "0.0");
    }

    #[test]
    fn day_before_anniversary_stays_below() {
        let birth = date("1990-05-15");
        let before = age_in_years(birth, date("2015-05-14"));
        assert!(before < 25.0);
        assert!(before > 24.9);
        assert_eq!(age_at(birth, date("2015-05-14")), "24.9");
    }

    #[test]
    fn age_is_monotonic_across_years() {
        let birth = date("1988-02-29");
        let mut previous = -1.0;
        let mut day = birth;
        let end = date("1997-01-01");
        while day <= end {
            let age = age_in_years(birth, day);
            let whole_years = (birth.year() + 1..=day.year())
                .filter(|year| anniversary(birth, *year).is_some_and(|at| at <= day))
                .count() as f64;
            assert!(age >= previous, "age regressed at {day}");
            assert!(age >= whole_years && age < whole_years + 1.0, "{age} at {day}");
            if anniversary(birth, day.year()) == Some(day) {
                assert_eq!(age, whole_years, "not whole at {day}");
            }
            previous = age;
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn leap_day_birthday_rolls_to_march() {
        let birth = date("2000-02-29");
        assert!(age_in_years(birth, date("2001-02-28")) < 1.0);
        assert_eq!(age_at(birth, date("2001-03-01")), "1.0");
        assert_eq!(age_at(birth, date("2004-02-29")), "4.0");
    }

    #[test]
    fn half_year_in_leap_window() {
        let birth = date("2000-01-01");
        let age = age_in_years(birth, date("2000-07-02"));
        assert!((age - 183.0 / 366.0).abs() < 1e-12);
    }

    #[test]
    fn dates_before_birth_clamp_to_zero() {
        let birth = date("2000-01-01");
        assert_eq!(age_in_years(birth, date("1999-06-01")), 0.0);
        assert_eq!(age_at(birth, date("1999-06-01")), "0.0");
    }
}
