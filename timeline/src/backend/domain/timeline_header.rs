//! Column headers of the timeline: month bands, week bands and day labels.
//!
//! Labels are Portuguese. Weeks start on Sunday and week 1 is the week that
//! contains 1 January, so the last days of December can belong to week 1 of
//! the following year.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::holiday_calendar::{day_kind, DayKind};

const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["DOM", "SEG", "TER", "QUA", "QUI", "SEX", "SAB"];

const MONTH_NAMES: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

/// A run of consecutive days in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub span: usize,
}

/// A run of consecutive days in one locale week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekGroup {
    pub week_year: i32,
    pub week: u32,
    pub label: String,
    pub span: usize,
}

/// Header cell for a single day column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayHeader {
    pub date: NaiveDate,
    pub abbreviation: &'static str,
    pub day_of_month: u32,
    pub kind: DayKind,
}

pub fn weekday_abbreviation(date: NaiveDate) -> &'static str {
    WEEKDAY_ABBREVIATIONS[date.weekday().num_days_from_sunday() as usize]
}

/// e.g. "outubro 2026"
pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!("{} {}", name, year)
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn first_week_start(year: i32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(start_of_week)
        .unwrap_or(fallback)
}

/// (week-year, week number) with Sunday-start weeks and week 1 containing 1 January
pub fn locale_week(date: NaiveDate) -> (i32, u32) {
    let year = date.year();
    let next_year_start = first_week_start(year + 1, NaiveDate::MAX);

    let (week_year, year_start) = if date >= next_year_start {
        (year + 1, next_year_start)
    } else {
        (year, first_week_start(year, date))
    };

    let weeks = (start_of_week(date) - year_start).num_days() / 7;
    (week_year, weeks as u32 + 1)
}

pub fn month_groups(days: &[NaiveDate]) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();

    for day in days {
        match groups.last_mut() {
            Some(group) if group.year == day.year() && group.month == day.month() => {
                group.span += 1;
            }
            _ => groups.push(MonthGroup {
                year: day.year(),
                month: day.month(),
                label: month_label(day.year(), day.month()),
                span: 1,
            }),
        }
    }

    groups
}

pub fn week_groups(days: &[NaiveDate]) -> Vec<WeekGroup> {
    let mut groups: Vec<WeekGroup> = Vec::new();

    for day in days {
        let (week_year, week) = locale_week(*day);
        match groups.last_mut() {
            Some(group) if group.week_year == week_year && group.week == week => {
                group.span += 1;
            }
            _ => groups.push(WeekGroup {
                week_year,
                week,
                label: format!("Semana {}", week),
                span: 1,
            }),
        }
    }

    groups
}

pub fn day_headers(days: &[NaiveDate]) -> Vec<DayHeader> {
    days.iter()
        .map(|day| DayHeader {
            date: *day,
            abbreviation: weekday_abbreviation(*day),
            day_of_month: day.day(),
            kind: day_kind(*day),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
        start.iter_days().take(count).collect()
    }

    #[test]
    fn test_weekday_abbreviations() {
        assert_eq!(weekday_abbreviation(date(2024, 3, 17)), "DOM");
        assert_eq!(weekday_abbreviation(date(2024, 3, 18)), "SEG");
        assert_eq!(weekday_abbreviation(date(2024, 3, 23)), "SAB");
    }

    #[test]
    fn test_month_groups_span_boundaries() {
        let days = range(date(2024, 3, 30), 5);
        let groups = month_groups(&days);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "março 2024");
        assert_eq!(groups[0].span, 2);
        assert_eq!(groups[1].label, "abril 2024");
        assert_eq!(groups[1].span, 3);
    }

    #[test]
    fn test_locale_week_numbers() {
        // 2024-01-01 is a Monday; its week starts Sunday 2023-12-31
        assert_eq!(locale_week(date(2024, 1, 1)), (2024, 1));
        assert_eq!(locale_week(date(2023, 12, 31)), (2024, 1));
        assert_eq!(locale_week(date(2024, 1, 7)), (2024, 2));
        assert_eq!(locale_week(date(2023, 12, 30)), (2023, 52));
    }

    #[test]
    fn test_week_groups_break_on_sunday() {
        // Thursday 2024-03-14 through Tuesday 2024-03-19
        let days = range(date(2024, 3, 14), 6);
        let groups = week_groups(&days);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].span, 3);
        assert_eq!(groups[1].span, 3);
        assert_eq!(groups[1].week, groups[0].week + 1);
        assert!(groups[0].label.starts_with("Semana "));
    }

    #[test]
    fn test_day_headers() {
        let headers = day_headers(&range(date(2024, 12, 24), 2));
        assert_eq!(headers[0].day_of_month, 24);
        assert_eq!(headers[0].kind, DayKind::Workday);
        assert_eq!(headers[1].kind, DayKind::Holiday);
        assert_eq!(headers[1].abbreviation, "QUA");
    }
}
