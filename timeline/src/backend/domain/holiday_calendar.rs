//! Holiday and weekend classification for grid shading.
//!
//! Fixed-date national holidays repeat every year. Moveable holidays
//! (Carnival, Good Friday, Corpus Christi) are only known for the years
//! listed in [`MOVEABLE_HOLIDAYS`]; every other year reports none. Dates for
//! further years have to be added to the table explicitly.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Fixed-date holidays as (month, day)
const FIXED_HOLIDAYS: [(u32, u32); 8] = [
    (1, 1),   // Confraternização Universal
    (4, 21),  // Tiradentes
    (5, 1),   // Dia do Trabalho
    (9, 7),   // Independência
    (10, 12), // Nossa Senhora Aparecida
    (11, 2),  // Finados
    (11, 15), // Proclamação da República
    (12, 25), // Natal
];

/// Moveable holidays per year as (month, day)
const MOVEABLE_HOLIDAYS: &[(i32, &[(u32, u32)])] = &[(
    2024,
    &[
        (2, 12), // Carnaval
        (2, 13), // Carnaval
        (3, 29), // Sexta-feira Santa
        (5, 30), // Corpus Christi
    ],
)];

/// Shading class of a grid column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayKind {
    Holiday,
    Weekend,
    Workday,
}

/// Moveable holidays known for `year`; empty for unlisted years
pub fn moveable_holidays(year: i32) -> &'static [(u32, u32)] {
    MOVEABLE_HOLIDAYS
        .iter()
        .find(|(known_year, _)| *known_year == year)
        .map(|(_, holidays)| *holidays)
        .unwrap_or(&[])
}

pub fn is_holiday(date: NaiveDate) -> bool {
    let month_day = (date.month(), date.day());

    FIXED_HOLIDAYS.contains(&month_day) || moveable_holidays(date.year()).contains(&month_day)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Holidays win over weekends
pub fn day_kind(date: NaiveDate) -> DayKind {
    if is_holiday(date) {
        DayKind::Holiday
    } else if is_weekend(date) {
        DayKind::Weekend
    } else {
        DayKind::Workday
    }
}
