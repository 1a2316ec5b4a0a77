//! Single-letter weekday codes.
//!
//! | Code | Day |
//! |------|-----|
//! | U | Sunday |
//! | M | Monday |
//! | T | Tuesday |
//! | W | Wednesday |
//! | R | Thursday |
//! | F | Friday |
//! | S | Saturday |

use chrono::Weekday;

/// All weekdays, Sunday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Parses a weekday code (case-insensitive, surrounding whitespace ignored).
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code.trim().to_ascii_uppercase().as_str() {
        "U" => Some(Weekday::Sun),
        "M" => Some(Weekday::Mon),
        "T" => Some(Weekday::Tue),
        "W" => Some(Weekday::Wed),
        "R" => Some(Weekday::Thu),
        "F" => Some(Weekday::Fri),
        "S" => Some(Weekday::Sat),
        _ => None,
    }
}

/// The code for a weekday.
pub fn weekday_code(day: Weekday) -> char {
    match day {
        Weekday::Sun => 'U',
        Weekday::Mon => 'M',
        Weekday::Tue => 'T',
        Weekday::Wed => 'W',
        Weekday::Thu => 'R',
        Weekday::Fri => 'F',
        Weekday::Sat => 'S',
    }
}
