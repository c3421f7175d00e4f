//! Pure predicates deciding whether a candidate slot beats the baseline
//! appointment. No side effects; all site text is parsed strictly and a
//! parse failure is an error, never a silent default.

use chrono::{Month, NaiveTime, Timelike};

use crate::error::AppError;
use crate::models::{Appointment, Candidate};

/// Slots at or after 2:45 PM are never bookable (office closing cutoff).
pub const CLOSING_CUTOFF: u32 = 1445;

/// Maps a calendar month name to its 1..=12 ordinal.
pub fn month_index(name: &str) -> Result<u32, AppError> {
    name.trim()
        .parse::<Month>()
        .map(|m| m.number_from_month())
        .map_err(|_| AppError::UnknownMonth(name.to_string()))
}

fn parse_number(text: &str) -> Result<i32, AppError> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| AppError::MalformedNumber(text.to_string()))
}

/// True iff the candidate month is at or before the baseline month, or
/// falls in an earlier year. Lets the scan stop advancing once it
/// overtakes the baseline month within the baseline year.
pub fn month_is_acceptable(month: &str, year: &str, baseline: &Appointment) -> Result<bool, AppError> {
    Ok(month_index(month)? <= month_index(&baseline.month)?
        || parse_number(year)? < parse_number(&baseline.year)?)
}

/// True iff the candidate day-of-month is strictly before the baseline's.
/// Date is the primary ordering key; same-date times across days are
/// never compared.
pub fn date_is_acceptable(date: &str, baseline: &Appointment) -> Result<bool, AppError> {
    Ok(parse_number(date)? < parse_number(&baseline.date)?)
}

/// Encodes "h:mm AM/PM" as an HMM integer (2:30 PM -> 1430).
pub fn time_value(time: &str) -> Result<u32, AppError> {
    let parsed = NaiveTime::parse_from_str(time.trim(), "%I:%M %p")
        .map_err(|_| AppError::MalformedTime(time.to_string()))?;
    Ok(parsed.hour() * 100 + parsed.minute())
}

/// True iff the candidate time is before the closing cutoff and strictly
/// earlier than the baseline time.
pub fn time_is_acceptable(time: &str, baseline: &Appointment) -> Result<bool, AppError> {
    let value = time_value(time)?;
    Ok(value < CLOSING_CUTOFF && value < time_value(&baseline.time)?)
}

/// The single decision point the traversal controller consults: all
/// three predicates must hold.
pub fn slot_is_acceptable(candidate: &Candidate<'_>, baseline: &Appointment) -> Result<bool, AppError> {
    Ok(month_is_acceptable(candidate.month, candidate.year, baseline)?
        && date_is_acceptable(candidate.date, baseline)?
        && time_is_acceptable(candidate.time, baseline)?)
}
