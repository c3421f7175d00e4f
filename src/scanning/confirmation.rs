//! Fixed-offset parsing of the confirmation screen. The site renders
//! the four info fields from a known template; the offsets below are a
//! contract with that template and live only here so a template change
//! touches one function.
//!
//! Expected lines:
//!   date:     "Date: {Month} {DD}, {YYYY}"
//!   time:     "Scheduled Time: {h:mm AM/PM} HST"
//!   code:     "Confirmation Code: {code}"
//!   location: free text, normalized by substring match.

use crate::error::AppError;
use crate::models::{Appointment, Location};

const DATE_PREFIX: usize = "Date: ".len();
const DATE_SUFFIX: usize = "DD, YYYY".len(); // day + comma + year after the month
const TIME_PREFIX: usize = "Scheduled Time: ".len();
const TIME_SUFFIX: usize = " HST".len();
const CODE_PREFIX: usize = "Confirmation Code: ".len();

#[derive(Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub appointment: Appointment,
    pub code: String,
    pub location: Location,
}

fn slice(line: &str, start: usize, end_back: usize) -> Result<&str, AppError> {
    let len = line.len();
    if start + end_back > len {
        return Err(AppError::ConfirmationFormat(line.to_string()));
    }
    line.get(start..len - end_back)
        .ok_or_else(|| AppError::ConfirmationFormat(line.to_string()))
}

pub fn parse_confirmation(
    date_line: &str,
    time_line: &str,
    code_line: &str,
    location_line: &str,
) -> Result<Confirmation, AppError> {
    let month = slice(date_line, DATE_PREFIX, DATE_SUFFIX)?.replace(' ', "");
    let date = slice(date_line, date_line.len() - 8, 6)?.to_string();
    let year = slice(date_line, date_line.len() - 4, 0)?.to_string();
    let time = slice(time_line, TIME_PREFIX, TIME_SUFFIX)?.to_string();
    let code = slice(code_line, CODE_PREFIX, 0)?.to_string();
    let location = Location::from_confirmation_text(location_line);

    Ok(Confirmation {
        appointment: Appointment { month, date, year, time },
        code,
        location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_documented_template() {
        let parsed = parse_confirmation(
            "Date: November 15, 2025",
            "Scheduled Time: 1:00 PM HST",
            "Confirmation Code: QH7X2",
            "Kapalama Driver Licensing Center",
        )
        .unwrap();

        assert_eq!(parsed.appointment.month, "November");
        assert_eq!(parsed.appointment.date, "15");
        assert_eq!(parsed.appointment.year, "2025");
        assert_eq!(parsed.appointment.time, "1:00 PM");
        assert_eq!(parsed.code, "QH7X2");
        assert_eq!(parsed.location, Location::Kapalama);
    }

    #[test]
    fn short_month_names_and_double_digit_hours_fit_the_offsets() {
        let parsed = parse_confirmation(
            "Date: May 03, 2026",
            "Scheduled Time: 10:30 AM HST",
            "Confirmation Code: A1",
            "Koolau",
        )
        .unwrap();

        assert_eq!(parsed.appointment.month, "May");
        assert_eq!(parsed.appointment.date, "03");
        assert_eq!(parsed.appointment.year, "2026");
        assert_eq!(parsed.appointment.time, "10:30 AM");
        assert_eq!(parsed.location, Location::Koolau);
    }

    #[test]
    fn truncated_lines_are_rejected_not_paniced_on() {
        assert!(matches!(
            parse_confirmation("Date:", "Scheduled Time: 1:00 PM HST", "Confirmation Code: X", "Koolau"),
            Err(AppError::ConfirmationFormat(_))
        ));
        assert!(matches!(
            parse_confirmation("Date: November 15, 2025", "nope", "Confirmation Code: X", "Koolau"),
            Err(AppError::ConfirmationFormat(_))
        ));
    }
}
