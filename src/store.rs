//! Durable appointment state. One field per line, nine lines total:
//! first name, last name, phone, month, date, year, time, confirmation
//! code, location name. A missing or short file falls back to the
//! compiled-in defaults; read failures are warned about, never fatal.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::error::AppError;
use crate::models::{Appointment, BookingRecord, Identity, ScanContext};

const DEFAULT_FIRST_NAME: &str = "Tommy";
const DEFAULT_LAST_NAME: &str = "Tutone";
const DEFAULT_PHONE: &str = "8088675309";
const DEFAULT_MONTH: &str = "December";
const DEFAULT_DATE: &str = "31";
const DEFAULT_YEAR: &str = "2025";
const DEFAULT_TIME: &str = "2:30 PM";

pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn default_identity() -> Identity {
        Identity {
            first_name: DEFAULT_FIRST_NAME.into(),
            last_name: DEFAULT_LAST_NAME.into(),
            phone: DEFAULT_PHONE.into(),
        }
    }

    fn default_baseline() -> Appointment {
        Appointment {
            month: DEFAULT_MONTH.into(),
            date: DEFAULT_DATE.into(),
            year: DEFAULT_YEAR.into(),
            time: DEFAULT_TIME.into(),
        }
    }

    /// Loads identity and baseline appointment. Lines 1-3 are identity,
    /// 4-7 the appointment; fewer than 3 lines (or no file) means full
    /// defaults, 3-6 lines means identity only.
    pub fn load(&self) -> ScanContext {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "state file unreadable, using defaults");
                return ScanContext {
                    identity: Self::default_identity(),
                    baseline: Self::default_baseline(),
                };
            }
        };
        let lines: Vec<&str> = contents.lines().map(str::trim_end).collect();

        let identity = if lines.len() >= 3 {
            Identity {
                first_name: lines[0].to_string(),
                last_name: lines[1].to_string(),
                phone: lines[2].to_string(),
            }
        } else {
            warn!(path = %self.path.display(), "state file too short, using defaults");
            Self::default_identity()
        };

        let baseline = if lines.len() >= 7 {
            Appointment {
                month: lines[3].to_string(),
                date: lines[4].to_string(),
                year: lines[5].to_string(),
                time: lines[6].to_string(),
            }
        } else {
            Self::default_baseline()
        };

        ScanContext { identity, baseline }
    }

    /// Whole-file rewrite after a successful booking.
    pub fn save(&self, record: &BookingRecord) -> Result<(), AppError> {
        let fields = [
            record.identity.first_name.as_str(),
            record.identity.last_name.as_str(),
            record.identity.phone.as_str(),
            record.appointment.month.as_str(),
            record.appointment.date.as_str(),
            record.appointment.year.as_str(),
            record.appointment.time.as_str(),
            record.confirmation_code.as_str(),
            record.location_name.as_str(),
        ];
        let mut contents = String::new();
        for field in fields {
            contents.push_str(field);
            contents.push('\n');
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
