/// Operator identity filled into the booking form. Opaque strings; the
/// site does its own validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// An appointment as the site renders it: calendar month name,
/// day-of-month, 4-digit year, "h:mm AM/PM" time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub month: String,
    pub date: String,
    pub year: String,
    pub time: String,
}

/// A slot read off the live calendar, evaluated and thrown away.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub month: &'a str,
    pub date: &'a str,
    pub year: &'a str,
    pub time: &'a str,
}

/// The two offices the site offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Kapalama,
    Koolau,
}

impl Location {
    /// Fixed visiting order; the driver loop repeats it until a booking
    /// succeeds.
    pub const ROUND_ROBIN: [Location; 2] = [Location::Kapalama, Location::Koolau];

    /// Element id of the location button on the selection screen.
    pub fn element_id(self) -> &'static str {
        match self {
            Location::Kapalama => "location_1",
            Location::Koolau => "location_3",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Location::Kapalama => "Kapalama",
            Location::Koolau => "Koolau",
        }
    }

    /// Normalizes the free-form location text on the confirmation screen.
    pub fn from_confirmation_text(text: &str) -> Location {
        if text.contains("Kap") {
            Location::Kapalama
        } else {
            Location::Koolau
        }
    }
}

/// Everything the scan needs to judge a candidate. Immutable; a
/// successful booking produces a new record rather than mutating this.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub identity: Identity,
    pub baseline: Appointment,
}

/// The nine persisted fields written after a successful booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    pub identity: Identity,
    pub appointment: Appointment,
    pub confirmation_code: String,
    pub location_name: String,
}
