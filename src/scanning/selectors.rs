//! Element contract of the AlohaQ booking site, collected in one place.

use crate::automation::Target;

pub const BOOKING_URL: &str = "https://alohaq.honolulu.gov";

/// Driver-licensing category tile on the landing page.
pub fn category_button() -> Target {
    Target::xpath("//div[@class='button-look location-category-button'][@data-category_id='1']")
}

pub fn new_appointment() -> Target {
    Target::id("newAppointment")
}

pub fn transaction_kind() -> Target {
    Target::id("transaction_7")
}

pub fn required_documents_ack() -> Target {
    Target::id("requiredDoc")
}

/// One click per screen to walk back toward location selection.
pub fn back_button() -> Target {
    Target::class("back")
}

pub fn calendar_year() -> Target {
    Target::class("ui-datepicker-year")
}

pub fn calendar_month() -> Target {
    Target::class("ui-datepicker-month")
}

/// The pre-selected day when a location's calendar first renders.
pub fn active_day() -> Target {
    Target::class("ui-state-active")
}

/// Every selectable day of the displayed month, ascending.
pub fn selectable_days() -> Target {
    Target::xpath("//a[@class='ui-state-default']")
}

pub fn next_month() -> Target {
    Target::class("ui-datepicker-next")
}

/// Time slots for the selected day are `time_0`, `time_1`, ...
pub fn time_slot(index: usize) -> Target {
    Target::id(format!("time_{index}"))
}

pub fn first_name_field() -> Target {
    Target::id("fname")
}

pub fn last_name_field() -> Target {
    Target::id("lname")
}

pub fn phone_field() -> Target {
    Target::id("number")
}

pub fn submit_button() -> Target {
    Target::class("submit")
}

/// Shown when an existing appointment blocks the new booking.
pub fn duplicate_cancel() -> Target {
    Target::id("appointment_duplicates_cancel")
}

pub fn success_screen() -> Target {
    Target::id("appointmentSuccess")
}

pub fn print_button() -> Target {
    Target::class("print")
}

pub fn info_date() -> Target {
    Target::id("info_date")
}

pub fn info_time() -> Target {
    Target::id("info_time")
}

pub fn info_confirmation() -> Target {
    Target::id("info_confirmation")
}

pub fn info_location() -> Target {
    Target::id("info_loc")
}
