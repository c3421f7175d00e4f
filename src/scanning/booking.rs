//! The booking transaction: one-shot and terminal. A failure in here is
//! fatal to the run since the site may be left mid-transaction.

use std::time::Duration;

use tracing::{info, warn};

use super::confirmation::parse_confirmation;
use super::selectors;
use crate::automation::Automation;
use crate::config::BookingConfig;
use crate::error::AppError;
use crate::models::{BookingRecord, ScanContext};
use crate::store::StateStore;

const DUPLICATE_WAIT: Duration = Duration::from_secs(10);
const SUCCESS_WAIT: Duration = Duration::from_secs(15);

/// Books the `slot`-th time of the currently selected day and persists
/// the resulting record.
pub async fn book_slot<A: Automation>(
    page: &A,
    ctx: &ScanContext,
    store: &StateStore,
    options: &BookingConfig,
    slot: usize,
) -> Result<BookingRecord, AppError> {
    page.click(&selectors::time_slot(slot)).await?;

    page.type_text(&selectors::first_name_field(), &ctx.identity.first_name).await?;
    page.type_text(&selectors::last_name_field(), &ctx.identity.last_name).await?;
    page.type_text(&selectors::phone_field(), &ctx.identity.phone).await?;
    page.click(&selectors::submit_button()).await?;

    // An existing appointment blocks the new one; cancel it and accept
    // the native prompt. Not an error, just part of the transaction.
    if page.wait_clickable(&selectors::duplicate_cancel(), DUPLICATE_WAIT).await {
        info!("duplicate appointment detected, cancelling the old one");
        page.click(&selectors::duplicate_cancel()).await?;
        page.accept_alert().await;
    }

    if page.wait_present(&selectors::success_screen(), SUCCESS_WAIT).await.is_none() {
        return Err(AppError::BrowserError(
            "booking submitted but the success screen never appeared".into(),
        ));
    }
    page.wait_clickable(&selectors::print_button(), SUCCESS_WAIT).await;

    let date_line = page.text_of(&selectors::info_date()).await?;
    let time_line = page.text_of(&selectors::info_time()).await?;
    let code_line = page.text_of(&selectors::info_confirmation()).await?;
    let location_line = page.text_of(&selectors::info_location()).await?;

    let confirmation = parse_confirmation(&date_line, &time_line, &code_line, &location_line)?;
    let record = BookingRecord {
        identity: ctx.identity.clone(),
        appointment: confirmation.appointment,
        confirmation_code: confirmation.code,
        location_name: confirmation.location.display_name().to_string(),
    };

    store.save(&record)?;
    info!(
        month = %record.appointment.month,
        date = %record.appointment.date,
        year = %record.appointment.year,
        time = %record.appointment.time,
        code = %record.confirmation_code,
        location = %record.location_name,
        "appointment booked"
    );

    if options.save_confirmation {
        if let Err(err) = page.screenshot(&options.confirmation_path).await {
            // The booking itself succeeded; losing the screenshot is not
            // worth failing the run over.
            warn!(%err, "could not capture the confirmation screen");
        }
    }

    Ok(record)
}
