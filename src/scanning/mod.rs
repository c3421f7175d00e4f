//! Calendar traversal for one location: months outward while the month
//! predicate holds, days in displayed ascending order, times per the
//! earliest/latest policy. Absent elements are "nothing to act on",
//! never a crash.

mod booking;
mod confirmation;
pub mod selectors;

#[cfg(test)]
mod tests;

use std::time::Duration;

use tracing::debug;

use booking::book_slot;
use crate::automation::Automation;
use crate::config::BookingConfig;
use crate::error::AppError;
use crate::models::{BookingRecord, Candidate, ScanContext};
use crate::store::StateStore;
use crate::validity::{date_is_acceptable, month_is_acceptable, slot_is_acceptable, time_is_acceptable};

/// First render of a location's calendar can be slow.
const ENTRY_WAIT: Duration = Duration::from_secs(20);
/// Times for an already-rendered day load quickly.
const DAY_WAIT: Duration = Duration::from_secs(5);

/// Terminal result of one location pass, returned up to the driver loop
/// (which stops iterating on `Booked`).
#[derive(Debug)]
pub enum ScanOutcome {
    Booked(BookingRecord),
    Exhausted,
}

pub struct Scanner<'a, A: Automation> {
    page: &'a A,
    ctx: &'a ScanContext,
    policy: &'a BookingConfig,
    store: &'a StateStore,
}

impl<'a, A: Automation> Scanner<'a, A> {
    pub fn new(page: &'a A, ctx: &'a ScanContext, policy: &'a BookingConfig, store: &'a StateStore) -> Self {
        Self { page, ctx, policy, store }
    }

    pub async fn scan(&self) -> Result<ScanOutcome, AppError> {
        let Some(first_time) = self.page.wait_present(&selectors::time_slot(0), ENTRY_WAIT).await
        else {
            debug!("no time slots rendered for this location");
            self.back_out().await?;
            return Ok(ScanOutcome::Exhausted);
        };

        let mut year = self.page.text_of(&selectors::calendar_year()).await?;
        let mut month = self.page.text_of(&selectors::calendar_month()).await?;

        if self.policy.first_only {
            let active_date = self.page.text_of(&selectors::active_day()).await?;
            let candidate = Candidate {
                month: &month,
                date: &active_date,
                year: &year,
                time: &first_time,
            };
            if slot_is_acceptable(&candidate, &self.ctx.baseline)? {
                let record = self.book(0).await?;
                return Ok(ScanOutcome::Booked(record));
            }
            debug!(%month, %active_date, time = %first_time, "first slot not acceptable, moving on");
            self.back_out().await?;
            return Ok(ScanOutcome::Exhausted);
        }

        while month_is_acceptable(&month, &year, &self.ctx.baseline)? {
            let days = self.page.texts_of(&selectors::selectable_days()).await.unwrap_or_default();
            for (index, day) in days.iter().enumerate() {
                if !date_is_acceptable(day, &self.ctx.baseline)? {
                    // Days render ascending; the rest of the month is
                    // further out than this one.
                    break;
                }
                self.page.click_nth(&selectors::selectable_days(), index).await?;
                let Some(first) = self.page.wait_present(&selectors::time_slot(0), DAY_WAIT).await
                else {
                    continue;
                };
                let chosen = if self.policy.latest_time {
                    self.latest_acceptable_slot(first).await?
                } else if time_is_acceptable(&first, &self.ctx.baseline)? {
                    Some(0)
                } else {
                    None
                };
                if let Some(slot) = chosen {
                    let record = self.book(slot).await?;
                    return Ok(ScanOutcome::Booked(record));
                }
            }
            self.page.click(&selectors::next_month()).await?;
            month = self.page.text_of(&selectors::calendar_month()).await?;
            year = self.page.text_of(&selectors::calendar_year()).await?;
        }

        self.back_out().await?;
        Ok(ScanOutcome::Exhausted)
    }

    /// Walks `time_0..time_n` and keeps the index of the last slot that
    /// still beats the baseline.
    async fn latest_acceptable_slot(&self, first: String) -> Result<Option<usize>, AppError> {
        let mut last = None;
        let mut index = 0;
        let mut text = first;
        loop {
            if time_is_acceptable(&text, &self.ctx.baseline)? {
                last = Some(index);
            }
            index += 1;
            let target = selectors::time_slot(index);
            if !self.page.exists(&target).await {
                break;
            }
            text = self.page.text_of(&target).await?;
        }
        Ok(last)
    }

    async fn book(&self, slot: usize) -> Result<BookingRecord, AppError> {
        book_slot(self.page, self.ctx, self.store, self.policy, slot).await
    }

    /// Two screens back to location selection.
    async fn back_out(&self) -> Result<(), AppError> {
        for _ in 0..2 {
            self.page.click(&selectors::back_button()).await?;
        }
        Ok(())
    }
}
