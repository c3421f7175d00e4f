use std::time::Duration;

use tracing::{debug, error, info};

use crate::automation::{Automation, Target, WebDriverSession};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{BookingRecord, Location, ScanContext};
use crate::scanning::{selectors, ScanOutcome, Scanner};
use crate::shutdown::ShutdownManager;
use crate::store::StateStore;

const LOCATION_WAIT: Duration = Duration::from_secs(10);

pub struct App {
    config: AppConfig,
    store: StateStore,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let store = StateStore::new(config.storage.data_file.clone());
        Self { config, store }
    }

    /// Runs until a booking succeeds (`Some(record)`), the shutdown
    /// signal fires (`None`), or the browser session fails fatally. The
    /// session is closed on every exit path.
    pub async fn run(&self, shutdown: &ShutdownManager) -> Result<Option<BookingRecord>, AppError> {
        let ctx = self.store.load();
        info!(
            baseline_month = %ctx.baseline.month,
            baseline_date = %ctx.baseline.date,
            baseline_year = %ctx.baseline.year,
            baseline_time = %ctx.baseline.time,
            "scanning for anything earlier than the held appointment"
        );

        let session =
            WebDriverSession::connect(&self.config.webdriver.url, self.config.webdriver.browser).await?;
        let result = self.drive_until_shutdown(&session, &ctx, shutdown).await;
        if let Err(err) = session.close().await {
            debug!(%err, "session close failed");
        }
        result
    }

    /// Races the round-robin against the shutdown signal.
    pub(crate) async fn drive_until_shutdown<A: Automation>(
        &self,
        page: &A,
        ctx: &ScanContext,
        shutdown: &ShutdownManager,
    ) -> Result<Option<BookingRecord>, AppError> {
        tokio::select! {
            result = self.drive(page, ctx) => result.map(Some),
            _ = shutdown.wait_for_shutdown() => {
                info!("scan interrupted before a booking was made");
                Ok(None)
            }
        }
    }

    /// Indefinite two-location round-robin; stops only on a booking.
    async fn drive<A: Automation>(&self, page: &A, ctx: &ScanContext) -> Result<BookingRecord, AppError> {
        page.goto(selectors::BOOKING_URL).await?;
        page.click(&selectors::category_button()).await?;
        page.click(&selectors::new_appointment()).await?;

        loop {
            for location in Location::ROUND_ROBIN {
                debug!(location = location.display_name(), "checking location");
                self.select_location(page, location).await?;

                let scanner = Scanner::new(page, ctx, &self.config.booking, &self.store);
                match scanner.scan().await {
                    Ok(ScanOutcome::Booked(record)) => return Ok(record),
                    Ok(ScanOutcome::Exhausted) => {
                        debug!(location = location.display_name(), "nothing earlier here");
                    }
                    Err(err) if err.aborts_location_pass() => {
                        // Unreadable site text; guessing could book the
                        // wrong slot. Drop this pass and try the next
                        // location.
                        error!(location = location.display_name(), %err, "aborting location pass");
                        for _ in 0..2 {
                            let _ = page.click(&selectors::back_button()).await;
                        }
                    }
                    Err(err) => return Err(err),
                }
            }
        }
    }

    /// Location tile, then transaction kind, then the required-documents
    /// acknowledgement, landing on the calendar.
    async fn select_location<A: Automation>(&self, page: &A, location: Location) -> Result<(), AppError> {
        let target = Target::id(location.element_id());
        if page.wait_present(&target, LOCATION_WAIT).await.is_none() {
            return Err(AppError::BrowserError(format!(
                "location button {} never appeared",
                location.element_id()
            )));
        }
        page.click(&target).await?;
        page.click(&selectors::transaction_kind()).await?;
        page.click(&selectors::required_documents_ack()).await?;
        Ok(())
    }
}
