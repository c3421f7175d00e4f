//! Traversal and booking tests against a scripted in-memory site.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{selectors, ScanOutcome, Scanner};
use crate::app::App;
use crate::automation::{Automation, Target};
use crate::config::{AppConfig, BookingConfig, StorageConfig};
use crate::error::AppError;
use crate::models::{Appointment, Identity, ScanContext};
use crate::shutdown::ShutdownManager;
use crate::store::StateStore;

struct MonthPage {
    month: &'static str,
    year: &'static str,
    active_day: &'static str,
    days: Vec<&'static str>,
    slots: Vec<&'static str>,
}

#[derive(Default)]
struct SiteState {
    pages: Vec<MonthPage>,
    current: usize,
    clicks: Vec<Target>,
    day_clicks: Vec<usize>,
    typed: Vec<(Target, String)>,
    booked_slot: Option<usize>,
    alert_accepted: bool,
    duplicate_pending: bool,
}

/// Scripted stand-in for the live site. Clicking the next-month arrow
/// advances through `pages`; clicking a `time_{n}` slot records the
/// booking.
struct FakeSite {
    state: Mutex<SiteState>,
    confirmation: [&'static str; 4],
}

impl FakeSite {
    fn new(pages: Vec<MonthPage>) -> Self {
        Self {
            state: Mutex::new(SiteState { pages, ..SiteState::default() }),
            confirmation: [
                "Date: November 15, 2025",
                "Scheduled Time: 1:00 PM HST",
                "Confirmation Code: QH7X2",
                "Koolau Civic Center",
            ],
        }
    }

    fn with_duplicate_conflict(pages: Vec<MonthPage>) -> Self {
        let site = Self::new(pages);
        site.state.lock().unwrap().duplicate_pending = true;
        site
    }

    fn slot_index(target: &Target) -> Option<usize> {
        match target {
            Target::Id(id) => id.strip_prefix("time_")?.parse().ok(),
            _ => None,
        }
    }

    fn clicks(&self) -> Vec<Target> {
        self.state.lock().unwrap().clicks.clone()
    }

    fn day_clicks(&self) -> Vec<usize> {
        self.state.lock().unwrap().day_clicks.clone()
    }

    fn booked_slot(&self) -> Option<usize> {
        self.state.lock().unwrap().booked_slot
    }
}

#[async_trait]
impl Automation for FakeSite {
    async fn goto(&self, _url: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn click(&self, target: &Target) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.clicks.push(target.clone());
        if *target == selectors::next_month() && state.current + 1 < state.pages.len() {
            state.current += 1;
        }
        if let Some(slot) = Self::slot_index(target) {
            state.booked_slot = Some(slot);
        }
        Ok(())
    }

    async fn click_nth(&self, target: &Target, index: usize) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.clicks.push(target.clone());
        state.day_clicks.push(index);
        Ok(())
    }

    async fn type_text(&self, target: &Target, text: &str) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.typed.push((target.clone(), text.to_string()));
        Ok(())
    }

    async fn text_of(&self, target: &Target) -> Result<String, AppError> {
        if *target == selectors::info_date() {
            return Ok(self.confirmation[0].to_string());
        }
        if *target == selectors::info_time() {
            return Ok(self.confirmation[1].to_string());
        }
        if *target == selectors::info_confirmation() {
            return Ok(self.confirmation[2].to_string());
        }
        if *target == selectors::info_location() {
            return Ok(self.confirmation[3].to_string());
        }

        let state = self.state.lock().unwrap();
        let page = &state.pages[state.current];
        if *target == selectors::calendar_month() {
            return Ok(page.month.to_string());
        }
        if *target == selectors::calendar_year() {
            return Ok(page.year.to_string());
        }
        if *target == selectors::active_day() {
            return Ok(page.active_day.to_string());
        }
        if let Some(slot) = Self::slot_index(target) {
            return page
                .slots
                .get(slot)
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::BrowserError(format!("no slot {slot}")));
        }
        Err(AppError::BrowserError(format!("unexpected read of {target:?}")))
    }

    async fn texts_of(&self, target: &Target) -> Result<Vec<String>, AppError> {
        if *target == selectors::selectable_days() {
            let state = self.state.lock().unwrap();
            let page = &state.pages[state.current];
            return Ok(page.days.iter().map(|d| d.to_string()).collect());
        }
        Err(AppError::BrowserError(format!("unexpected read of {target:?}")))
    }

    async fn exists(&self, target: &Target) -> bool {
        if let Some(slot) = Self::slot_index(target) {
            let state = self.state.lock().unwrap();
            return slot < state.pages[state.current].slots.len();
        }
        false
    }

    async fn wait_present(&self, target: &Target, _timeout: Duration) -> Option<String> {
        // Real waits suspend; the fake must too, or an indefinitely
        // exhausted round-robin starves concurrent select! branches.
        tokio::task::yield_now().await;
        if *target == selectors::success_screen() {
            return Some(String::new());
        }
        if let Target::Id(id) = target {
            if id.starts_with("location_") {
                return Some(String::new());
            }
        }
        self.text_of(target).await.ok()
    }

    async fn wait_clickable(&self, target: &Target, _timeout: Duration) -> bool {
        if *target == selectors::duplicate_cancel() {
            return self.state.lock().unwrap().duplicate_pending;
        }
        true
    }

    async fn accept_alert(&self) {
        self.state.lock().unwrap().alert_accepted = true;
    }

    async fn screenshot(&self, _path: &Path) -> Result<(), AppError> {
        Ok(())
    }
}

fn ctx() -> ScanContext {
    ScanContext {
        identity: Identity {
            first_name: "Jenny".into(),
            last_name: "Call".into(),
            phone: "8085551234".into(),
        },
        baseline: Appointment {
            month: "December".into(),
            date: "31".into(),
            year: "2025".into(),
            time: "2:30 PM".into(),
        },
    }
}

fn policy(first_only: bool, latest_time: bool) -> BookingConfig {
    BookingConfig {
        first_only,
        latest_time,
        save_confirmation: false,
        confirmation_path: PathBuf::from("confirmation.png"),
    }
}

fn store_in(dir: &tempfile::TempDir) -> StateStore {
    StateStore::new(dir.path().join("data.txt"))
}

fn november_page(slots: Vec<&'static str>) -> MonthPage {
    MonthPage {
        month: "November",
        year: "2025",
        active_day: "15",
        days: vec!["15"],
        slots,
    }
}

#[tokio::test]
async fn single_check_abandons_location_without_scanning() {
    let site = FakeSite::new(vec![november_page(vec!["2:50 PM"])]);
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let ctx = ctx();
    let policy = policy(true, false);

    let scanner = Scanner::new(&site, &ctx, &policy, &store);
    let outcome = scanner.scan().await.unwrap();

    assert!(matches!(outcome, ScanOutcome::Exhausted));
    assert!(site.day_clicks().is_empty());
    assert!(!site.clicks().contains(&selectors::next_month()));
    // Exactly the two back navigations to location selection.
    let backs = site.clicks().iter().filter(|c| **c == selectors::back_button()).count();
    assert_eq!(backs, 2);
}

#[tokio::test]
async fn single_check_books_an_acceptable_first_slot() {
    let site = FakeSite::new(vec![november_page(vec!["1:00 PM"])]);
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let ctx = ctx();
    let policy = policy(true, false);

    let scanner = Scanner::new(&site, &ctx, &policy, &store);
    let outcome = scanner.scan().await.unwrap();

    let ScanOutcome::Booked(record) = outcome else {
        panic!("expected a booking");
    };
    assert_eq!(site.booked_slot(), Some(0));
    assert_eq!(record.appointment.month, "November");
    assert_eq!(record.appointment.date, "15");
    assert_eq!(record.confirmation_code, "QH7X2");
    assert_eq!(record.location_name, "Koolau");
    // The booking wrote through to the state file.
    let reloaded = store.load();
    assert_eq!(reloaded.baseline, record.appointment);
}

#[tokio::test]
async fn latest_policy_books_the_last_acceptable_slot() {
    // Slots 1 and 3 beat the baseline; slot 2 is past the cutoff.
    let site = FakeSite::new(vec![november_page(vec!["1:00 PM", "2:50 PM", "2:00 PM"])]);
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let ctx = ctx();
    let policy = policy(false, true);

    let scanner = Scanner::new(&site, &ctx, &policy, &store);
    let outcome = scanner.scan().await.unwrap();

    assert!(matches!(outcome, ScanOutcome::Booked(_)));
    assert_eq!(site.booked_slot(), Some(2));
}

#[tokio::test]
async fn earliest_policy_books_the_first_acceptable_slot() {
    let site = FakeSite::new(vec![november_page(vec!["1:00 PM", "2:00 PM"])]);
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let ctx = ctx();
    let policy = policy(false, false);

    let scanner = Scanner::new(&site, &ctx, &policy, &store);
    let outcome = scanner.scan().await.unwrap();

    assert!(matches!(outcome, ScanOutcome::Booked(_)));
    assert_eq!(site.booked_slot(), Some(0));
}

#[tokio::test]
async fn day_scan_stops_at_the_first_unacceptable_date() {
    let mut ctx = ctx();
    ctx.baseline = Appointment {
        month: "June".into(),
        date: "20".into(),
        year: "2025".into(),
        time: "2:30 PM".into(),
    };
    // Day 10 has only a past-cutoff slot; day 25 is beyond the baseline
    // date, so the rest of the month is skipped.
    let site = FakeSite::new(vec![
        MonthPage {
            month: "May",
            year: "2025",
            active_day: "10",
            days: vec!["10", "25"],
            slots: vec!["2:50 PM"],
        },
        MonthPage {
            month: "July",
            year: "2025",
            active_day: "1",
            days: vec!["1"],
            slots: vec!["9:00 AM"],
        },
    ]);
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let policy = policy(false, false);

    let scanner = Scanner::new(&site, &ctx, &policy, &store);
    let outcome = scanner.scan().await.unwrap();

    assert!(matches!(outcome, ScanOutcome::Exhausted));
    assert_eq!(site.day_clicks(), vec![0]);
    let advances = site.clicks().iter().filter(|c| **c == selectors::next_month()).count();
    assert_eq!(advances, 1);
}

#[tokio::test]
async fn month_with_no_selectable_days_is_advanced_past() {
    let mut ctx = ctx();
    ctx.baseline = Appointment {
        month: "June".into(),
        date: "20".into(),
        year: "2025".into(),
        time: "2:30 PM".into(),
    };
    let site = FakeSite::new(vec![
        MonthPage {
            month: "May",
            year: "2025",
            active_day: "10",
            days: vec![],
            slots: vec!["9:00 AM"],
        },
        MonthPage {
            month: "July",
            year: "2025",
            active_day: "1",
            days: vec!["1"],
            slots: vec!["9:00 AM"],
        },
    ]);
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let policy = policy(false, false);

    let scanner = Scanner::new(&site, &ctx, &policy, &store);
    let outcome = scanner.scan().await.unwrap();

    assert!(matches!(outcome, ScanOutcome::Exhausted));
    assert!(site.day_clicks().is_empty());
    assert!(site.clicks().contains(&selectors::next_month()));
}

#[tokio::test]
async fn unreadable_month_text_aborts_the_pass() {
    let site = FakeSite::new(vec![MonthPage {
        month: "Smarch",
        year: "2025",
        active_day: "15",
        days: vec!["15"],
        slots: vec!["1:00 PM"],
    }]);
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let ctx = ctx();
    let policy = policy(false, false);

    let scanner = Scanner::new(&site, &ctx, &policy, &store);
    let err = scanner.scan().await.unwrap_err();

    assert!(err.aborts_location_pass());
    assert_eq!(site.booked_slot(), None);
}

#[tokio::test]
async fn shutdown_signal_stops_the_round_robin() {
    let mut ctx = ctx();
    ctx.baseline = Appointment {
        month: "June".into(),
        date: "20".into(),
        year: "2025".into(),
        time: "2:30 PM".into(),
    };
    // Nothing here ever beats the baseline, so the round-robin would
    // spin forever without the interrupt.
    let site = FakeSite::new(vec![MonthPage {
        month: "July",
        year: "2025",
        active_day: "1",
        days: vec!["1"],
        slots: vec!["9:00 AM"],
    }]);
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        storage: StorageConfig { data_file: dir.path().join("data.txt") },
        ..AppConfig::default()
    };
    let app = App::new(config);

    let shutdown = ShutdownManager::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.shutdown();
    });

    let outcome = app.drive_until_shutdown(&site, &ctx, &shutdown).await.unwrap();

    assert!(outcome.is_none());
    assert_eq!(site.booked_slot(), None);
}

#[tokio::test]
async fn duplicate_conflict_is_resolved_during_booking() {
    let site = FakeSite::with_duplicate_conflict(vec![november_page(vec!["1:00 PM"])]);
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let ctx = ctx();
    let policy = policy(true, false);

    let scanner = Scanner::new(&site, &ctx, &policy, &store);
    let outcome = scanner.scan().await.unwrap();

    assert!(matches!(outcome, ScanOutcome::Booked(_)));
    assert!(site.clicks().contains(&selectors::duplicate_cancel()));
    assert!(site.state.lock().unwrap().alert_accepted);
    // Identity went into the form.
    let typed = site.state.lock().unwrap().typed.clone();
    assert!(typed.contains(&(selectors::first_name_field(), "Jenny".to_string())));
    assert!(typed.contains(&(selectors::phone_field(), "8085551234".to_string())));
}
