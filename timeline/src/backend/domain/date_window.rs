//! Forward-only window of visible days.
//!
//! The window always starts at its anchor date and grows in fixed
//! increments when the user scrolls close to its right edge. Only one
//! expansion may be pending at a time; [`DateWindow::begin_load_more`] sets
//! the latch and [`DateWindow::complete_load_more`] applies the increment and
//! releases it.

use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, info};

use crate::backend::config::TimelineConfig;

/// Horizontal scroll position of the grid viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_left: f64, scroll_width: f64, client_width: f64) -> Self {
        Self {
            scroll_left,
            scroll_width,
            client_width,
        }
    }

    /// `scroll_left / (scroll_width - client_width)`, `None` when nothing scrolls
    pub fn fraction(&self) -> Option<f64> {
        let scrollable = self.scroll_width - self.client_width;
        if scrollable <= 0.0 {
            return None;
        }
        Some(self.scroll_left / scrollable)
    }
}

#[derive(Debug, Clone)]
pub struct DateWindow {
    start: NaiveDate,
    initial_days: u32,
    days_increment: u32,
    scroll_threshold: f64,
    days_to_show: u32,
    expansion_pending: bool,
}

impl DateWindow {
    pub fn new(start: NaiveDate, initial_days: u32, days_increment: u32, scroll_threshold: f64) -> Self {
        Self {
            start,
            initial_days,
            days_increment,
            scroll_threshold,
            days_to_show: initial_days,
            expansion_pending: false,
        }
    }

    pub fn from_config(config: &TimelineConfig, start: NaiveDate) -> Self {
        Self::new(
            start,
            config.initial_days,
            config.days_increment,
            config.scroll_threshold,
        )
    }

    /// Window anchored at the local current date
    pub fn starting_today(config: &TimelineConfig) -> Self {
        Self::from_config(config, Local::now().date_naive())
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Last visible day, inclusive
    pub fn end_date(&self) -> NaiveDate {
        self.start + Duration::days(i64::from(self.days_to_show) - 1)
    }

    pub fn days_to_show(&self) -> u32 {
        self.days_to_show
    }

    pub fn is_expansion_pending(&self) -> bool {
        self.expansion_pending
    }

    /// Visible days in order, starting at the anchor
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take(self.days_to_show as usize).collect()
    }

    pub fn should_load_more(&self, metrics: &ScrollMetrics) -> bool {
        metrics
            .fraction()
            .map(|fraction| fraction > self.scroll_threshold)
            .unwrap_or(false)
    }

    /// Start an expansion if the scroll position crossed the threshold.
    /// Returns true only for the call that set the latch.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> bool {
        if !self.should_load_more(metrics) {
            return false;
        }
        self.begin_load_more()
    }

    /// Set the expansion latch; false if an expansion is already pending
    pub fn begin_load_more(&mut self) -> bool {
        if self.expansion_pending {
            debug!("Expansion already pending, ignoring request");
            return false;
        }
        self.expansion_pending = true;
        true
    }

    /// Apply the pending expansion and release the latch
    pub fn complete_load_more(&mut self) -> u32 {
        if !self.expansion_pending {
            return self.days_to_show;
        }
        self.days_to_show += self.days_increment;
        self.expansion_pending = false;
        info!("📅 Timeline expanded to {} days, through {}", self.days_to_show, self.end_date());
        self.days_to_show
    }

    /// Back to the initial day count, as on remount
    pub fn reset(&mut self) {
        self.days_to_show = self.initial_days;
        self.expansion_pending = false;
    }
}
