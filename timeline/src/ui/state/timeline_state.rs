//! # Timeline State Module
//!
//! The visible window of days and the measured grid cell size.
//!
//! ## Responsibilities:
//! - Day window and its scroll-driven expansion
//! - Cell geometry used to turn pointer offsets into cells
//!
//! ## Purpose:
//! Cell geometry starts from the configured size and is replaced by the
//! measured size of a rendered cell. It is marked stale whenever the number
//! of visible days changes so the renderer measures again.

use chrono::NaiveDate;

use crate::backend::config::TimelineConfig;
use crate::backend::domain::{CellGeometry, DateWindow};

#[derive(Debug, Clone)]
pub struct TimelineState {
    pub window: DateWindow,
    pub geometry: CellGeometry,
    /// Set when the day count changed since the last measurement
    pub geometry_stale: bool,
}

impl TimelineState {
    pub fn new(config: &TimelineConfig, start: NaiveDate) -> Self {
        Self {
            window: DateWindow::from_config(config, start),
            geometry: CellGeometry::new(config.cell_width, config.cell_height),
            geometry_stale: true,
        }
    }

    pub fn measure(&mut self, width: f64, height: f64) {
        self.geometry = CellGeometry::new(width, height);
        self.geometry_stale = false;
    }
}
