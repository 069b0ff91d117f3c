//! Team allocation timeline: a day-by-member scheduling grid with
//! drag/resize editing and optimistic sync to a remote row store.

pub mod backend;
pub mod ui;

pub use backend::config::TimelineConfig;
pub use ui::TimelineApp;
