//! Interaction layer: turns pointer, key, scroll and click events into
//! domain operations and exposes the grid view-model for rendering.

pub mod app;
pub mod grid;
pub mod interactions;
pub mod state;

pub use app::TimelineApp;
pub use grid::{BlockView, GridCell, GridRow, TimelineHeader};
