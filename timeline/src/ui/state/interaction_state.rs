//! # Interaction State Module
//!
//! Pointer and selection state of the grid.
//!
//! ## Responsibilities:
//! - The active drag/resize session, if any
//! - The single selected allocation
//! - The project new allocations are created for

use tracing::info;

use crate::backend::domain::DragState;

#[derive(Debug, Default)]
pub struct InteractionState {
    pub drag: DragState,

    /// At most one allocation is selected at a time
    pub selected_allocation: Option<String>,

    /// Project used when clicking an empty cell
    pub selected_project: Option<String>,
}

impl InteractionState {
    /// Clicking the selected allocation deselects it; anything else replaces the selection
    pub fn toggle_selection(&mut self, allocation_id: &str) {
        if self.selected_allocation.as_deref() == Some(allocation_id) {
            self.selected_allocation = None;
            return;
        }
        self.selected_allocation = Some(allocation_id.to_string());
        info!("📌 Selected allocation: {}", allocation_id);
    }

    pub fn is_selected(&self, allocation_id: &str) -> bool {
        self.selected_allocation.as_deref() == Some(allocation_id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_allocation = None;
    }
}
