//! Cell lookup: which allocation, if any, occupies a (member, day) cell.
//!
//! While a drag is active the dragged allocation is shown at its preview
//! position, and for a move it no longer shows at its original position.

use std::borrow::Cow;

use chrono::NaiveDate;

use super::drag::{DragKind, DragSession};
use super::models::Allocation;

/// First allocation in storage order that covers the cell
pub fn find_allocation<'a>(allocations: &'a [Allocation], team_member_id: &str, day: NaiveDate) -> Option<&'a Allocation> {
    allocations
        .iter()
        .find(|allocation| allocation.covers(team_member_id, day))
}

/// Drag-aware view over the committed allocations
#[derive(Debug, Clone, Copy)]
pub struct AllocationIndex<'a> {
    allocations: &'a [Allocation],
    drag: Option<&'a DragSession>,
}

impl<'a> AllocationIndex<'a> {
    pub fn new(allocations: &'a [Allocation], drag: Option<&'a DragSession>) -> Self {
        Self { allocations, drag }
    }

    /// Allocation shown at the cell. Returns an owned value when the cell is
    /// occupied by a drag preview.
    pub fn find(&self, team_member_id: &str, day: NaiveDate) -> Option<Cow<'a, Allocation>> {
        let Some(session) = self.drag else {
            return find_allocation(self.allocations, team_member_id, day).map(Cow::Borrowed);
        };

        let effective = session.effective_allocation();
        if effective.covers(team_member_id, day) {
            return Some(Cow::Owned(effective));
        }

        if session.kind == DragKind::Move && session.original.covers(team_member_id, day) {
            return None;
        }

        self.allocations
            .iter()
            .filter(|allocation| allocation.id != session.allocation_id)
            .find(|allocation| allocation.covers(team_member_id, day))
            .map(Cow::Borrowed)
    }
}
