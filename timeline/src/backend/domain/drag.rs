//! Drag and resize interaction on allocation blocks.
//!
//! A session starts on pointer-down over a block body (move) or one of its
//! edge handles (resize). Every pointer-move converts the pixel offset from
//! the anchor into whole grid cells and recomputes a preview patch from the
//! allocation as it was when the drag started. Committed state is never
//! written during the session; pointer-up hands the preview back to the
//! caller for commit.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::models::{Allocation, AllocationPatch};

/// Which part of the block the pointer grabbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragKind {
    /// Block body: shift dates and/or change member
    Move,
    /// Left edge: change the start date
    ResizeStart,
    /// Right edge: change the end date
    ResizeEnd,
}

/// Pointer coordinates in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of one grid cell in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellGeometry {
    pub width: f64,
    pub height: f64,
}

impl CellGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions known and non-zero
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Pointer offset expressed in whole cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellDelta {
    pub days: i64,
    pub rows: i64,
}

/// Halves round up, so -0.5 becomes 0 and 0.5 becomes 1
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Cell offset between `anchor` and `pointer`; `None` until the grid is measured
pub fn cell_delta(anchor: PointerPosition, pointer: PointerPosition, geometry: CellGeometry) -> Option<CellDelta> {
    if !geometry.is_measured() {
        return None;
    }
    Some(CellDelta {
        days: round_half_up((pointer.x - anchor.x) / geometry.width),
        rows: round_half_up((pointer.y - anchor.y) / geometry.height),
    })
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Preview for a drag of `kind` offset by the given cells.
///
/// `member_order` is the member ordering currently displayed; row offsets are
/// clamped to it. Returns `None` for a no-op drag or when a resize would make
/// the start reach or pass the end.
pub fn compute_preview(
    original: &Allocation,
    kind: DragKind,
    delta_days: i64,
    delta_rows: i64,
    member_order: &[String],
) -> Option<AllocationPatch> {
    match kind {
        DragKind::Move => {
            if delta_days == 0 && delta_rows == 0 {
                return None;
            }

            let team_member_id = if delta_rows != 0 {
                member_order
                    .iter()
                    .position(|id| *id == original.team_member_id)
                    .map(|index| {
                        let last = member_order.len() as i64 - 1;
                        let target = (index as i64 + delta_rows).clamp(0, last);
                        member_order[target as usize].clone()
                    })
                    .unwrap_or_else(|| original.team_member_id.clone())
            } else {
                original.team_member_id.clone()
            };

            let start_date = shift(original.start_date, delta_days)?;
            let end_date = start_date.checked_add_signed(original.duration())?;

            Some(AllocationPatch {
                team_member_id: Some(team_member_id),
                start_date: Some(start_date),
                end_date: Some(end_date),
                ..Default::default()
            })
        }
        DragKind::ResizeStart => {
            if delta_days == 0 {
                return None;
            }
            let start_date = shift(original.start_date, delta_days)?;
            if start_date >= original.end_date {
                return None;
            }
            Some(AllocationPatch {
                start_date: Some(start_date),
                ..Default::default()
            })
        }
        DragKind::ResizeEnd => {
            if delta_days == 0 {
                return None;
            }
            let end_date = shift(original.end_date, delta_days)?;
            if end_date <= original.start_date {
                return None;
            }
            Some(AllocationPatch {
                end_date: Some(end_date),
                ..Default::default()
            })
        }
    }
}

/// An active drag on one allocation
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    pub allocation_id: String,
    pub anchor: PointerPosition,
    /// Snapshot of the allocation taken at pointer-down
    pub original: Allocation,
    pub preview: Option<AllocationPatch>,
}

impl DragSession {
    /// Where the allocation currently appears: the original with the preview overlaid
    pub fn effective_allocation(&self) -> Allocation {
        match &self.preview {
            Some(patch) => self.original.with_patch(patch),
            None => self.original.clone(),
        }
    }
}

/// A preview handed back on pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    pub allocation_id: String,
    pub patch: AllocationPatch,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    pub fn is_dragging_allocation(&self, allocation_id: &str) -> bool {
        self.session()
            .map(|session| session.allocation_id == allocation_id)
            .unwrap_or(false)
    }

    /// idle -> dragging. A pointer-down during an active session replaces it.
    pub fn begin(&mut self, kind: DragKind, allocation: &Allocation, anchor: PointerPosition) {
        info!("🖱️ Drag started: {:?} on allocation {}", kind, allocation.id);
        *self = DragState::Dragging(DragSession {
            kind,
            allocation_id: allocation.id.clone(),
            anchor,
            original: allocation.clone(),
            preview: None,
        });
    }

    /// dragging -> dragging. Returns true when the preview changed.
    ///
    /// A zero offset clears the preview. A rejected resize keeps the last
    /// valid preview.
    pub fn update(&mut self, pointer: PointerPosition, geometry: CellGeometry, member_order: &[String]) -> bool {
        let DragState::Dragging(session) = self else {
            return false;
        };
        let Some(delta) = cell_delta(session.anchor, pointer, geometry) else {
            return false;
        };

        let rows = if session.kind == DragKind::Move { delta.rows } else { 0 };
        let preview = compute_preview(&session.original, session.kind, delta.days, rows, member_order);

        let next = match preview {
            Some(patch) => Some(patch),
            None if session.kind == DragKind::Move || delta.days == 0 => None,
            None => {
                debug!("Resize to {:+} days rejected, keeping last preview", delta.days);
                return false;
            }
        };

        if next == session.preview {
            return false;
        }
        session.preview = next;
        true
    }

    /// dragging -> idle, discarding the preview. False when nothing was active.
    pub fn cancel(&mut self) -> bool {
        let DragState::Dragging(session) = std::mem::take(self) else {
            return false;
        };
        info!("🖱️ Drag cancelled on allocation {}", session.allocation_id);
        true
    }

    /// dragging -> idle. Returns the preview to commit, if any.
    pub fn finish(&mut self) -> Option<PendingCommit> {
        let DragState::Dragging(session) = std::mem::take(self) else {
            return None;
        };

        match session.preview {
            Some(patch) if !patch.is_empty() => {
                info!("🖱️ Drag finished on allocation {}", session.allocation_id);
                Some(PendingCommit {
                    allocation_id: session.allocation_id,
                    patch,
                })
            }
            _ => {
                debug!("Drag on allocation {} ended without changes", session.allocation_id);
                None
            }
        }
    }
}
