//! Domain entities held in committed state.

pub mod allocation;
pub mod project;
pub mod team_member;

pub use allocation::{Allocation, AllocationPatch, Percentage};
pub use project::{Project, ProjectPatch};
pub use team_member::{TeamMember, TeamMemberPatch};

use super::error::ValidationError;

/// Contract shared by every entity the schedule store keeps
pub trait Entity: Sized + Clone + Send + Sync {
    /// Partial set of field changes
    type Patch: Clone + Send + Sync;

    /// Human-readable entity name used in errors and logs
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Overlay the fields present in `patch`
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Invariants that must hold after every create/update
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
