//! Translation between domain entities and remote rows.
//!
//! Domain entities serialize with merged-word names (`teamMemberId`) while
//! remote rows use separate words (`team_member_id`). Each mapper covers
//! every mutable field; partial updates only carry present fields.

pub mod allocation_mapper;
pub mod project_mapper;
pub mod team_member_mapper;

pub use allocation_mapper::AllocationMapper;
pub use project_mapper::ProjectMapper;
pub use team_member_mapper::TeamMemberMapper;
