//! Wire schema of the remote row store.
//!
//! Every table is scoped by the owning user (`user_id`) and uses
//! separate-word field names. Dates are calendar dates in `YYYY-MM-DD` form.
//! Update rows carry only the fields being changed; absent fields are not
//! serialized, so the remote leaves them untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three remote tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    TeamMembers,
    Projects,
    Allocations,
}

impl Table {
    /// Remote table name
    pub fn name(&self) -> &'static str {
        match self {
            Table::TeamMembers => "team_members",
            Table::Projects => "projects",
            Table::Allocations => "allocations",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A team member as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberRow {
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    pub name: String,
    pub role: String,
    /// Display-only avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Partial update for a team member row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberUpdateRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A project as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    pub name: String,
    /// Block color, e.g. `#2563eb`
    pub color: String,
}

/// Partial update for a project row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdateRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An allocation as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    pub team_member_id: String,
    pub project_id: String,
    /// First allocated day, inclusive (`YYYY-MM-DD`)
    pub start_date: String,
    /// Last allocated day, inclusive (`YYYY-MM-DD`)
    pub end_date: String,
    /// 50 or 100
    pub percentage: u8,
}

/// Partial update for an allocation row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationUpdateRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_member_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
}
