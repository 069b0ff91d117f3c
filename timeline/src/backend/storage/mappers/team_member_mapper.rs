use anyhow::Result;
use serde_json::{Map, Value};
use shared::{Table, TeamMemberRow, TeamMemberUpdateRow};

use crate::backend::domain::models::{TeamMember, TeamMemberPatch};
use crate::backend::storage::remote_repository::{into_fields, RemoteEntity};

pub struct TeamMemberMapper;

impl TeamMemberMapper {
    pub fn to_row(member: &TeamMember, user_id: &str) -> TeamMemberRow {
        TeamMemberRow {
            id: member.id.clone(),
            user_id: user_id.to_string(),
            name: member.name.clone(),
            role: member.role.clone(),
            avatar: Some(member.avatar.clone()),
        }
    }

    pub fn to_domain(row: TeamMemberRow) -> TeamMember {
        TeamMember {
            id: row.id,
            name: row.name,
            role: row.role,
            avatar: row.avatar.unwrap_or_default(),
        }
    }

    pub fn to_update_row(patch: &TeamMemberPatch) -> TeamMemberUpdateRow {
        TeamMemberUpdateRow {
            name: patch.name.clone(),
            role: patch.role.clone(),
            avatar: patch.avatar.clone(),
        }
    }
}

impl RemoteEntity for TeamMember {
    const TABLE: Table = Table::TeamMembers;

    fn to_row(&self, user_id: &str) -> Result<Value> {
        Ok(serde_json::to_value(TeamMemberMapper::to_row(self, user_id))?)
    }

    fn from_row(row: Value) -> Result<Self> {
        let row: TeamMemberRow = serde_json::from_value(row)?;
        Ok(TeamMemberMapper::to_domain(row))
    }

    fn patch_fields(patch: &TeamMemberPatch) -> Result<Map<String, Value>> {
        into_fields(serde_json::to_value(TeamMemberMapper::to_update_row(patch))?)
    }
}
