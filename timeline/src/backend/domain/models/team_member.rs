use serde::{Deserialize, Serialize};

use super::Entity;
use crate::backend::domain::error::ValidationError;

/// A row of the scheduling grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    /// Display-only avatar URL
    pub avatar: String,
}

impl TeamMember {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl Entity for TeamMember {
    type Patch = TeamMemberPatch;

    const KIND: &'static str = "Team member";

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: &TeamMemberPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(role) = &patch.role {
            self.role = role.clone();
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = avatar.clone();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.role.trim().is_empty() {
            return Err(ValidationError::EmptyRole);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMemberPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub avatar: Option<String>,
}
