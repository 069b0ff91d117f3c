use serde::{Deserialize, Serialize};

use super::Entity;
use crate::backend::domain::error::ValidationError;

/// Something team members are allocated to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Block color, e.g. `#2563eb`
    pub color: String,
}

impl Project {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl Entity for Project {
    type Patch = ProjectPatch;

    const KIND: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: &ProjectPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.color.trim().is_empty() {
            return Err(ValidationError::EmptyColor);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}
