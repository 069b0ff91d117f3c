use anyhow::Result;
use serde_json::{Map, Value};
use shared::{ProjectRow, ProjectUpdateRow, Table};

use crate::backend::domain::models::{Project, ProjectPatch};
use crate::backend::storage::remote_repository::{into_fields, RemoteEntity};

pub struct ProjectMapper;

impl ProjectMapper {
    pub fn to_row(project: &Project, user_id: &str) -> ProjectRow {
        ProjectRow {
            id: project.id.clone(),
            user_id: user_id.to_string(),
            name: project.name.clone(),
            color: project.color.clone(),
        }
    }

    pub fn to_domain(row: ProjectRow) -> Project {
        Project {
            id: row.id,
            name: row.name,
            color: row.color,
        }
    }

    pub fn to_update_row(patch: &ProjectPatch) -> ProjectUpdateRow {
        ProjectUpdateRow {
            name: patch.name.clone(),
            color: patch.color.clone(),
        }
    }
}

impl RemoteEntity for Project {
    const TABLE: Table = Table::Projects;

    fn to_row(&self, user_id: &str) -> Result<Value> {
        Ok(serde_json::to_value(ProjectMapper::to_row(self, user_id))?)
    }

    fn from_row(row: Value) -> Result<Self> {
        let row: ProjectRow = serde_json::from_value(row)?;
        Ok(ProjectMapper::to_domain(row))
    }

    fn patch_fields(patch: &ProjectPatch) -> Result<Map<String, Value>> {
        into_fields(serde_json::to_value(ProjectMapper::to_update_row(patch))?)
    }
}
