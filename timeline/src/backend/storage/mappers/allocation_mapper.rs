use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use shared::{AllocationRow, AllocationUpdateRow, Table};

use crate::backend::domain::models::{Allocation, AllocationPatch, Percentage};
use crate::backend::storage::remote_repository::{into_fields, RemoteEntity};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct AllocationMapper;

impl AllocationMapper {
    fn format_date(date: NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    fn parse_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .with_context(|| format!("Invalid date in allocation row: {}", value))
    }

    pub fn to_row(allocation: &Allocation, user_id: &str) -> AllocationRow {
        AllocationRow {
            id: allocation.id.clone(),
            user_id: user_id.to_string(),
            team_member_id: allocation.team_member_id.clone(),
            project_id: allocation.project_id.clone(),
            start_date: Self::format_date(allocation.start_date),
            end_date: Self::format_date(allocation.end_date),
            percentage: allocation.percentage.value(),
        }
    }

    pub fn to_domain(row: AllocationRow) -> Result<Allocation> {
        Ok(Allocation {
            start_date: Self::parse_date(&row.start_date)?,
            end_date: Self::parse_date(&row.end_date)?,
            percentage: Percentage::try_from(row.percentage)?,
            id: row.id,
            team_member_id: row.team_member_id,
            project_id: row.project_id,
        })
    }

    pub fn to_update_row(patch: &AllocationPatch) -> AllocationUpdateRow {
        AllocationUpdateRow {
            team_member_id: patch.team_member_id.clone(),
            project_id: patch.project_id.clone(),
            start_date: patch.start_date.map(Self::format_date),
            end_date: patch.end_date.map(Self::format_date),
            percentage: patch.percentage.map(Percentage::value),
        }
    }
}

impl RemoteEntity for Allocation {
    const TABLE: Table = Table::Allocations;

    fn to_row(&self, user_id: &str) -> Result<Value> {
        Ok(serde_json::to_value(AllocationMapper::to_row(self, user_id))?)
    }

    fn from_row(row: Value) -> Result<Self> {
        let row: AllocationRow = serde_json::from_value(row)?;
        AllocationMapper::to_domain(row)
    }

    fn patch_fields(patch: &AllocationPatch) -> Result<Map<String, Value>> {
        into_fields(serde_json::to_value(AllocationMapper::to_update_row(patch))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_row_uses_separate_word_names() {
        let allocation = Allocation {
            id: "a1".to_string(),
            team_member_id: "m1".to_string(),
            project_id: "p1".to_string(),
            start_date: date(2024, 3, 18),
            end_date: date(2024, 3, 22),
            percentage: Percentage::Half,
        };

        let row = allocation.to_row("u1").unwrap();
        assert_eq!(row["team_member_id"], "m1");
        assert_eq!(row["project_id"], "p1");
        assert_eq!(row["start_date"], "2024-03-18");
        assert_eq!(row["end_date"], "2024-03-22");
        assert_eq!(row["percentage"], 50);
        assert_eq!(row["user_id"], "u1");
    }

    #[test]
    fn test_partial_patch_translates_present_fields_only() {
        let patch = AllocationPatch {
            team_member_id: Some("m2".to_string()),
            end_date: Some(date(2024, 3, 25)),
            ..Default::default()
        };

        let fields = Allocation::patch_fields(&patch).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["team_member_id"], "m2");
        assert_eq!(fields["end_date"], "2024-03-25");
        assert!(!fields.contains_key("start_date"));
    }

    #[test]
    fn test_from_row_rejects_bad_values() {
        let bad_percentage = json!({
            "id": "a1", "user_id": "u1", "team_member_id": "m1", "project_id": "p1",
            "start_date": "2024-03-18", "end_date": "2024-03-22", "percentage": 75
        });
        assert!(Allocation::from_row(bad_percentage).is_err());

        let bad_date = json!({
            "id": "a1", "user_id": "u1", "team_member_id": "m1", "project_id": "p1",
            "start_date": "18/03/2024", "end_date": "2024-03-22", "percentage": 100
        });
        assert!(Allocation::from_row(bad_date).is_err());
    }
}
