use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::backend::domain::error::ValidationError;

/// Share of a member's time assigned to a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Percentage {
    Half,
    #[default]
    Full,
}

impl Percentage {
    pub fn value(self) -> u8 {
        match self {
            Percentage::Half => 50,
            Percentage::Full => 100,
        }
    }

    /// Flip between part-time and full-time
    pub fn toggled(self) -> Self {
        match self {
            Percentage::Full => Percentage::Half,
            Percentage::Half => Percentage::Full,
        }
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            50 => Ok(Percentage::Half),
            100 => Ok(Percentage::Full),
            other => Err(ValidationError::InvalidPercentage(other)),
        }
    }
}

impl From<Percentage> for u8 {
    fn from(value: Percentage) -> Self {
        value.value()
    }
}

/// Assignment of one team member to one project over an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: String,
    pub team_member_id: String,
    pub project_id: String,
    /// First allocated day, inclusive
    pub start_date: NaiveDate,
    /// Last allocated day, inclusive
    pub end_date: NaiveDate,
    pub percentage: Percentage,
}

impl Allocation {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Whether `day` falls inside `[start_date, end_date]`
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    /// Whether this allocation occupies the given grid cell
    pub fn covers(&self, team_member_id: &str, day: NaiveDate) -> bool {
        self.team_member_id == team_member_id && self.contains_day(day)
    }

    /// `end_date - start_date` in days
    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }

    /// Number of grid cells the block spans
    pub fn span_days(&self) -> i64 {
        self.duration().num_days() + 1
    }

    pub fn is_start_day(&self, day: NaiveDate) -> bool {
        self.start_date == day
    }

    /// Copy with the fields present in `patch` overlaid
    pub fn with_patch(&self, patch: &AllocationPatch) -> Allocation {
        let mut patched = self.clone();
        patched.apply_patch(patch);
        patched
    }
}

impl Entity for Allocation {
    type Patch = AllocationPatch;

    const KIND: &'static str = "Allocation";

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_patch(&mut self, patch: &AllocationPatch) {
        if let Some(team_member_id) = &patch.team_member_id {
            self.team_member_id = team_member_id.clone();
        }
        if let Some(project_id) = &patch.project_id {
            self.project_id = project_id.clone();
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(percentage) = patch.percentage {
            self.percentage = percentage;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.start_date > self.end_date {
            return Err(ValidationError::InvalidDateRange);
        }
        Ok(())
    }
}

/// Partial allocation update; only present fields are applied or sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationPatch {
    pub team_member_id: Option<String>,
    pub project_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub percentage: Option<Percentage>,
}

impl AllocationPatch {
    pub fn is_empty(&self) -> bool {
        self.team_member_id.is_none()
            && self.project_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.percentage.is_none()
    }

    pub fn percentage(percentage: Percentage) -> Self {
        Self {
            percentage: Some(percentage),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Allocation {
        Allocation {
            id: "a1".to_string(),
            team_member_id: "m1".to_string(),
            project_id: "p1".to_string(),
            start_date: date(2024, 3, 18),
            end_date: date(2024, 3, 22),
            percentage: Percentage::Full,
        }
    }

    #[test]
    fn test_contains_day_is_inclusive() {
        let allocation = sample();
        assert!(allocation.contains_day(date(2024, 3, 18)));
        assert!(allocation.contains_day(date(2024, 3, 22)));
        assert!(!allocation.contains_day(date(2024, 3, 17)));
        assert!(!allocation.contains_day(date(2024, 3, 23)));
    }

    #[test]
    fn test_covers_requires_member_match() {
        let allocation = sample();
        assert!(allocation.covers("m1", date(2024, 3, 20)));
        assert!(!allocation.covers("m2", date(2024, 3, 20)));
    }

    #[test]
    fn test_span_days() {
        assert_eq!(sample().span_days(), 5);
    }

    #[test]
    fn test_percentage_toggle_twice_restores() {
        let original = Percentage::Full;
        assert_eq!(original.toggled(), Percentage::Half);
        assert_eq!(original.toggled().toggled(), original);
    }

    #[test]
    fn test_percentage_only_accepts_half_or_full() {
        assert_eq!(Percentage::try_from(50).unwrap(), Percentage::Half);
        assert_eq!(Percentage::try_from(100).unwrap(), Percentage::Full);
        assert_eq!(
            Percentage::try_from(75),
            Err(ValidationError::InvalidPercentage(75))
        );
    }

    #[test]
    fn test_with_patch_only_touches_present_fields() {
        let allocation = sample();
        let patch = AllocationPatch {
            start_date: Some(date(2024, 3, 20)),
            ..Default::default()
        };

        let patched = allocation.with_patch(&patch);
        assert_eq!(patched.start_date, date(2024, 3, 20));
        assert_eq!(patched.end_date, allocation.end_date);
        assert_eq!(patched.team_member_id, allocation.team_member_id);
        assert_eq!(patched.percentage, allocation.percentage);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut allocation = sample();
        allocation.start_date = date(2024, 3, 23);
        assert_eq!(allocation.validate(), Err(ValidationError::InvalidDateRange));

        allocation.start_date = allocation.end_date;
        assert!(allocation.validate().is_ok());
    }
}
