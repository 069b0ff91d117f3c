//! # Grid View-Model
//!
//! Everything a renderer needs to draw the timeline: header bands and one
//! row of cells per team member. Blocks are emitted only on the start cell
//! of an allocation and only when its project still exists, so dangling
//! project references are silently left out.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::backend::domain::holiday_calendar::day_kind;
use crate::backend::domain::models::{Allocation, Percentage, Project, TeamMember};
use crate::backend::domain::timeline_header::{day_headers, month_groups, week_groups, DayHeader, MonthGroup, WeekGroup};
use crate::backend::domain::{AllocationIndex, DayKind};
use crate::backend::storage::{IdentityProvider, RowStore};
use crate::ui::app::TimelineApp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineHeader {
    pub months: Vec<MonthGroup>,
    pub weeks: Vec<WeekGroup>,
    pub days: Vec<DayHeader>,
}

/// Drawable allocation block anchored at its start cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    pub allocation_id: String,
    /// Number of day columns covered
    pub span_days: i64,
    pub project_name: String,
    pub project_color: String,
    pub percentage: Percentage,
    pub is_dragging: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub date: NaiveDate,
    pub kind: DayKind,
    /// Allocation occupying the cell, at its preview position while dragged
    pub allocation: Option<Allocation>,
    pub is_start: bool,
    pub block: Option<BlockView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub member: TeamMember,
    pub cells: Vec<GridCell>,
}

impl<S: RowStore, I: IdentityProvider> TimelineApp<S, I> {
    pub fn header(&self) -> TimelineHeader {
        let days = self.timeline.window.days();
        TimelineHeader {
            months: month_groups(&days),
            weeks: week_groups(&days),
            days: day_headers(&days),
        }
    }

    pub fn grid_rows(&self) -> Vec<GridRow> {
        let state = self.schedule().snapshot();
        let days = self.timeline.window.days();
        let kinds: Vec<DayKind> = days.iter().map(|day| day_kind(*day)).collect();
        let projects: HashMap<&str, &Project> = state
            .projects
            .iter()
            .map(|project| (project.id.as_str(), project))
            .collect();
        let index = AllocationIndex::new(&state.allocations, self.interaction.drag.session());

        state
            .team_members
            .iter()
            .map(|member| GridRow {
                member: member.clone(),
                cells: days
                    .iter()
                    .zip(kinds.iter())
                    .map(|(day, kind)| self.cell(&index, &projects, &member.id, *day, *kind))
                    .collect(),
            })
            .collect()
    }

    fn cell(
        &self,
        index: &AllocationIndex<'_>,
        projects: &HashMap<&str, &Project>,
        team_member_id: &str,
        date: NaiveDate,
        kind: DayKind,
    ) -> GridCell {
        let allocation = index
            .find(team_member_id, date)
            .map(|allocation| allocation.into_owned());
        let is_start = allocation
            .as_ref()
            .map(|allocation| allocation.is_start_day(date))
            .unwrap_or(false);

        let block = allocation
            .as_ref()
            .filter(|_| is_start)
            .and_then(|allocation| {
                let project = projects.get(allocation.project_id.as_str())?;
                Some(BlockView {
                    allocation_id: allocation.id.clone(),
                    span_days: allocation.span_days(),
                    project_name: project.name.clone(),
                    project_color: project.color.clone(),
                    percentage: allocation.percentage,
                    is_dragging: self.interaction.drag.is_dragging_allocation(&allocation.id),
                    is_selected: self.interaction.is_selected(&allocation.id),
                })
            });

        GridCell {
            date,
            kind,
            allocation,
            is_start,
            block,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use shared::Table;

    use super::*;
    use crate::backend::config::TimelineConfig;
    use crate::backend::domain::{DragKind, PointerPosition};
    use crate::backend::storage::{InMemoryRowStore, StaticIdentity};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup_test_app() -> TimelineApp<InMemoryRowStore, StaticIdentity> {
        let rows = Arc::new(InMemoryRowStore::new());
        rows.seed(
            Table::TeamMembers,
            vec![json!({"id": "m1", "user_id": "u1", "name": "Ana", "role": "Dev"})],
        )
        .unwrap();
        rows.seed(
            Table::Projects,
            vec![json!({"id": "p1", "user_id": "u1", "name": "Apollo", "color": "#ef4444"})],
        )
        .unwrap();
        rows.seed(
            Table::Allocations,
            vec![
                json!({"id": "a1", "user_id": "u1", "team_member_id": "m1", "project_id": "p1",
                       "start_date": "2024-03-04", "end_date": "2024-03-08", "percentage": 50}),
                json!({"id": "a2", "user_id": "u1", "team_member_id": "m1", "project_id": "gone",
                       "start_date": "2024-03-11", "end_date": "2024-03-12", "percentage": 100}),
            ],
        )
        .unwrap();

        let config = TimelineConfig {
            initial_days: 14,
            ..Default::default()
        };
        let mut app = TimelineApp::with_start_date(
            config,
            rows,
            Arc::new(StaticIdentity::signed_in("u1")),
            date(2024, 3, 1),
        );
        app.load().await;
        app
    }

    #[tokio::test]
    async fn test_block_only_on_start_cell() {
        let app = setup_test_app().await;
        let rows = app.grid_rows();
        assert_eq!(rows.len(), 1);

        let cells = &rows[0].cells;
        assert_eq!(cells.len(), 14);

        let start = &cells[3];
        assert!(start.is_start);
        let block = start.block.as_ref().unwrap();
        assert_eq!(block.span_days, 5);
        assert_eq!(block.project_name, "Apollo");
        assert_eq!(block.percentage, Percentage::Half);

        let middle = &cells[5];
        assert!(middle.allocation.is_some());
        assert!(middle.block.is_none());
    }

    #[tokio::test]
    async fn test_dangling_project_has_no_block() {
        let app = setup_test_app().await;
        let rows = app.grid_rows();
        let cell = &rows[0].cells[10];

        assert_eq!(cell.date, date(2024, 3, 11));
        assert!(cell.is_start);
        assert!(cell.block.is_none());
    }

    #[tokio::test]
    async fn test_dragged_block_is_flagged() {
        let mut app = setup_test_app().await;
        app.handle_pointer_down("a1", DragKind::Move, PointerPosition::default());
        app.handle_pointer_move(PointerPosition::new(40.0, 0.0));

        let rows = app.grid_rows();
        assert!(rows[0].cells[3].allocation.is_none());
        let block = rows[0].cells[4].block.as_ref().unwrap();
        assert!(block.is_dragging);
    }

    #[tokio::test]
    async fn test_header_and_shading() {
        let app = setup_test_app().await;
        let header = app.header();
        assert_eq!(header.days.len(), 14);
        assert_eq!(header.months[0].label, "março 2024");

        // 2024-03-02 is a Saturday
        assert_eq!(app.grid_rows()[0].cells[1].kind, DayKind::Weekend);
    }
}
