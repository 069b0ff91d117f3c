//! Pointer, keyboard and scroll handlers of the timeline grid.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::backend::domain::commands::allocation::CreateAllocationCommand;
use crate::backend::domain::models::Allocation;
use crate::backend::domain::{AllocationIndex, DragKind, PointerPosition, ScrollMetrics};
use crate::backend::storage::{IdentityProvider, RowStore};
use crate::ui::app::TimelineApp;

impl<S: RowStore, I: IdentityProvider> TimelineApp<S, I> {
    /// Pointer-down on a block body (`Move`) or one of its edge handles
    pub fn handle_pointer_down(&mut self, allocation_id: &str, kind: DragKind, pointer: PointerPosition) -> bool {
        let Some(allocation) = self.schedule().allocation(allocation_id) else {
            debug!("Pointer-down on unknown allocation {}", allocation_id);
            return false;
        };
        self.interaction.drag.begin(kind, &allocation, pointer);
        true
    }

    /// Recompute the drag preview; true when it changed
    pub fn handle_pointer_move(&mut self, pointer: PointerPosition) -> bool {
        if !self.interaction.drag.is_dragging() {
            return false;
        }
        let member_order = self.member_order();
        let geometry = self.timeline.geometry;
        self.interaction.drag.update(pointer, geometry, &member_order)
    }

    /// End the drag and commit its preview. The grid is idle again before
    /// the remote write is awaited.
    pub async fn handle_pointer_up(&mut self) -> Option<Allocation> {
        let commit = self.interaction.drag.finish()?;

        let result = self
            .backend
            .schedule
            .update_allocation(&commit.allocation_id, commit.patch)
            .await;
        self.report(result, "Failed to update allocation. Please try again.")
    }

    /// Escape: abandon an active drag without committing, otherwise drop the selection
    pub fn handle_escape_key(&mut self) -> bool {
        if self.interaction.drag.cancel() {
            return true;
        }
        if self.interaction.selected_allocation.is_some() {
            self.interaction.clear_selection();
            return true;
        }
        false
    }

    /// Click on a grid cell: toggle selection of the allocation under it, or
    /// create one for the selected project when the cell is empty
    pub async fn handle_cell_click(&mut self, team_member_id: &str, date: NaiveDate) -> Option<Allocation> {
        if self.interaction.drag.is_dragging() {
            return None;
        }

        let allocations = self.schedule().allocations();
        let existing = AllocationIndex::new(&allocations, None)
            .find(team_member_id, date)
            .map(|allocation| allocation.id.clone());

        if let Some(allocation_id) = existing {
            self.interaction.toggle_selection(&allocation_id);
            return None;
        }

        let command = CreateAllocationCommand {
            team_member_id: team_member_id.to_string(),
            project_id: self.interaction.selected_project.clone(),
            start_date: date,
        };
        let result = self.backend.schedule.create_allocation(command).await;
        let created = self.report(result, "Failed to create allocation. Please try again.")?;
        info!("➕ Created allocation {} on {}", created.id, date);
        Some(created)
    }

    /// Delete key: remove the selected allocation
    pub async fn handle_delete_key(&mut self) -> bool {
        let Some(allocation_id) = self.interaction.selected_allocation.take() else {
            return false;
        };
        self.delete_allocation(&allocation_id).await
    }

    pub async fn delete_allocation(&mut self, allocation_id: &str) -> bool {
        if self.interaction.is_selected(allocation_id) {
            self.interaction.clear_selection();
        }
        let result = self.backend.schedule.remove_allocation(allocation_id).await;
        self.report(result, "Failed to delete allocation. Please try again.")
            .is_some()
    }

    /// Flip the allocation between 50% and 100%
    pub async fn toggle_percentage(&mut self, allocation_id: &str) -> Option<Allocation> {
        let result = self.backend.schedule.toggle_percentage(allocation_id).await;
        self.report(result, "Failed to update allocation. Please try again.")
    }

    /// Record the size of a rendered cell
    pub fn measure_cells(&mut self, width: f64, height: f64) {
        debug!("Measured cell {}x{}", width, height);
        self.timeline.measure(width, height);
    }

    /// Start an expansion when the viewport nears its right edge. Returns
    /// true if an expansion was started and `finish_expansion` should follow.
    pub fn handle_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        self.timeline.window.on_scroll(&metrics)
    }

    /// Apply the pending expansion after the configured delay
    pub async fn finish_expansion(&mut self) -> u32 {
        tokio::time::sleep(Duration::from_millis(self.config.expansion_delay_ms)).await;
        let before = self.timeline.window.days_to_show();
        let days = self.timeline.window.complete_load_more();
        if days != before {
            self.timeline.geometry_stale = true;
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::json;
    use shared::Table;

    use super::*;
    use crate::backend::config::TimelineConfig;
    use crate::backend::domain::models::Percentage;
    use crate::backend::storage::{InMemoryRowStore, StaticIdentity};

    type TestApp = TimelineApp<InMemoryRowStore, StaticIdentity>;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup_test_app() -> (TestApp, Arc<InMemoryRowStore>) {
        let rows = Arc::new(InMemoryRowStore::new());
        rows.seed(
            Table::TeamMembers,
            vec![
                json!({"id": "m1", "user_id": "u1", "name": "Ana", "role": "Dev"}),
                json!({"id": "m2", "user_id": "u1", "name": "Bruno", "role": "Design"}),
            ],
        )
        .unwrap();
        rows.seed(
            Table::Projects,
            vec![json!({"id": "p1", "user_id": "u1", "name": "Apollo", "color": "#ef4444"})],
        )
        .unwrap();
        rows.seed(
            Table::Allocations,
            vec![json!({"id": "a1", "user_id": "u1", "team_member_id": "m1", "project_id": "p1",
                        "start_date": "2024-03-10", "end_date": "2024-03-20", "percentage": 100})],
        )
        .unwrap();

        let mut app = TimelineApp::with_start_date(
            TimelineConfig::default(),
            rows.clone(),
            Arc::new(StaticIdentity::signed_in("u1")),
            date(2024, 3, 1),
        );
        assert!(app.load().await);
        (app, rows)
    }

    #[tokio::test]
    async fn test_load_selects_first_project() {
        let (app, _rows) = setup_test_app().await;
        assert_eq!(app.interaction.selected_project.as_deref(), Some("p1"));
        assert!(!app.ui.loading);
    }

    #[tokio::test]
    async fn test_load_reports_hidden_records() {
        let (mut app, rows) = setup_test_app().await;
        assert!(app.ui.hidden_records_notice().is_none());

        rows.seed(
            Table::Projects,
            vec![json!({"id": "p2", "user_id": "u1", "name": "Gemini"})],
        )
        .unwrap();
        assert!(app.load().await);

        assert_eq!(app.ui.hidden_records, 1);
        assert_eq!(
            app.ui.hidden_records_notice().as_deref(),
            Some("1 saved record could not be read and is hidden.")
        );
        assert_eq!(app.schedule().projects().len(), 1);
    }

    #[tokio::test]
    async fn test_resize_start_commits_new_start() {
        let (mut app, _rows) = setup_test_app().await;
        let anchor = PointerPosition::new(400.0, 10.0);

        assert!(app.handle_pointer_down("a1", DragKind::ResizeStart, anchor));
        assert!(app.handle_pointer_move(PointerPosition::new(520.0, 10.0)));

        let updated = app.handle_pointer_up().await.unwrap();
        assert_eq!(updated.start_date, date(2024, 3, 13));
        assert_eq!(updated.end_date, date(2024, 3, 20));
        assert!(!app.interaction.drag.is_dragging());
    }

    #[tokio::test]
    async fn test_rejected_commit_surfaces_error() {
        let (mut app, rows) = setup_test_app().await;
        app.handle_pointer_down("a1", DragKind::Move, PointerPosition::default());
        app.handle_pointer_move(PointerPosition::new(80.0, 0.0));
        rows.fail_next_writes(1);

        assert!(app.handle_pointer_up().await.is_none());
        assert_eq!(
            app.schedule().allocation("a1").unwrap().start_date,
            date(2024, 3, 10)
        );
        assert!(app.ui.error_message.is_some());
    }

    #[tokio::test]
    async fn test_cell_click_toggles_selection() {
        let (mut app, rows) = setup_test_app().await;
        let writes = rows.write_count();

        app.handle_cell_click("m1", date(2024, 3, 15)).await;
        assert!(app.interaction.is_selected("a1"));

        app.handle_cell_click("m1", date(2024, 3, 12)).await;
        assert!(app.interaction.selected_allocation.is_none());
        assert_eq!(rows.write_count(), writes);
    }

    #[tokio::test]
    async fn test_empty_cell_click_creates_allocation() {
        let (mut app, _rows) = setup_test_app().await;
        let created = app.handle_cell_click("m2", date(2024, 3, 18)).await.unwrap();

        assert_eq!(created.project_id, "p1");
        assert_eq!(created.end_date, date(2024, 3, 22));
        assert_eq!(created.percentage, Percentage::Full);
    }

    #[tokio::test]
    async fn test_empty_cell_click_without_project() {
        let (mut app, _rows) = setup_test_app().await;
        app.select_project(None);

        assert!(app.handle_cell_click("m2", date(2024, 3, 18)).await.is_none());
        assert_eq!(app.ui.error_message.as_deref(), Some("Please select a project first"));
        assert_eq!(app.schedule().allocations().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_key_removes_selected() {
        let (mut app, rows) = setup_test_app().await;
        app.handle_cell_click("m1", date(2024, 3, 15)).await;

        assert!(app.handle_delete_key().await);
        assert!(app.schedule().allocations().is_empty());
        assert!(app.interaction.selected_allocation.is_none());
        assert!(rows.rows(Table::Allocations).is_empty());

        assert!(!app.handle_delete_key().await);
    }

    #[tokio::test]
    async fn test_scroll_expansion_marks_geometry_stale() {
        let (mut app, _rows) = setup_test_app().await;
        app.measure_cells(40.0, 64.0);
        let metrics = ScrollMetrics::new(850.0, 1200.0, 200.0);

        assert!(app.handle_scroll(metrics));
        assert!(!app.handle_scroll(metrics));
        assert_eq!(app.finish_expansion().await, 120);
        assert!(app.timeline.geometry_stale);
    }

    #[tokio::test]
    async fn test_finish_without_pending_expansion_keeps_geometry() {
        let (mut app, _rows) = setup_test_app().await;
        app.measure_cells(40.0, 64.0);

        assert_eq!(app.finish_expansion().await, 90);
        assert!(!app.timeline.geometry_stale);
    }

    #[tokio::test]
    async fn test_escape_cancels_drag_then_clears_selection() {
        let (mut app, rows) = setup_test_app().await;
        let writes = rows.write_count();

        app.handle_pointer_down("a1", DragKind::Move, PointerPosition::default());
        app.handle_pointer_move(PointerPosition::new(80.0, 0.0));
        assert!(app.handle_escape_key());
        assert!(!app.interaction.drag.is_dragging());
        assert!(app.handle_pointer_up().await.is_none());
        assert_eq!(app.schedule().allocation("a1").unwrap().start_date, date(2024, 3, 10));
        assert_eq!(rows.write_count(), writes);

        app.handle_cell_click("m1", date(2024, 3, 15)).await;
        assert!(app.handle_escape_key());
        assert!(app.interaction.selected_allocation.is_none());
        assert!(!app.handle_escape_key());
    }
}
