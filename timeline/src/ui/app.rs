//! # Timeline App Module
//!
//! Central state of the timeline interface and its data-facing actions.
//!
//! ## Key Types:
//! - `TimelineApp` - owns the backend services and all UI state
//!
//! ## Key Functions:
//! - `load()` - fetch the signed-in user's schedule
//! - `add_team_member()` / `add_project()` - form submissions
//! - `sign_out()` - end the session and drop local data
//!
//! Pointer, keyboard and scroll handling lives in `interactions`, the grid
//! view-model in `grid`.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

use crate::backend::config::TimelineConfig;
use crate::backend::domain::commands::project::NewProjectCommand;
use crate::backend::domain::commands::team_member::NewTeamMemberCommand;
use crate::backend::domain::models::{Project, TeamMember};
use crate::backend::domain::{ScheduleError, ScheduleResult, ScheduleStore, SyncOutcome};
use crate::backend::storage::{IdentityProvider, RowStore};
use crate::backend::{initialize_backend, Backend};
use crate::ui::state::{InteractionState, TimelineState, UiState};

pub struct TimelineApp<S: RowStore, I: IdentityProvider> {
    pub backend: Backend<S, I>,
    pub config: TimelineConfig,
    pub timeline: TimelineState,
    pub interaction: InteractionState,
    pub ui: UiState,
}

impl<S: RowStore, I: IdentityProvider> TimelineApp<S, I> {
    /// Timeline starting at today's local date
    pub fn new(config: TimelineConfig, store: Arc<S>, identity: Arc<I>) -> Self {
        Self::with_start_date(config, store, identity, Local::now().date_naive())
    }

    pub fn with_start_date(config: TimelineConfig, store: Arc<S>, identity: Arc<I>, start: NaiveDate) -> Self {
        info!("🚀 Initializing timeline starting {}", start);
        let timeline = TimelineState::new(&config, start);
        let backend = initialize_backend(config.clone(), store, identity);

        Self {
            backend,
            config,
            timeline,
            interaction: InteractionState::default(),
            ui: UiState::new(),
        }
    }

    pub fn schedule(&self) -> &ScheduleStore<S, I> {
        &self.backend.schedule
    }

    /// Ids of the displayed members, top to bottom
    pub fn member_order(&self) -> Vec<String> {
        self.schedule()
            .team_members()
            .into_iter()
            .map(|member| member.id)
            .collect()
    }

    /// Turn a mutation result into the committed value or a user-facing message
    pub(crate) fn report<T>(&mut self, result: ScheduleResult<SyncOutcome<T>>, failure_message: &str) -> Option<T> {
        match result {
            Ok(SyncOutcome::Committed(value)) => {
                self.ui.clear_messages();
                Some(value)
            }
            Ok(SyncOutcome::RolledBack { reason }) => {
                warn!("Change rolled back: {}", reason);
                self.ui.set_error(failure_message);
                None
            }
            Err(ScheduleError::Validation(e)) => {
                self.ui.set_error(e.to_string());
                None
            }
            Err(e) => {
                error!("{}: {}", failure_message, e);
                self.ui.set_error(failure_message);
                None
            }
        }
    }

    /// Fetch all data for the signed-in user
    pub async fn load(&mut self) -> bool {
        self.ui.loading = true;
        let result = self.backend.schedule.fetch_user_data().await;
        self.ui.loading = false;

        if let Err(e) = result {
            error!("Failed to load schedule: {}", e);
            self.ui.set_error("Failed to load data. Please try again.");
            return false;
        }

        if self.interaction.selected_project.is_none() {
            let first_project = self.schedule().projects().into_iter().next();
            if let Some(first) = first_project {
                info!("Selecting first project {}", first.name);
                self.interaction.selected_project = Some(first.id);
            }
        }

        self.ui.hidden_records = self.schedule().skipped_rows();
        if let Some(notice) = self.ui.hidden_records_notice() {
            warn!("{}", notice);
        }

        self.ui.clear_messages();
        true
    }

    pub fn select_project(&mut self, project_id: Option<String>) {
        self.interaction.selected_project = project_id;
    }

    pub async fn add_team_member(&mut self, name: &str, role: &str) -> Option<TeamMember> {
        self.ui.submitting = true;
        let command = NewTeamMemberCommand {
            name: name.to_string(),
            role: role.to_string(),
        };
        let result = self.backend.schedule.add_team_member(command).await;
        self.ui.submitting = false;

        self.report(result, "Failed to add team member. Please try again.")
    }

    pub async fn add_project(&mut self, name: &str, color: Option<&str>) -> Option<Project> {
        self.ui.submitting = true;
        let command = NewProjectCommand {
            name: name.to_string(),
            color: color.map(str::to_string),
        };
        let result = self.backend.schedule.add_project(command).await;
        self.ui.submitting = false;

        let project = self.report(result, "Failed to add project. Please try again.")?;
        if self.interaction.selected_project.is_none() {
            self.interaction.selected_project = Some(project.id.clone());
        }
        Some(project)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> bool {
        match self.backend.auth.sign_in(email, password).await {
            Ok(_) => self.load().await,
            Err(ScheduleError::Validation(e)) => {
                self.ui.set_error(e.to_string());
                false
            }
            Err(e) => {
                error!("Sign-in failed: {}", e);
                self.ui.set_error("Invalid email or password.");
                false
            }
        }
    }

    /// End the session; local data and selections are dropped
    pub async fn sign_out(&mut self) {
        if let Err(e) = self.backend.auth.sign_out().await {
            error!("Sign-out failed: {}", e);
            self.ui.set_error("Failed to sign out. Please try again.");
            return;
        }
        self.interaction = InteractionState::default();
        self.timeline.window.reset();
        self.ui.hidden_records = 0;
        self.ui.clear_messages();
    }
}
