//! # Schedule Store
//!
//! Owns the committed state (team members, projects, allocations) and
//! mirrors every change to the remote row store.
//!
//! ## Mutation protocol
//!
//! Every add, update and remove runs in three phases:
//!
//! 1. Validate input and require a signed-in user. Failures return `Err`
//!    and nothing is touched.
//! 2. Apply the change to committed state.
//! 3. Write to the remote. If the write fails the local change is undone and
//!    the call returns `Ok(SyncOutcome::RolledBack)`.
//!
//! Undo strategy per operation:
//! - add: drop the optimistic record
//! - update: full re-fetch; if that also fails, restore the previous record
//! - remove: re-insert the record at its former position
//!
//! The state lock is never held across an `.await`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{error, info, warn};

use super::commands::allocation::CreateAllocationCommand;
use super::commands::project::NewProjectCommand;
use super::commands::team_member::NewTeamMemberCommand;
use super::error::{ScheduleError, ScheduleResult, SyncOutcome, ValidationError};
use super::models::{
    Allocation, AllocationPatch, Entity, Percentage, Project, ProjectPatch, TeamMember, TeamMemberPatch,
};
use crate::backend::config::TimelineConfig;
use crate::backend::storage::{IdentityProvider, RemoteEntity, RemoteRepository, RowStore};

/// Characters left unescaped in avatar query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The authoritative in-memory entity collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommittedState {
    pub team_members: Vec<TeamMember>,
    pub projects: Vec<Project>,
    pub allocations: Vec<Allocation>,
}

/// Selects the committed-state collection an entity lives in
trait Stored: RemoteEntity {
    fn collection(state: &CommittedState) -> &Vec<Self>;
    fn collection_mut(state: &mut CommittedState) -> &mut Vec<Self>;
}

impl Stored for TeamMember {
    fn collection(state: &CommittedState) -> &Vec<Self> {
        &state.team_members
    }

    fn collection_mut(state: &mut CommittedState) -> &mut Vec<Self> {
        &mut state.team_members
    }
}

impl Stored for Project {
    fn collection(state: &CommittedState) -> &Vec<Self> {
        &state.projects
    }

    fn collection_mut(state: &mut CommittedState) -> &mut Vec<Self> {
        &mut state.projects
    }
}

impl Stored for Allocation {
    fn collection(state: &CommittedState) -> &Vec<Self> {
        &state.allocations
    }

    fn collection_mut(state: &mut CommittedState) -> &mut Vec<Self> {
        &mut state.allocations
    }
}

pub struct ScheduleStore<S: RowStore, I: IdentityProvider> {
    state: Mutex<CommittedState>,
    repository: RemoteRepository<S>,
    identity: Arc<I>,
    config: TimelineConfig,
    loading: AtomicBool,
    initialized: AtomicBool,
    /// Rows left out of the last fetch because they could not be read
    skipped_rows: AtomicUsize,
}

impl<S: RowStore, I: IdentityProvider> ScheduleStore<S, I> {
    pub fn new(config: TimelineConfig, store: Arc<S>, identity: Arc<I>) -> Self {
        Self {
            state: Mutex::new(CommittedState::default()),
            repository: RemoteRepository::new(store),
            identity,
            config,
            loading: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            skipped_rows: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, CommittedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current user id, or `NotAuthenticated` without any remote call
    fn require_user(&self) -> ScheduleResult<String> {
        self.identity.current_user().ok_or(ScheduleError::NotAuthenticated)
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn identity(&self) -> &Arc<I> {
        &self.identity
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> CommittedState {
        self.state().clone()
    }

    pub fn team_members(&self) -> Vec<TeamMember> {
        self.state().team_members.clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.state().projects.clone()
    }

    pub fn allocations(&self) -> Vec<Allocation> {
        self.state().allocations.clone()
    }

    pub fn allocation(&self, id: &str) -> Option<Allocation> {
        self.find::<Allocation>(id)
    }

    pub fn project(&self, id: &str) -> Option<Project> {
        self.find::<Project>(id)
    }

    pub fn team_member(&self, id: &str) -> Option<TeamMember> {
        self.find::<TeamMember>(id)
    }

    fn find<E: Stored>(&self, id: &str) -> Option<E> {
        E::collection(&self.state())
            .iter()
            .find(|entity| entity.id() == id)
            .cloned()
    }

    /// Drop all committed state, as on sign-out
    pub fn clear(&self) {
        *self.state() = CommittedState::default();
        self.initialized.store(false, Ordering::SeqCst);
        self.skipped_rows.store(0, Ordering::SeqCst);
        info!("Committed state cleared");
    }

    /// Load all three tables for the current user and replace committed state
    pub async fn fetch_user_data(&self) -> ScheduleResult<()> {
        let user_id = self.require_user()?;
        self.loading.store(true, Ordering::SeqCst);

        let result = tokio::try_join!(
            self.repository.list::<TeamMember>(&user_id),
            self.repository.list::<Project>(&user_id),
            self.repository.list::<Allocation>(&user_id),
        );
        self.loading.store(false, Ordering::SeqCst);

        let (team_members, projects, allocations) = result.map_err(|e| {
            error!("Failed to fetch schedule for {}: {}", user_id, e);
            ScheduleError::Remote(e)
        })?;

        info!(
            "📥 Loaded {} team members, {} projects, {} allocations",
            team_members.entities.len(),
            projects.entities.len(),
            allocations.entities.len()
        );

        let skipped = team_members.skipped + projects.skipped + allocations.skipped;
        if skipped > 0 {
            warn!("{} rows for {} could not be read and are hidden", skipped, user_id);
        }
        self.skipped_rows.store(skipped, Ordering::SeqCst);

        *self.state() = CommittedState {
            team_members: team_members.entities,
            projects: projects.entities,
            allocations: allocations.entities,
        };
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn optimistic_insert<E: Stored>(&self, entity: E) -> ScheduleResult<SyncOutcome<E>> {
        let user_id = self.require_user()?;
        entity.validate()?;

        E::collection_mut(&mut self.state()).push(entity.clone());
        info!("Added {} {} locally", E::KIND, entity.id());

        if let Err(e) = self.repository.insert(&user_id, &entity).await {
            error!("Failed to add {} {}: {}", E::KIND, entity.id(), e);
            E::collection_mut(&mut self.state()).retain(|existing| existing.id() != entity.id());
            warn!("Rolled back add of {} {}", E::KIND, entity.id());
            return Ok(SyncOutcome::RolledBack {
                reason: e.to_string(),
            });
        }

        Ok(SyncOutcome::Committed(entity))
    }

    async fn optimistic_update<E: Stored>(&self, id: &str, patch: E::Patch) -> ScheduleResult<SyncOutcome<E>> {
        let user_id = self.require_user()?;

        let previous = self.find::<E>(id).ok_or_else(|| ScheduleError::NotFound {
            entity: E::KIND,
            id: id.to_string(),
        })?;
        let mut updated = previous.clone();
        updated.apply_patch(&patch);
        updated.validate()?;

        self.replace_local(updated.clone());
        info!("Updated {} {} locally", E::KIND, id);

        if let Err(e) = self.repository.update::<E>(&user_id, id, &patch).await {
            error!("Failed to update {} {}: {}", E::KIND, id, e);
            self.resync_after_failed_update(previous).await;
            return Ok(SyncOutcome::RolledBack {
                reason: e.to_string(),
            });
        }

        Ok(SyncOutcome::Committed(updated))
    }

    async fn resync_after_failed_update<E: Stored>(&self, previous: E) {
        match self.fetch_user_data().await {
            Ok(()) => warn!("Resynchronized state after failed {} update", E::KIND),
            Err(e) => {
                warn!("Re-fetch failed ({}), restoring previous {} {}", e, E::KIND, previous.id());
                self.replace_local(previous);
            }
        }
    }

    fn replace_local<E: Stored>(&self, entity: E) {
        let mut state = self.state();
        if let Some(slot) = E::collection_mut(&mut state)
            .iter_mut()
            .find(|existing| existing.id() == entity.id())
        {
            *slot = entity;
        }
    }

    async fn optimistic_remove<E: Stored>(&self, id: &str) -> ScheduleResult<SyncOutcome<E>> {
        let user_id = self.require_user()?;

        let (index, removed) = {
            let mut state = self.state();
            let collection = E::collection_mut(&mut state);
            let index = collection
                .iter()
                .position(|entity| entity.id() == id)
                .ok_or_else(|| ScheduleError::NotFound {
                    entity: E::KIND,
                    id: id.to_string(),
                })?;
            (index, collection.remove(index))
        };
        info!("Removed {} {} locally", E::KIND, id);

        if let Err(e) = self.repository.delete::<E>(&user_id, id).await {
            error!("Failed to remove {} {}: {}", E::KIND, id, e);
            let mut state = self.state();
            let collection = E::collection_mut(&mut state);
            let index = index.min(collection.len());
            collection.insert(index, removed);
            warn!("Rolled back removal of {} {}", E::KIND, id);
            return Ok(SyncOutcome::RolledBack {
                reason: e.to_string(),
            });
        }

        Ok(SyncOutcome::Committed(removed))
    }

    /// `<avatar_base_url>?name=<name>&background=random`
    pub fn avatar_url(&self, name: &str) -> String {
        format!(
            "{}?name={}&background=random",
            self.config.avatar_base_url,
            utf8_percent_encode(name, QUERY_VALUE)
        )
    }

    pub async fn add_team_member(&self, command: NewTeamMemberCommand) -> ScheduleResult<SyncOutcome<TeamMember>> {
        let name = command.name.trim();
        let role = command.role.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if role.is_empty() {
            return Err(ValidationError::EmptyRole.into());
        }

        let member = TeamMember {
            id: TeamMember::generate_id(),
            name: name.to_string(),
            role: role.to_string(),
            avatar: self.avatar_url(name),
        };
        self.optimistic_insert(member).await
    }

    pub async fn update_team_member(&self, id: &str, patch: TeamMemberPatch) -> ScheduleResult<SyncOutcome<TeamMember>> {
        self.optimistic_update(id, patch).await
    }

    /// Allocations referencing the member are kept
    pub async fn remove_team_member(&self, id: &str) -> ScheduleResult<SyncOutcome<TeamMember>> {
        self.optimistic_remove(id).await
    }

    pub async fn add_project(&self, command: NewProjectCommand) -> ScheduleResult<SyncOutcome<Project>> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let color = command
            .color
            .map(|color| color.trim().to_string())
            .unwrap_or_else(|| self.config.default_project_color.clone());

        let project = Project {
            id: Project::generate_id(),
            name: name.to_string(),
            color,
        };
        self.optimistic_insert(project).await
    }

    pub async fn update_project(&self, id: &str, patch: ProjectPatch) -> ScheduleResult<SyncOutcome<Project>> {
        self.optimistic_update(id, patch).await
    }

    /// Allocations referencing the project are kept
    pub async fn remove_project(&self, id: &str) -> ScheduleResult<SyncOutcome<Project>> {
        self.optimistic_remove(id).await
    }

    /// New allocation from a cell click: default length, full time
    pub async fn create_allocation(&self, command: CreateAllocationCommand) -> ScheduleResult<SyncOutcome<Allocation>> {
        let project_id = command
            .project_id
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::NoProjectSelected)?;

        let extra_days = i64::from(self.config.default_allocation_days.saturating_sub(1));
        let end_date = command
            .start_date
            .checked_add_signed(Duration::days(extra_days))
            .ok_or(ValidationError::InvalidDateRange)?;

        let allocation = Allocation {
            id: Allocation::generate_id(),
            team_member_id: command.team_member_id,
            project_id,
            start_date: command.start_date,
            end_date,
            percentage: Percentage::Full,
        };
        self.add_allocation(allocation).await
    }

    pub async fn add_allocation(&self, allocation: Allocation) -> ScheduleResult<SyncOutcome<Allocation>> {
        self.optimistic_insert(allocation).await
    }

    pub async fn update_allocation(&self, id: &str, patch: AllocationPatch) -> ScheduleResult<SyncOutcome<Allocation>> {
        self.optimistic_update(id, patch).await
    }

    pub async fn remove_allocation(&self, id: &str) -> ScheduleResult<SyncOutcome<Allocation>> {
        self.optimistic_remove(id).await
    }

    /// Flip between 50 and 100
    pub async fn toggle_percentage(&self, id: &str) -> ScheduleResult<SyncOutcome<Allocation>> {
        let current = self.allocation(id).ok_or_else(|| ScheduleError::NotFound {
            entity: Allocation::KIND,
            id: id.to_string(),
        })?;
        let patch = AllocationPatch::percentage(current.percentage.toggled());
        self.update_allocation(id, patch).await
    }
}
