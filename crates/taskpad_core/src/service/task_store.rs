//! Task store: mutation API, derived view access and persistence sync.
//!
//! # Responsibility
//! - Own the task collection, add-form draft, edit buffer and search text.
//! - Bootstrap the collection from the persistence slot or a seed.
//! - Mirror every collection change to the persistence slot once ready.
//!
//! # Invariants
//! - The store is `Loading` until `bootstrap` resolves, then `Ready` for the
//!   rest of the session. There is no way back to `Loading`.
//! - No slot write happens while `Loading`.
//! - Mutations while `Loading` are rejected without touching state.
//! - Every task holds a unique id; fresh ids are strictly increasing.
//! - A completed task never enters the edit buffer.
//! - Draft, edit buffer and search text changes are never persisted.

use crate::config::StoreConfig;
use crate::model::id_gen::IdGenerator;
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskValidationError};
use crate::seed::SeedProvider;
use crate::slot::{PersistenceSlot, SlotError};
use crate::view::{derive_rows, derive_view, TaskRow};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Readiness of a task store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Bootstrap has not resolved yet; sync is suppressed.
    Loading,
    /// Terminal state; mutations and sync are active.
    Ready,
}

/// Working copy of a task being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEditBuffer {
    task: Task,
}

impl TaskEditBuffer {
    pub fn task_id(&self) -> TaskId {
        self.task.id
    }

    pub fn task(&self) -> &Task {
        &self.task
    }
}

/// Edit mode of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(TaskEditBuffer),
}

impl EditState {
    pub fn buffer(&self) -> Option<&TaskEditBuffer> {
        match self {
            Self::Idle => None,
            Self::Editing(buffer) => Some(buffer),
        }
    }
}

/// Where the bootstrapped collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapSource {
    /// Parsed from the persistence slot.
    Persisted,
    /// Slot was empty; seed used.
    Seed,
    /// Slot held an unparsable or invalid payload, or could not be read;
    /// seed used.
    SeedAfterUnreadable,
}

/// Non-error result of a mutation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// State changed.
    Applied,
    /// Target missing or nothing to do; state unchanged.
    NoOp,
    /// User declined the confirmation; state unchanged.
    Declined,
}

/// Failures reported by task store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Draft input failed creation-time validation.
    Validation(TaskValidationError),
    /// Completed tasks cannot be edited.
    CompletedTaskNotEditable(TaskId),
    /// Mutation attempted before bootstrap resolved.
    NotReady,
    /// `bootstrap` called on a store that is already ready.
    AlreadyReady,
    /// No unused task id is left.
    IdsExhausted,
    /// The in-memory change was applied but writing it to the slot failed.
    Sync(SlotError),
    /// Collection could not be serialized for the slot.
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CompletedTaskNotEditable(_) => write!(f, "You can't edit a completed task"),
            Self::NotReady => write!(f, "task store is still loading"),
            Self::AlreadyReady => write!(f, "task store is already bootstrapped"),
            Self::IdsExhausted => write!(f, "no task ids left to assign"),
            Self::Sync(err) => write!(f, "failed to persist tasks: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize tasks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Sync(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::CompletedTaskNotEditable(_)
            | Self::NotReady
            | Self::AlreadyReady
            | Self::IdsExhausted => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SlotError> for StoreError {
    fn from(value: SlotError) -> Self {
        Self::Sync(value)
    }
}

/// Single owner of the task collection and its persisted mirror.
pub struct TaskStore<S: PersistenceSlot> {
    slot: S,
    config: StoreConfig,
    ids: IdGenerator,
    state: StoreState,
    tasks: Vec<Task>,
    draft: TaskDraft,
    edit: EditState,
    search_text: String,
}

impl<S: PersistenceSlot> TaskStore<S> {
    /// Creates a `Loading` store with default config.
    pub fn new(slot: S) -> Self {
        Self::with_config(slot, StoreConfig::default())
    }

    /// Creates a `Loading` store; the ID generator starts at `config.id_base`.
    pub fn with_config(slot: S, config: StoreConfig) -> Self {
        Self {
            slot,
            ids: IdGenerator::with_base(config.id_base),
            config,
            state: StoreState::Loading,
            tasks: Vec::new(),
            draft: TaskDraft::default(),
            edit: EditState::Idle,
            search_text: String::new(),
        }
    }

    /// Resolves the initial collection and transitions `Loading -> Ready`.
    ///
    /// Loads the slot under the configured key. A missing value, an
    /// unparsable payload or a slot read failure all fall back to `seed`;
    /// the latter two are logged. After the transition the resolved
    /// collection is written once to the slot.
    ///
    /// # Errors
    /// - [`StoreError::AlreadyReady`] on a second call; state untouched.
    /// - [`StoreError::Sync`] when the first write fails. The store is still
    ///   `Ready` with the resolved collection.
    pub fn bootstrap<P: SeedProvider + ?Sized>(
        &mut self,
        seed: &P,
    ) -> StoreResult<BootstrapSource> {
        if self.state == StoreState::Ready {
            return Err(StoreError::AlreadyReady);
        }

        let (tasks, source) = self.resolve_initial_tasks(seed);
        if let Some(max_id) = tasks.iter().map(|task| task.id).max() {
            self.ids.reserve_through(max_id);
        }
        self.tasks = tasks;
        self.state = StoreState::Ready;
        info!(
            "event=store_bootstrap module=store status=ok source={:?} task_count={}",
            source,
            self.tasks.len()
        );

        self.sync()?;
        Ok(source)
    }

    fn resolve_initial_tasks<P: SeedProvider + ?Sized>(
        &self,
        seed: &P,
    ) -> (Vec<Task>, BootstrapSource) {
        match self.slot.load(&self.config.slot_key) {
            Ok(Some(payload)) => match decode_tasks(&payload) {
                Ok(tasks) => (tasks, BootstrapSource::Persisted),
                Err(err) => {
                    error!(
                        "event=store_bootstrap module=store status=error error_code=payload_unparsable error={}",
                        err
                    );
                    (seed.seed_tasks(), BootstrapSource::SeedAfterUnreadable)
                }
            },
            Ok(None) => (seed.seed_tasks(), BootstrapSource::Seed),
            Err(err) => {
                error!(
                    "event=store_bootstrap module=store status=error error_code=slot_load_failed error={}",
                    err
                );
                (seed.seed_tasks(), BootstrapSource::SeedAfterUnreadable)
            }
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == StoreState::Loading
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    /// Merges partial field changes into the add-form draft.
    pub fn update_draft(&mut self, patch: &TaskPatch) {
        self.draft.apply_patch(patch);
    }

    /// Creates a task from the store's add-form draft.
    ///
    /// On success the draft is cleared and the new id returned. On a
    /// validation failure the draft is kept so the user can fix it.
    pub fn add_task(&mut self) -> StoreResult<TaskId> {
        let mut draft = std::mem::take(&mut self.draft);
        let result = self.add(&mut draft);
        self.draft = draft;
        result
    }

    /// Creates a task from a caller-held draft.
    ///
    /// Resets `draft` to its default on success and leaves it untouched on
    /// failure.
    ///
    /// # Errors
    /// - [`StoreError::NotReady`] while loading.
    /// - [`StoreError::Validation`] when the trimmed title is empty.
    /// - [`StoreError::IdsExhausted`] when the id space is used up; nothing
    ///   changes.
    /// - [`StoreError::Sync`] when the slot write fails; the task is still
    ///   added in memory.
    pub fn add(&mut self, draft: &mut TaskDraft) -> StoreResult<TaskId> {
        self.ensure_ready()?;
        if let Err(err) = draft.validate() {
            warn!("event=task_add module=store status=rejected reason={:?}", err);
            return Err(err.into());
        }

        let Some(id) = self.ids.next() else {
            warn!("event=task_add module=store status=rejected reason=ids_exhausted");
            return Err(StoreError::IdsExhausted);
        };
        let task = Task::from_draft(id, draft)?;
        self.tasks.push(task);
        draft.clear();
        debug!("event=task_add module=store status=ok task_id={id}");

        self.sync()?;
        Ok(id)
    }

    /// Removes a task after the user confirms.
    ///
    /// `confirm` is asked only when the task exists. Declining leaves the
    /// collection untouched.
    pub fn delete_task(
        &mut self,
        id: TaskId,
        confirm: impl FnOnce(&Task) -> bool,
    ) -> StoreResult<MutationOutcome> {
        self.ensure_ready()?;
        let Some(index) = self.position(id) else {
            return Ok(MutationOutcome::NoOp);
        };
        if !confirm(&self.tasks[index]) {
            debug!("event=task_delete module=store status=declined task_id={id}");
            return Ok(MutationOutcome::Declined);
        }

        self.tasks.remove(index);
        debug!("event=task_delete module=store status=ok task_id={id}");
        self.sync()?;
        Ok(MutationOutcome::Applied)
    }

    /// Flips the completion flag of one task.
    pub fn toggle_complete(&mut self, id: TaskId) -> StoreResult<MutationOutcome> {
        self.ensure_ready()?;
        let Some(index) = self.position(id) else {
            return Ok(MutationOutcome::NoOp);
        };

        self.tasks[index].toggle_completed();
        debug!(
            "event=task_toggle module=store status=ok task_id={} completed={}",
            id, self.tasks[index].completed
        );
        self.sync()?;
        Ok(MutationOutcome::Applied)
    }

    /// Opens the edit buffer with a copy of the task.
    ///
    /// Replaces any buffer already open.
    ///
    /// # Errors
    /// - [`StoreError::CompletedTaskNotEditable`] when the task is completed.
    pub fn start_edit(&mut self, id: TaskId) -> StoreResult<MutationOutcome> {
        self.ensure_ready()?;
        let Some(task) = self.task(id) else {
            return Ok(MutationOutcome::NoOp);
        };
        if !task.is_editable() {
            warn!("event=task_edit_start module=store status=rejected task_id={id} reason=completed");
            return Err(StoreError::CompletedTaskNotEditable(id));
        }

        let buffer = TaskEditBuffer { task: task.clone() };
        self.edit = EditState::Editing(buffer);
        Ok(MutationOutcome::Applied)
    }

    /// Merges partial field changes into the open edit buffer.
    pub fn update_edit_buffer(&mut self, patch: &TaskPatch) -> MutationOutcome {
        match &mut self.edit {
            EditState::Idle => MutationOutcome::NoOp,
            EditState::Editing(buffer) => {
                buffer.task.apply_patch(patch);
                MutationOutcome::Applied
            }
        }
    }

    /// Commits the edit buffer over the task with the same id and closes it.
    ///
    /// When the task was removed while editing, the buffer is just closed.
    pub fn save_edit(&mut self) -> StoreResult<MutationOutcome> {
        self.ensure_ready()?;
        let EditState::Editing(buffer) = std::mem::take(&mut self.edit) else {
            return Ok(MutationOutcome::NoOp);
        };

        let id = buffer.task.id;
        let Some(index) = self.position(id) else {
            debug!("event=task_edit_save module=store status=noop task_id={id}");
            return Ok(MutationOutcome::NoOp);
        };
        self.tasks[index] = buffer.task;
        debug!("event=task_edit_save module=store status=ok task_id={id}");
        self.sync()?;
        Ok(MutationOutcome::Applied)
    }

    /// Discards the edit buffer.
    pub fn cancel_edit(&mut self) -> MutationOutcome {
        match std::mem::take(&mut self.edit) {
            EditState::Idle => MutationOutcome::NoOp,
            EditState::Editing(_) => MutationOutcome::Applied,
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Filtered, sorted projection of the collection for display.
    pub fn visible_tasks(&self) -> Vec<Task> {
        derive_view(&self.tasks, &self.search_text)
    }

    /// Display rows for the current view, flagging the task being edited.
    pub fn rows(&self) -> Vec<TaskRow> {
        let editing = self.edit.buffer().map(TaskEditBuffer::task_id);
        derive_rows(&self.tasks, &self.search_text, editing)
    }

    fn ensure_ready(&self) -> StoreResult<()> {
        match self.state {
            StoreState::Ready => Ok(()),
            StoreState::Loading => {
                warn!("event=store_mutation module=store status=rejected reason=not_ready");
                Err(StoreError::NotReady)
            }
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn sync(&mut self) -> StoreResult<()> {
        if self.state != StoreState::Ready {
            return Ok(());
        }

        let payload = encode_tasks(&self.tasks).map_err(StoreError::Serialize)?;
        if let Err(err) = self.slot.save(&self.config.slot_key, &payload) {
            error!(
                "event=store_sync module=store status=error task_count={} error={}",
                self.tasks.len(),
                err
            );
            return Err(err.into());
        }
        debug!(
            "event=store_sync module=store status=ok task_count={}",
            self.tasks.len()
        );
        Ok(())
    }
}

/// Serializes a collection into the slot payload (JSON array).
pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

/// Reasons a slot payload is not a valid task collection.
#[derive(Debug)]
pub enum PayloadError {
    Json(serde_json::Error),
    /// Two records share the same id.
    DuplicateId(TaskId),
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "duplicate task id {id}"),
        }
    }
}

impl Error for PayloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

/// Parses a slot payload back into a collection.
///
/// # Errors
/// - [`PayloadError::Json`] when the payload is not a list of complete task
///   records.
/// - [`PayloadError::DuplicateId`] when an id appears more than once.
pub fn decode_tasks(payload: &str) -> Result<Vec<Task>, PayloadError> {
    let tasks: Vec<Task> = serde_json::from_str(payload).map_err(PayloadError::Json)?;
    let mut seen = HashSet::with_capacity(tasks.len());
    if let Some(task) = tasks.iter().find(|task| !seen.insert(task.id)) {
        return Err(PayloadError::DuplicateId(task.id));
    }
    Ok(tasks)
}
