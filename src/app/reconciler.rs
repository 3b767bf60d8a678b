//! Dirty-state reconciliation between the editor and the config store.
//!
//! The reconciler owns two snapshots of the loaded app's config tree:
//! `original` (the last persisted copy) and `current` (the working copy).
//! `original` is replaced only by a successful save or a (re)load;
//! `current` diverges from it only through explicit edit operations.
//!
//! "Has unsaved changes" is structural deep-equality of the two snapshots
//! OR-ed with an explicit side-channel flag. The flag covers edits that do
//! not live inside the tree at all (the App Details draft), so a tree
//! edit that happens to restore the original content while a details edit
//! is still pending keeps the state dirty. The flip side holds too: a
//! no-op write-back through the tree editor alone never dirties the state.
//!
//! Exactly one save may be in flight. Edits made while saving keep
//! mutating `current` and ride along with the next save; the store is
//! last-writer-wins and the reconciler makes no attempt to merge.

use serde_json::Value;
use tracing::{debug, info};

use crate::app::apps::AppFieldsUpdate;
use crate::app::config_store::StoreError;
use crate::app::config_tree::{self, EditPath};

/// Synchronization state derived from the snapshots and save lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Working copy matches the persisted copy and no draft is pending.
    #[default]
    Clean,
    /// Unsaved changes exist.
    Dirty,
    /// A save is in flight; the save control is disabled.
    Saving,
    /// The last save failed; edits are preserved and the save can be
    /// re-triggered with the same payload.
    Error,
}

/// Answer to a request to select a different app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchRequest {
    /// Nothing unsaved; the caller may load the target immediately.
    Granted,
    /// Unsaved changes exist; the caller must show the confirmation gate
    /// and come back through [`ConfigReconciler::confirm_switch`] or
    /// [`ConfigReconciler::cancel_switch`].
    NeedsConfirmation,
}

/// Everything a save writes back: the full working tree plus any pending
/// app-record fields from the details draft.
#[derive(Debug, Clone)]
pub struct SavePayload {
    pub app_id: String,
    pub tree: Value,
    pub details: Option<AppFieldsUpdate>,
}

#[derive(Default)]
pub struct ConfigReconciler {
    app_id: Option<String>,
    original: Value,
    current: Value,
    details_draft: AppFieldsUpdate,
    side_channel_dirty: bool,
    saving: bool,
    last_error: Option<String>,
    pending_switch: Option<String>,
}

impl ConfigReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a freshly fetched tree for an app. Both snapshots take the
    /// fetched value and all pending edit state is cleared.
    pub fn load(&mut self, app_id: &str, tree: Value) {
        debug!("loading config for {}", app_id);
        self.app_id = Some(app_id.to_string());
        self.original = tree.clone();
        self.current = tree;
        self.details_draft = AppFieldsUpdate::default();
        self.side_channel_dirty = false;
        self.saving = false;
        self.last_error = None;
        self.pending_switch = None;
    }

    /// Drop the loaded app entirely (e.g. after it was deleted).
    pub fn unload(&mut self) {
        *self = Self::default();
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn current(&self) -> &Value {
        &self.current
    }

    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn details_draft(&self) -> &AppFieldsUpdate {
        &self.details_draft
    }

    pub fn state(&self) -> SyncState {
        if self.saving {
            SyncState::Saving
        } else if self.last_error.is_some() {
            SyncState::Error
        } else if self.has_unsaved_changes() {
            SyncState::Dirty
        } else {
            SyncState::Clean
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Deep-equality of the serialized snapshots OR-ed with the explicit
    /// side-channel flag.
    pub fn has_unsaved_changes(&self) -> bool {
        !config_tree::trees_equal(&self.current, &self.original) || self.side_channel_dirty
    }

    /// Write an edited value into the working copy. The original snapshot
    /// is untouched; dirtiness follows from actual divergence, so writing
    /// a value back over itself does not dirty a clean state.
    pub fn apply_edit(&mut self, path: &EditPath, value: Value) {
        if self.app_id.is_none() {
            return;
        }
        self.current = config_tree::apply_edit(&self.current, path, value);
    }

    /// Replace a whole subtree, used by tab regeneration and the raw JSON
    /// editor.
    pub fn replace_subtree(&mut self, path: &EditPath, subtree: Value) {
        self.apply_edit(path, subtree);
    }

    /// Record an App Details edit. These live outside the config tree, so
    /// they raise the explicit dirty flag.
    pub fn edit_details(&mut self, merge: impl FnOnce(&mut AppFieldsUpdate)) {
        if self.app_id.is_none() {
            return;
        }
        merge(&mut self.details_draft);
        self.side_channel_dirty = true;
    }

    /// Begin a save. Returns the payload to hand to the store, or `None`
    /// when there is nothing to save or a save is already in flight.
    pub fn begin_save(&mut self) -> Option<SavePayload> {
        let app_id = self.app_id.clone()?;
        if self.saving || !self.has_unsaved_changes() {
            return None;
        }
        self.saving = true;
        info!("saving config for {}", app_id);
        Some(SavePayload {
            app_id,
            tree: self.current.clone(),
            details: if self.details_draft.is_empty() {
                None
            } else {
                Some(self.details_draft.clone())
            },
        })
    }

    /// Finish the in-flight save. On success the persisted snapshot
    /// becomes a deep copy of the saved tree and the details draft is
    /// cleared; on failure all edits stay in place and the error is kept
    /// for surfacing.
    pub fn complete_save(&mut self, saved_tree: &Value, result: Result<(), StoreError>) {
        self.saving = false;
        match result {
            Ok(()) => {
                self.original = saved_tree.clone();
                // Edits that arrived while the save was in flight stay in
                // `current` and keep the state dirty for the next save.
                self.details_draft = AppFieldsUpdate::default();
                self.side_channel_dirty = false;
                self.last_error = None;
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Discard all unsaved changes: the working copy becomes a deep copy
    /// of the persisted one and the details draft is dropped. Invoking
    /// discard on a clean state is a no-op.
    pub fn discard(&mut self) {
        if self.saving {
            return;
        }
        self.current = self.original.clone();
        self.details_draft = AppFieldsUpdate::default();
        self.side_channel_dirty = false;
        self.last_error = None;
    }

    /// Ask to select another app. With unsaved changes this arms the
    /// confirmation gate instead of granting the switch.
    pub fn request_switch(&mut self, target_app_id: &str) -> SwitchRequest {
        if self.app_id.as_deref() == Some(target_app_id) {
            self.pending_switch = None;
            return SwitchRequest::Granted;
        }
        if self.has_unsaved_changes() || self.saving {
            self.pending_switch = Some(target_app_id.to_string());
            SwitchRequest::NeedsConfirmation
        } else {
            SwitchRequest::Granted
        }
    }

    /// The app id awaiting confirmation, if the gate is armed.
    pub fn pending_switch(&self) -> Option<&str> {
        self.pending_switch.as_deref()
    }

    /// Confirm the pending switch: all unsaved state is dropped and the
    /// target id is returned so the caller can initiate its load.
    pub fn confirm_switch(&mut self) -> Option<String> {
        let target = self.pending_switch.take()?;
        info!("discarding unsaved changes to switch to {}", target);
        self.app_id = None;
        self.original = Value::Null;
        self.current = Value::Null;
        self.details_draft = AppFieldsUpdate::default();
        self.side_channel_dirty = false;
        self.saving = false;
        self.last_error = None;
        Some(target)
    }

    /// Cancel the pending switch; selection and edits stay untouched.
    pub fn cancel_switch(&mut self) {
        self.pending_switch = None;
    }
}
