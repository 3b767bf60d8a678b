//! Schema-less form editor over a config subtree.
//!
//! Renders widgets for an arbitrary JSON subtree by classifying each node
//! into a [`FieldValue`] and matching on the result: checkboxes for
//! booleans, numeric inputs for numbers, single- or multi-line text for
//! strings, a repeated sub-editor per array element, and an indented
//! section per nested mapping. Labels come from the humanization
//! transform.
//!
//! Edits are buffered locally and handed to the owner only after a short
//! debounce window so typing does not storm the reconciler with one
//! update per keystroke. The timer resets on every keystroke. Pending
//! edits are flushed, not dropped, when the editor is torn down or the
//! owner is about to save or switch apps.
//!
//! Locked mode disables every input without changing the rendered shape.

use eframe::egui;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::app::config_tree::{classify, humanize_key, value_at, EditPath, FieldValue};

/// Quiet period after the last keystroke before an edit propagates.
pub const EDIT_DEBOUNCE: Duration = Duration::from_millis(300);

/// One edit ready to be written into the working tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEdit {
    pub path: EditPath,
    pub value: Value,
}

struct PendingEdit {
    path: EditPath,
    value: Value,
    last_keystroke: Instant,
}

#[derive(Default)]
pub struct TreeEditor {
    /// In-progress text per field, keyed by path. Kept authoritative
    /// while the user types; cleared by [`TreeEditor::reset`].
    text_buffers: HashMap<String, String>,
    /// The one edit still inside its debounce window.
    pending: Option<PendingEdit>,
    /// Edits past their debounce window (or committed immediately),
    /// waiting for the owner to drain them.
    ready: Vec<TreeEdit>,
}

impl TreeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all per-field buffers and unsent edits. Called when the
    /// underlying tree is replaced wholesale: load, discard, regenerate.
    pub fn reset(&mut self) {
        self.text_buffers.clear();
        self.pending = None;
        self.ready.clear();
    }

    /// Edits whose debounce window has elapsed. Call once per frame.
    pub fn take_ready(&mut self) -> Vec<TreeEdit> {
        let elapsed = self
            .pending
            .as_ref()
            .is_some_and(|p| p.last_keystroke.elapsed() >= EDIT_DEBOUNCE);
        if elapsed {
            if let Some(pending) = self.pending.take() {
                self.ready.push(TreeEdit {
                    path: pending.path,
                    value: pending.value,
                });
            }
        }
        std::mem::take(&mut self.ready)
    }

    /// Flush everything regardless of the debounce timer. Called before
    /// save, before an app switch, and on teardown so the last keystroke
    /// is never silently dropped.
    pub fn flush(&mut self) -> Vec<TreeEdit> {
        if let Some(pending) = self.pending.take() {
            self.ready.push(TreeEdit {
                path: pending.path,
                value: pending.value,
            });
        }
        std::mem::take(&mut self.ready)
    }

    /// Whether an edit is still waiting out its debounce window.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some() || !self.ready.is_empty()
    }

    /// Render the subtree of `root` at `base`. An absent subtree renders
    /// as an empty section rather than failing.
    pub fn ui(&mut self, ui: &mut egui::Ui, root: &Value, base: &EditPath, locked: bool) {
        let subtree = value_at(root, base).cloned().unwrap_or(Value::Null);
        let key = base.leaf().unwrap_or("");
        let field = classify(key, &subtree);
        match &field {
            FieldValue::Object(entries) => {
                // Top level of a tab renders flat, without a section header.
                for (child_key, child) in entries {
                    self.field_ui(ui, &base.child(child_key), child_key, child, locked, 0);
                }
                if entries.is_empty() {
                    ui.weak("No fields yet");
                }
            }
            other => self.field_ui(ui, base, key, other, locked, 0),
        }
    }

    fn field_ui(
        &mut self,
        ui: &mut egui::Ui,
        path: &EditPath,
        key: &str,
        field: &FieldValue,
        locked: bool,
        depth: usize,
    ) {
        let label = humanize_key(key);
        match field {
            FieldValue::Bool(value) => {
                let mut checked = *value;
                ui.horizontal(|ui| {
                    let response = ui.add_enabled(!locked, egui::Checkbox::new(&mut checked, ""));
                    ui.label(&label);
                    if response.changed() {
                        self.commit_now(path.clone(), Value::Bool(checked));
                    }
                });
            }
            FieldValue::Number(value) => {
                let mut number = *value;
                ui.horizontal(|ui| {
                    ui.label(&label);
                    let response =
                        ui.add_enabled(!locked, egui::DragValue::new(&mut number).speed(1.0));
                    if response.changed() {
                        self.queue_debounced(path.clone(), FieldValue::Number(number).to_json());
                    }
                });
            }
            FieldValue::Text(value) => {
                let buffer = self
                    .text_buffers
                    .entry(path.to_string())
                    .or_insert_with(|| value.clone());
                let mut edited = buffer.clone();
                ui.horizontal(|ui| {
                    ui.label(&label);
                    let response = ui.add_enabled(
                        !locked,
                        egui::TextEdit::singleline(&mut edited).desired_width(280.0),
                    );
                    if response.changed() {
                        self.text_buffers.insert(path.to_string(), edited.clone());
                        self.queue_debounced(path.clone(), Value::String(edited));
                    }
                });
            }
            FieldValue::LongText(value) => {
                let buffer = self
                    .text_buffers
                    .entry(path.to_string())
                    .or_insert_with(|| value.clone());
                let mut edited = buffer.clone();
                ui.label(&label);
                let response = ui.add_enabled(
                    !locked,
                    egui::TextEdit::multiline(&mut edited)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.text_buffers.insert(path.to_string(), edited.clone());
                    self.queue_debounced(path.clone(), Value::String(edited));
                }
            }
            FieldValue::Array(items) => {
                egui::CollapsingHeader::new(format!("{} ({})", label, items.len()))
                    .id_salt(path.to_string())
                    .default_open(depth == 0)
                    .show(ui, |ui| {
                        for (idx, item) in items.iter().enumerate() {
                            let item_path = path.index(idx);
                            match item {
                                FieldValue::Object(entries) => {
                                    egui::CollapsingHeader::new(format!("{} {}", label, idx + 1))
                                        .id_salt(item_path.to_string())
                                        .show(ui, |ui| {
                                            for (child_key, child) in entries {
                                                self.field_ui(
                                                    ui,
                                                    &item_path.child(child_key),
                                                    child_key,
                                                    child,
                                                    locked,
                                                    depth + 1,
                                                );
                                            }
                                        });
                                }
                                other => {
                                    self.field_ui(
                                        ui,
                                        &item_path,
                                        &format!("{} {}", key, idx + 1),
                                        other,
                                        locked,
                                        depth + 1,
                                    );
                                }
                            }
                        }
                        if items.is_empty() {
                            ui.weak("Empty list");
                        }
                    });
            }
            FieldValue::Object(entries) => {
                egui::CollapsingHeader::new(label)
                    .id_salt(path.to_string())
                    .default_open(depth == 0)
                    .show(ui, |ui| {
                        ui.indent(path.to_string(), |ui| {
                            for (child_key, child) in entries {
                                self.field_ui(
                                    ui,
                                    &path.child(child_key),
                                    child_key,
                                    child,
                                    locked,
                                    depth + 1,
                                );
                            }
                        });
                    });
            }
        }
    }

    /// Commit immediately, bypassing the debounce window. Used for
    /// discrete widgets (checkboxes) where there is no typing storm.
    fn commit_now(&mut self, path: EditPath, value: Value) {
        if let Some(pending) = self.pending.take() {
            if pending.path != path {
                self.ready.push(TreeEdit {
                    path: pending.path,
                    value: pending.value,
                });
            }
        }
        self.ready.push(TreeEdit { path, value });
    }

    /// Buffer an edit behind the debounce window, resetting the timer.
    /// Moving to a different field flushes the previous field's edit.
    fn queue_debounced(&mut self, path: EditPath, value: Value) {
        if let Some(pending) = self.pending.take() {
            if pending.path != path {
                self.ready.push(TreeEdit {
                    path: pending.path,
                    value: pending.value,
                });
            }
        }
        self.pending = Some(PendingEdit {
            path,
            value,
            last_keystroke: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn debounced_edit_is_not_ready_immediately() {
        let mut editor = TreeEditor::new();
        editor.queue_debounced(EditPath::parse("hero.title"), json!("N"));
        assert!(editor.take_ready().is_empty());
        assert!(editor.has_pending());
    }

    #[test]
    fn flush_delivers_pending_edit() {
        let mut editor = TreeEditor::new();
        editor.queue_debounced(EditPath::parse("hero.title"), json!("New"));
        let flushed = editor.flush();
        assert_eq!(
            flushed,
            vec![TreeEdit {
                path: EditPath::parse("hero.title"),
                value: json!("New"),
            }]
        );
        assert!(!editor.has_pending());
    }

    #[test]
    fn keystrokes_replace_pending_value() {
        let mut editor = TreeEditor::new();
        editor.queue_debounced(EditPath::parse("hero.title"), json!("N"));
        editor.queue_debounced(EditPath::parse("hero.title"), json!("Ne"));
        editor.queue_debounced(EditPath::parse("hero.title"), json!("New"));
        let flushed = editor.flush();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].value, json!("New"));
    }

    #[test]
    fn switching_fields_flushes_previous_edit() {
        let mut editor = TreeEditor::new();
        editor.queue_debounced(EditPath::parse("hero.title"), json!("A"));
        editor.queue_debounced(EditPath::parse("hero.subtitle"), json!("B"));
        let flushed = editor.flush();
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[0].path, EditPath::parse("hero.title"));
        assert_eq!(flushed[1].path, EditPath::parse("hero.subtitle"));
    }

    #[test]
    fn checkbox_commit_bypasses_debounce() {
        let mut editor = TreeEditor::new();
        editor.commit_now(EditPath::parse("enabled"), json!(true));
        assert_eq!(editor.take_ready().len(), 1);
    }

    #[test]
    fn reset_drops_buffers_and_edits() {
        let mut editor = TreeEditor::new();
        editor.queue_debounced(EditPath::parse("hero.title"), json!("X"));
        editor.reset();
        assert!(editor.flush().is_empty());
    }
}
