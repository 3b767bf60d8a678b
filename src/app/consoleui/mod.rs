//! Desktop user interface for the referral config console.
//!
//! The UI follows a window-based architecture: the main
//! [`app::ConsoleApp`] coordinator renders the app list, tab bar, and
//! editor panels, while secondary surfaces (raw JSON editing, app
//! create/edit forms, notification details) are floating windows
//! implementing [`window_focus::FocusableWindow`].
//!
//! Editing flows through [`tree_editor::TreeEditor`], which renders form
//! widgets for the selected tab's subtree and hands debounced edits to
//! the reconciler owned by `ConsoleApp`.

pub mod app;
pub mod app_form_window;
pub mod json_editor_window;
pub mod menu;
pub mod tree_editor;
pub mod window_focus;

pub use app::ConsoleApp;
pub use app_form_window::{AppForm, AppFormMode, AppFormResult, AppFormWindow};
pub use json_editor_window::JsonEditorWindow;
pub use tree_editor::{TreeEdit, TreeEditor, EDIT_DEBOUNCE};
pub use window_focus::{FocusableWindow, SimpleShowParams, ThemeShowParams, WindowFocusManager};
