//! Syntax highlighting for the raw JSON editing mode.

use egui_code_editor::Syntax;
use std::collections::BTreeSet;

/// JSON syntax for the config editor: literals highlighted as keywords,
/// everything else left to the editor's string/number handling.
pub fn config_json_syntax() -> Syntax {
    let mut keywords = BTreeSet::new();
    keywords.insert("true");
    keywords.insert("false");
    keywords.insert("null");

    Syntax::new("JSON").with_keywords(keywords)
}
