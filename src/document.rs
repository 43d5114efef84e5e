use crate::config::EditorOptions;
use crate::error::SetError;
use crate::{JsonPath, Value, statics};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// What listeners are told after the document of record changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentChange<'a> {
    /// The full new text. `skip_update` tells a contents sink that this
    /// text came from the document itself and must not be parsed back in.
    Replaced { text: &'a str, skip_update: bool },
    Cleared,
}

/// A consumer of published document text: the graph rebuild, the raw file
/// contents, anything that must follow the document.
pub trait DocumentListener {
    fn document_changed(&mut self, change: &DocumentChange<'_>);
}

/// Shared handle, so the owner can keep using a listener after subscribing it.
impl<L: DocumentListener> DocumentListener for Rc<RefCell<L>> {
    fn document_changed(&mut self, change: &DocumentChange<'_>) {
        self.borrow_mut().document_changed(change);
    }
}

/// The document of record.
///
/// Holds the published text and its parsed tree. Every change installs a
/// whole new text and tree; a [`Value`] handed out earlier is never modified.
pub struct Document {
    text: String,
    root: Value,
    loading: bool,
    options: EditorOptions,
    listeners: Vec<Box<dyn DocumentListener>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.text)
            .field("loading", &self.loading)
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl Document {
    /// An empty object, still waiting for its first text.
    pub fn new(options: EditorOptions) -> Self {
        Self {
            text: statics::EMPTY_OBJECT_TEXT.to_string(),
            root: Value::empty_object(),
            loading: true,
            options,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn DocumentListener>) {
        self.listeners.push(listener);
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The published text, verbatim.
    pub fn json(&self) -> &str {
        &self.text
    }

    /// The parsed tree. Text that is not valid JSON reads as an empty object.
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn get(&self, path: &JsonPath) -> Option<&Value> {
        crate::get(&self.root, path)
    }

    /// Install new text as the document of record.
    pub fn set_json(&mut self, text: impl Into<String>) {
        let text = text.into();
        let root = parse_or_empty(&text);
        self.install(text, root);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.root = Value::empty_object();
        self.loading = false;
        notify(&mut self.listeners, &DocumentChange::Cleared);
    }

    /// Write `value` at `path` and publish the re-printed document.
    /// A refused write leaves the text, the tree and the listeners untouched.
    pub fn update_at_path(&mut self, path: &JsonPath, value: Value) -> Result<(), SetError> {
        let next = crate::set(&self.root, path, value)?;
        let text = next.to_json_pretty_with_indent(self.options.indent);
        self.install(text, next);
        Ok(())
    }

    /// Re-print the current document with the configured indent.
    pub fn stringify(&mut self) {
        let text = self.root.to_json_pretty_with_indent(self.options.indent);
        let root = self.root.clone();
        self.install(text, root);
    }

    fn install(&mut self, text: String, root: Value) {
        self.text = text;
        self.root = root;
        self.loading = false;
        let change = DocumentChange::Replaced {
            text: &self.text,
            skip_update: true,
        };
        notify(&mut self.listeners, &change);
    }
}

fn parse_or_empty(text: &str) -> Value {
    match Value::parse_json(text) {
        Ok(root) => root,
        Err(e) => {
            tracing::warn!(error = %e, "document is not valid JSON, editing it as an empty object");
            Value::empty_object()
        }
    }
}

fn notify(listeners: &mut [Box<dyn DocumentListener>], change: &DocumentChange<'_>) {
    for listener in listeners {
        listener.document_changed(change);
    }
}
