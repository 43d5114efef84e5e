use crate::config::EditorOptions;
use crate::error::CommitError;
use crate::rows::{self, SelectedNode};
use crate::{Document, JsonPath};

/// The node view: shows a selected node's content and path, and lets the
/// user edit the content and commit it back into the document.
///
/// The draft only exists while editing; `cancel` drops it, `save` commits it.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    path: JsonPath,
    path_text: String,
    preview: String,
    draft: String,
    editing: bool,
}

impl EditSession {
    pub fn open(node: &SelectedNode, options: &EditorOptions) -> Self {
        let preview = rows::normalize_with_indent(&node.rows, options.indent);
        Self {
            path: node.path.clone(),
            path_text: node.path.encode(),
            draft: preview.clone(),
            preview,
            editing: false,
        }
    }

    /// Follow a new selection (or a re-rendered one). Any unsaved draft is dropped.
    pub fn reopen(&mut self, node: &SelectedNode, options: &EditorOptions) {
        *self = Self::open(node, options);
    }

    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// The bracket string shown as the node's JSON path.
    pub fn path_text(&self) -> &str {
        &self.path_text
    }

    /// Canonical JSON of the node's rows.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn cancel(&mut self) {
        self.draft.clone_from(&self.preview);
        self.editing = false;
    }

    /// Commit the draft at this session's path.
    ///
    /// On success the session leaves edit mode and shows the node as it now
    /// reads in `doc`. On error nothing changes: `doc` keeps its text and the
    /// session stays in edit mode with the draft intact.
    pub fn save(&mut self, doc: &mut Document) -> Result<(), CommitError> {
        crate::commit::commit(doc, &self.path, &self.draft)?;
        match SelectedNode::at(doc.root(), self.path.clone()) {
            Some(node) => self.reopen(&node, doc.options()),
            None => self.editing = false,
        }
        Ok(())
    }
}
