//! Address, read and rewrite nodes of a JSON document.
//! Provides the bracket-path codec (`$["a"][0]`), copy-on-write reads and writes
//! on a shared JSON tree, and the node view/edit flow that commits drafts back
//! into an owned document.

mod access;
pub mod commit;
pub mod config;
mod document;
pub mod error;
mod mutate;
mod path;
pub mod rows;
mod session;
pub mod source;
pub mod statics;
mod value;

pub use access::get;
pub use config::{DraftSyntax, EditorOptions};
pub use document::{Document, DocumentChange, DocumentListener};
pub use error::{CommitError, PathParseError, SetError};
pub use mutate::{set, set_in_place};
pub use path::{JsonPath, Segment};
pub use rows::{Row, RowKind, SelectedNode};
pub use session::EditSession;
pub use source::SourceFile;
pub use value::{Map, Number, Value};
