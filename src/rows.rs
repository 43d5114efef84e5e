//! Display rows of a graph node and their canonical JSON text.

use crate::statics;
use crate::value::Map;
use crate::{JsonPath, Value};
use serde::{Deserialize, Serialize};

/// Coarse type tag of a row. Only containers are distinguished; every
/// other tag the graph layer sends (`"string"`, `"number"`, ...) is a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Array,
    Object,
    #[serde(other)]
    Scalar,
}

impl RowKind {
    pub fn of(value: &Value) -> RowKind {
        match value {
            Value::Array(_) => RowKind::Array,
            Value::Object(_) => RowKind::Object,
            _ => RowKind::Scalar,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, RowKind::Array | RowKind::Object)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RowKind::Array => statics::ROW_TYPE_ARRAY,
            RowKind::Object => statics::ROW_TYPE_OBJECT,
            RowKind::Scalar => statics::ROW_TYPE_SCALAR,
        }
    }
}

/// One line of a node as the graph shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: RowKind,
}

fn default_kind() -> RowKind {
    RowKind::Scalar
}

impl Row {
    pub fn new(key: Option<String>, value: Value, kind: RowKind) -> Self {
        Self { key, value, kind }
    }

    /// The key, with an empty key counted as none.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

/// What the selection layer hands over for the node the user picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedNode {
    #[serde(default, alias = "text")]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub path: JsonPath,
}

impl SelectedNode {
    pub fn new(rows: Vec<Row>, path: JsonPath) -> Self {
        Self { rows, path }
    }

    /// The node at `path` of `doc`, with the rows the graph would show for it.
    pub fn at(doc: &Value, path: JsonPath) -> Option<Self> {
        let node = crate::get(doc, &path)?;
        Some(Self::new(rows_for(node), path))
    }
}

/// The canonical value of a row list.
///
/// No rows is `{}`. A single keyless row is that row's value. Otherwise an
/// object of the keyed scalar rows; container rows are left out, nested
/// containers are edited by selecting them.
pub fn normalized_value(rows: &[Row]) -> Value {
    match rows {
        [] => Value::empty_object(),
        [row] if row.key().is_none() => row.value.clone(),
        _ => rows
            .iter()
            .filter(|row| !row.kind.is_container())
            .filter_map(|row| Some((row.key()?.to_owned(), row.value.clone())))
            .collect::<Map>()
            .into(),
    }
}

/// [`normalized_value`] as pretty JSON text, ready to preview or seed a draft.
pub fn normalize(rows: &[Row]) -> String {
    normalize_with_indent(rows, statics::DEFAULT_INDENT)
}

pub fn normalize_with_indent(rows: &[Row], indent: usize) -> String {
    normalized_value(rows).to_json_pretty_with_indent(indent)
}

/// Rows the graph shows for a node: one per object member, one keyless row
/// per array element, or a single keyless row for a scalar.
pub fn rows_for(node: &Value) -> Vec<Row> {
    match node {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Row::new(Some(k.clone()), v.clone(), RowKind::of(v)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|v| Row::new(None, v.clone(), RowKind::of(v)))
            .collect(),
        scalar => vec![Row::new(None, scalar.clone(), RowKind::Scalar)],
    }
}
