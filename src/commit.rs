//! Turning draft text into the value written back at a path.

use crate::config::DraftSyntax;
use crate::error::CommitError;
use crate::{Document, JsonPath, Value};
use std::sync::Arc;

/// Parse draft text with the configured grammar.
pub fn parse_draft(text: &str, syntax: DraftSyntax) -> Result<Value, CommitError> {
    let parsed = match syntax {
        DraftSyntax::Json => Value::parse_json(text).map_err(|e| e.to_string()),
        DraftSyntax::Json5 => Value::parse_json5(text).map_err(|e| format!("{e:#}")),
    };
    parsed.map_err(|detail| {
        tracing::warn!(%detail, "rejecting draft");
        CommitError::invalid_draft(detail)
    })
}

/// The value to store given what is at the path now and the parsed draft.
///
/// Two objects are shallow-merged: members only in `current` survive, the
/// draft wins on shared keys, new keys are appended. Anything else is a
/// full replace by the draft.
pub fn merge_for_commit(current: Option<&Value>, parsed: Value) -> Value {
    match (current, parsed) {
        (Some(Value::Object(current)), Value::Object(draft)) => {
            let mut merged = Arc::clone(current);
            let members = Arc::make_mut(&mut merged);
            for (key, value) in Arc::unwrap_or_clone(draft) {
                members.insert(key, value);
            }
            Value::Object(merged)
        }
        (_, parsed) => parsed,
    }
}

/// Parse `draft`, merge it with the latest value at `path` and write the
/// result into `doc`. On error `doc` is left exactly as it was.
pub fn commit(doc: &mut Document, path: &JsonPath, draft: &str) -> Result<Value, CommitError> {
    let parsed = parse_draft(draft, doc.options().draft_syntax)?;
    let next = merge_for_commit(doc.get(path), parsed);
    tracing::info!(%path, kind = next.type_name(), "committing draft");
    doc.update_at_path(path, next.clone())?;
    Ok(next)
}
