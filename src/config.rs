use crate::statics;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grammar accepted for draft text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftSyntax {
    /// Strict JSON, what the document itself is stored as.
    #[default]
    Json,
    /// JSON5: comments, unquoted keys and trailing commas are accepted in drafts.
    Json5,
}

/// Editor configuration file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    /// Indentation of the published document text and of previews.
    #[serde(default = "default_indent")]
    pub indent: usize,

    #[serde(default)]
    pub draft_syntax: DraftSyntax,
}

fn default_indent() -> usize {
    statics::DEFAULT_INDENT
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            draft_syntax: DraftSyntax::default(),
        }
    }
}

impl EditorOptions {
    /// Load options from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "no config file, using defaults");
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        let options = serde_json::from_str(&content).with_context(|| format!("parsing {path:?}"))?;
        Ok(options)
    }

    /// Load `nodepath.config.json` from `dir`, if present.
    pub fn discover(dir: &Path) -> anyhow::Result<Self> {
        Self::load(&dir.join(statics::DEFAULT_CONFIG_NAME))
    }
}
