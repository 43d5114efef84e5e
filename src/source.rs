//! The raw file behind a document: plain or gzip JSON on disk.

use crate::document::{DocumentChange, DocumentListener};
use anyhow::Context;
use flate2::{Compression, GzBuilder, read::GzDecoder};
use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    GzipJson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

/// File contents as last loaded or published, preserving the original bytes
/// so an unmodified file is written back byte for byte.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source_path: Option<PathBuf>,
    pub format: SourceFormat,
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
    pub original_bytes: Vec<u8>,
    contents: String,
    dirty: bool,
    pending_reparse: bool,
}

impl SourceFile {
    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {path:?}"))?;
        let format = detect_format(path, &bytes);
        let text_bytes = match format {
            SourceFormat::Json => bytes.clone(),
            SourceFormat::GzipJson => {
                let mut decoder = GzDecoder::new(&bytes[..]);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).context("gzip decompress")?;
                out
            }
        };

        let contents = String::from_utf8(text_bytes).context("file is not valid UTF-8")?;
        tracing::debug!(?path, ?format, len = contents.len(), "loaded source file");

        Ok(Self {
            source_path: Some(path.to_path_buf()),
            format,
            line_ending: detect_line_ending(contents.as_bytes()),
            trailing_newline: contents.ends_with('\n'),
            original_bytes: bytes,
            contents,
            dirty: false,
            pending_reparse: true,
        })
    }

    /// An in-memory source with no file behind it yet.
    pub fn from_contents(contents: impl Into<String>) -> Self {
        let contents = contents.into();
        Self {
            source_path: None,
            format: SourceFormat::Json,
            line_ending: detect_line_ending(contents.as_bytes()),
            trailing_newline: contents.ends_with('\n'),
            original_bytes: contents.as_bytes().to_vec(),
            contents,
            dirty: false,
            pending_reparse: true,
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True while the contents have not been handed to a document yet.
    /// Contents published by the document itself never set this.
    pub fn pending_reparse(&self) -> bool {
        self.pending_reparse
    }

    /// The contents for the document to parse, clearing the pending flag.
    pub fn take_for_reparse(&mut self) -> Option<&str> {
        if !std::mem::take(&mut self.pending_reparse) {
            return None;
        }
        Some(&self.contents)
    }

    pub fn set_contents(&mut self, contents: &str, skip_update: bool) {
        self.contents = contents.to_string();
        self.pending_reparse = !skip_update;
        self.refresh_dirty();
    }

    /// Recompute `dirty` by comparing the bytes a save would write to `original_bytes`.
    pub fn refresh_dirty(&mut self) {
        let Ok(current) = self.generate_bytes_for_format(self.format) else {
            self.dirty = true;
            return;
        };
        self.dirty = current != self.original_bytes;
    }

    /// Encode the current contents with the file's line ending, regardless of `dirty`.
    pub fn generate_bytes_for_format(&self, format: SourceFormat) -> anyhow::Result<Vec<u8>> {
        let mut text = match self.line_ending {
            LineEnding::Lf => self.contents.replace("\r\n", "\n"),
            LineEnding::CrLf => self.contents.replace("\r\n", "\n").replace('\n', "\r\n"),
        };
        if self.trailing_newline && !text.is_empty() && !text.ends_with('\n') {
            text.push_str(match self.line_ending {
                LineEnding::Lf => "\n",
                LineEnding::CrLf => "\r\n",
            });
        }
        let text_bytes = text.as_bytes();

        match format {
            SourceFormat::Json => Ok(text_bytes.to_vec()),
            SourceFormat::GzipJson => {
                let mut encoder = GzBuilder::new()
                    .mtime(0)
                    .write(Vec::new(), Compression::default());
                encoder.write_all(text_bytes).context("gzip compress")?;
                let bytes = encoder.finish().context("gzip finish")?;
                Ok(bytes)
            }
        }
    }

    pub fn save_bytes_for_format(&self, format: SourceFormat) -> anyhow::Result<Vec<u8>> {
        if !self.dirty && format == self.format {
            return Ok(self.original_bytes.clone());
        }

        self.generate_bytes_for_format(format)
    }

    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let target_format = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            SourceFormat::GzipJson
        } else {
            SourceFormat::Json
        };

        let bytes = self.save_bytes_for_format(target_format)?;
        fs::write(path, &bytes).with_context(|| format!("writing {path:?}"))?;
        tracing::info!(?path, bytes = bytes.len(), "saved document");

        self.source_path = Some(path.to_path_buf());
        self.format = target_format;
        self.original_bytes = bytes;
        self.dirty = false;
        Ok(())
    }
}

impl DocumentListener for SourceFile {
    fn document_changed(&mut self, change: &DocumentChange<'_>) {
        match change {
            DocumentChange::Replaced { text, skip_update } => self.set_contents(text, *skip_update),
            DocumentChange::Cleared => self.set_contents("", true),
        }
    }
}

fn detect_line_ending(text_bytes: &[u8]) -> LineEnding {
    // Count actual newline terminators; a stray CRLF should not flip the whole file.
    let mut lf_count = 0usize;
    let mut crlf_count = 0usize;

    for (i, b) in text_bytes.iter().enumerate() {
        if *b != b'\n' {
            continue;
        }
        if i > 0 && text_bytes[i - 1] == b'\r' {
            crlf_count += 1;
        } else {
            lf_count += 1;
        }
    }

    if crlf_count > lf_count {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    }
}

fn detect_format(path: &Path, bytes: &[u8]) -> SourceFormat {
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        return SourceFormat::GzipJson;
    }
    // Gzip magic: 1F 8B
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        return SourceFormat::GzipJson;
    }
    SourceFormat::Json
}
