use anyhow::{Context, Result, bail};
use clap::Args;
use nodepath::{
    Document, EditSession, EditorOptions, JsonPath, SelectedNode, SourceFile, statics,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Args, Debug)]
pub struct FileArgs {
    /// JSON document (.json, or gzip-compressed .gz)
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// JSON array of keys and indices
    pub segments: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Bracket path text
    pub text: String,

    /// Reject anything but `$` followed by well-formed segments
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct NodeArgs {
    #[command(flatten)]
    pub source: FileArgs,

    /// Bracket path, e.g. '$["users"][0]'
    pub path: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub node: NodeArgs,

    /// Draft JSON text
    #[arg(conflicts_with = "draft_file", required_unless_present = "draft_file")]
    pub draft: Option<String>,

    /// Read the draft from a file instead
    #[arg(long)]
    pub draft_file: Option<PathBuf>,

    /// Print the resulting document instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct FmtArgs {
    #[command(flatten)]
    pub source: FileArgs,

    /// Print the resulting document instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn path(args: PathArgs) -> Result<()> {
    let path: JsonPath = serde_json::from_str(&args.segments)
        .context("segments must be a JSON array of strings and non-negative integers")?;
    println!("{path}");
    Ok(())
}

pub fn decode(args: DecodeArgs) -> Result<()> {
    let path = if args.strict {
        JsonPath::decode_strict(&args.text)?
    } else {
        JsonPath::decode(&args.text)
    };
    println!("{}", serde_json::to_string(&path)?);
    Ok(())
}

pub fn get(args: NodeArgs, options: &EditorOptions) -> Result<()> {
    let (doc, _) = open_document(&args.source.file, options)?;
    let path = parse_path(&args.path)?;
    let Some(value) = doc.get(&path) else {
        bail!("{} {path}", statics::EN_ERR_NO_VALUE_AT);
    };
    println!("{}", value.to_json_pretty_with_indent(options.indent));
    Ok(())
}

pub fn show(args: NodeArgs, options: &EditorOptions) -> Result<()> {
    let (doc, _) = open_document(&args.source.file, options)?;
    let path = parse_path(&args.path)?;
    let Some(node) = SelectedNode::at(doc.root(), path.clone()) else {
        bail!("{} {path}", statics::EN_ERR_NO_VALUE_AT);
    };
    let session = EditSession::open(&node, options);
    println!("{}", statics::EN_LABEL_CONTENT);
    println!("{}", session.preview());
    println!();
    println!("{}", statics::EN_LABEL_JSON_PATH);
    println!("{}", session.path_text());
    Ok(())
}

pub fn edit(args: EditArgs, options: &EditorOptions) -> Result<()> {
    let draft = match (args.draft, &args.draft_file) {
        (Some(text), _) => text,
        (None, Some(file)) => {
            std::fs::read_to_string(file).with_context(|| format!("reading {file:?}"))?
        }
        (None, None) => bail!("no draft given"),
    };

    let file = &args.node.source.file;
    let (mut doc, source) = open_document(file, options)?;
    let path = parse_path(&args.node.path)?;

    // Writing to a path that does not exist yet starts from an empty node.
    let node = SelectedNode::at(doc.root(), path.clone())
        .unwrap_or_else(|| SelectedNode::new(Vec::new(), path));
    let mut session = EditSession::open(&node, options);
    session.begin_edit();
    session.set_draft(draft);
    session.save(&mut doc)?;

    finish(&doc, &source, file, args.dry_run)
}

pub fn fmt(args: FmtArgs, options: &EditorOptions) -> Result<()> {
    let file = &args.source.file;
    let (mut doc, source) = open_document(file, options)?;
    doc.stringify();
    finish(&doc, &source, file, args.dry_run)
}

fn parse_path(text: &str) -> Result<JsonPath> {
    JsonPath::decode_strict(text).with_context(|| format!("reading path {text:?}"))
}

/// Load `file` and wire it up as the document's contents sink.
fn open_document(
    file: &Path,
    options: &EditorOptions,
) -> Result<(Document, Rc<RefCell<SourceFile>>)> {
    let mut source = SourceFile::load_path(file)?;
    let mut doc = Document::new(options.clone());
    if let Some(text) = source.take_for_reparse() {
        doc.set_json(text);
    }
    let source = Rc::new(RefCell::new(source));
    doc.subscribe(Box::new(Rc::clone(&source)));
    Ok((doc, source))
}

fn finish(doc: &Document, source: &RefCell<SourceFile>, file: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        eprintln!("{} {}", statics::EN_STATUS_DRY_RUN, file.display());
        println!("{}", doc.json());
        return Ok(());
    }
    source.borrow_mut().save_to_path(file)?;
    eprintln!("{} {}", statics::EN_STATUS_SAVED, file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let file = dir.join(name);
        std::fs::write(&file, contents).unwrap();
        file
    }

    fn node(file: &Path, path: &str) -> NodeArgs {
        NodeArgs {
            source: FileArgs {
                file: file.to_path_buf(),
            },
            path: path.to_string(),
        }
    }

    fn edit_args(file: &Path, path: &str, draft: &str, dry_run: bool) -> EditArgs {
        EditArgs {
            node: node(file, path),
            draft: Some(draft.to_string()),
            draft_file: None,
            dry_run,
        }
    }

    #[test]
    fn get_missing_path_reports_no_value() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", r#"{"a":1}"#);

        let err = get(node(&file, r#"$["b"]"#), &EditorOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), r#"no value at $["b"]"#);

        get(node(&file, r#"$["a"]"#), &EditorOptions::default()).unwrap();
    }

    #[test]
    fn typed_paths_are_decoded_strictly() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", r#"{"a":1}"#);

        let err = get(node(&file, "a"), &EditorOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("path must start with '$'"), "{err:#}");
    }

    #[test]
    fn edit_writes_back_with_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(
            dir.path(),
            "doc.json",
            "{\r\n  \"a\": 1,\r\n  \"keep\": [1]\r\n}\r\n",
        );

        edit(edit_args(&file, "$", r#"{"a": 2}"#, false), &EditorOptions::default()).unwrap();

        let written = std::fs::read(&file).unwrap();
        assert_eq!(
            written,
            b"{\r\n  \"a\": 2,\r\n  \"keep\": [\r\n    1\r\n  ]\r\n}\r\n"
        );
    }

    #[test]
    fn edit_missing_path_starts_from_empty_node() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", r#"{"a":1}"#);

        edit(
            edit_args(&file, r#"$["b"][0]["c"]"#, "true", false),
            &EditorOptions::default(),
        )
        .unwrap();

        let written = std::fs::read_to_string(&file).unwrap();
        assert_eq!(
            written,
            "{\n  \"a\": 1,\n  \"b\": [\n    {\n      \"c\": true\n    }\n  ]\n}"
        );
    }

    #[test]
    fn edit_dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", r#"{"a":1}"#);

        edit(edit_args(&file, r#"$["a"]"#, "2", true), &EditorOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn edit_reads_draft_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", r#"{"a":1}"#);
        let draft = write_fixture(dir.path(), "draft.json", r#"{"b": 2}"#);

        let mut args = edit_args(&file, "$", "", false);
        args.draft = None;
        args.draft_file = Some(draft);
        edit(args, &EditorOptions::default()).unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "{\n  \"a\": 1,\n  \"b\": 2\n}"
        );
    }

    #[test]
    fn edit_refuses_invalid_draft_and_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", r#"{"a":1}"#);

        let err = edit(edit_args(&file, "$", "{bad json", false), &EditorOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), statics::EN_ERR_INVALID_JSON);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn edit_refuses_index_past_limit_and_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", r#"{"a":[]}"#);

        let err = edit(
            edit_args(&file, r#"$["a"][4294967295]"#, "1", false),
            &EditorOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("4294967295"), "{err}");
        assert_eq!(std::fs::read_to_string(&file).unwrap(), r#"{"a":[]}"#);
    }

    #[test]
    fn fmt_reprints_with_configured_indent() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", "{\"a\":[1]}\n");
        let options = EditorOptions {
            indent: 4,
            ..EditorOptions::default()
        };

        fmt(
            FmtArgs {
                source: FileArgs { file: file.clone() },
                dry_run: false,
            },
            &options,
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "{\n    \"a\": [\n        1\n    ]\n}\n"
        );
    }

    #[test]
    fn fmt_dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", "{\"a\":[1]}");

        fmt(
            FmtArgs {
                source: FileArgs { file: file.clone() },
                dry_run: true,
            },
            &EditorOptions::default(),
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "{\"a\":[1]}");
    }

    #[test]
    fn show_missing_path_reports_no_value() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_fixture(dir.path(), "doc.json", r#"{"a":1}"#);

        let err = show(node(&file, "$[0]"), &EditorOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "no value at $[0]");
        show(node(&file, "$"), &EditorOptions::default()).unwrap();
    }
}
