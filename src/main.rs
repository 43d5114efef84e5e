mod commands;

use clap::{Parser, Subcommand};
use commands::{DecodeArgs, EditArgs, FmtArgs, NodeArgs, PathArgs};
use nodepath::EditorOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// nodepath - view and edit nodes of a JSON document by bracket path
#[derive(Parser, Debug)]
#[command(name = "nodepath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Editor options file (defaults to ./nodepath.config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the bracket path for a JSON array of segments, e.g. '["a", 0]'
    Path(PathArgs),

    /// Print the segments of a bracket path as a JSON array
    Decode(DecodeArgs),

    /// Print the value at a path
    Get(NodeArgs),

    /// Print a node's content preview and JSON path
    Show(NodeArgs),

    /// Commit a draft at a path and write the file back
    Edit(EditArgs),

    /// Re-print the whole document
    Fmt(FmtArgs),
}

fn load_options(config: Option<PathBuf>) -> anyhow::Result<EditorOptions> {
    match config {
        Some(path) => EditorOptions::load(&path),
        None => EditorOptions::discover(&std::env::current_dir()?),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_options(cli.config).and_then(|options| match cli.command {
        Command::Path(args) => commands::path(args),
        Command::Decode(args) => commands::decode(args),
        Command::Get(args) => commands::get(args, &options),
        Command::Show(args) => commands::show(args, &options),
        Command::Edit(args) => commands::edit(args, &options),
        Command::Fmt(args) => commands::fmt(args, &options),
    });

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use commands::FileArgs;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_takes_inline_or_file_draft() {
        let cli = Cli::try_parse_from(["nodepath", "edit", "doc.json", "$[\"a\"]", "{}"]).unwrap();
        assert!(matches!(cli.command, Command::Edit(_)));

        let conflict = Cli::try_parse_from([
            "nodepath",
            "edit",
            "doc.json",
            "$",
            "{}",
            "--draft-file",
            "d.json",
        ]);
        assert!(conflict.is_err());
    }

    #[test]
    fn fmt_parses_file_and_dry_run() {
        let cli = Cli::try_parse_from(["nodepath", "fmt", "doc.json", "--dry-run"]).unwrap();
        let Command::Fmt(FmtArgs { source: FileArgs { file }, dry_run }) = cli.command else {
            panic!("expected fmt");
        };
        assert_eq!(file, PathBuf::from("doc.json"));
        assert!(dry_run);
    }
}
