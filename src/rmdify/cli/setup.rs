use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// "0.3.2" for releases, "0.3.2@abc1234" for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "rmdify", bin_name = "rmdify", version = get_version())]
#[command(about = "Markdown documents with live preview and export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new document
    #[command(alias = "n")]
    New {
        /// Title (defaults to "Untitled Document")
        #[arg(short, long)]
        title: Option<String>,

        /// Markdown content (defaults to the starter template)
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Import a local .md or .txt file as a new document
    #[command(alias = "o")]
    Open { file: PathBuf },

    /// List documents, newest first
    #[command(alias = "ls")]
    List {
        /// Only starred documents
        #[arg(short, long)]
        starred: bool,
    },

    /// Print a document
    #[command(alias = "v")]
    View {
        /// Index or id of the document
        selector: String,

        /// Show the rendered preview instead of raw Markdown
        #[arg(short, long)]
        preview: bool,
    },

    /// Edit a document in $EDITOR
    #[command(alias = "e")]
    Edit {
        /// Index or id of the document
        selector: String,
    },

    /// Replace a document's title or content
    Update {
        /// Index or id of the document
        selector: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,

        /// Read the new content from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Type into a document from stdin with autosave
    ///
    /// Lines read from stdin become the document body. The draft is saved
    /// after the configured quiet period and at end of input. A line with
    /// only `:save` saves now, `:preview` prints the rendered draft.
    #[command(alias = "w")]
    Write {
        /// Index or id of the document (omit to start a new one)
        selector: Option<String>,

        /// Set the title before writing
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Toggle the star on one or more documents
    Star {
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Permanently delete one or more documents
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export a document as md, txt, html or pdf
    Export {
        /// Index or id of the document
        selector: String,

        /// Output format (defaults to the configured default-export-format)
        #[arg(short, long)]
        format: Option<String>,

        /// File name without extension (defaults to the title)
        #[arg(short, long)]
        name: Option<String>,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Show a named page: /, /app, /mapp, /mobile
    Page {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Check and repair the document indexes
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., default-export-format)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rmdify").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_subcommand_is_allowed() {
        assert!(parse(&[]).command.is_none());
    }

    #[test]
    fn export_flags() {
        let cli = parse(&["export", "2", "-f", "pdf", "--out", "/tmp/x"]);
        match cli.command {
            Some(Commands::Export {
                selector,
                format,
                name,
                out,
            }) => {
                assert_eq!(selector, "2");
                assert_eq!(format.as_deref(), Some("pdf"));
                assert!(name.is_none());
                assert_eq!(out, PathBuf::from("/tmp/x"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn update_content_conflicts_with_file() {
        let result = Cli::try_parse_from(["rmdify", "update", "1", "-c", "x", "-f", "y.md"]);
        assert!(result.is_err());
    }

    #[test]
    fn delete_requires_selectors() {
        assert!(Cli::try_parse_from(["rmdify", "delete"]).is_err());
        assert!(matches!(
            parse(&["rm", "1", "2", "--yes"]).command,
            Some(Commands::Delete { yes: true, .. })
        ));
    }
}
