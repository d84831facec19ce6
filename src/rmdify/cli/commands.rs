use super::print::{
    print_config, print_document, print_documents, print_documents_compact, print_messages,
    print_page,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use rmdify::api::{ConfigAction, ListFilter, RmdifyApi};
use rmdify::config::RmdifyConfig;
use rmdify::editor::{edit_buffer, EditorBuffer, EditorSession, SaveStatus};
use rmdify::error::{Result, RmdifyError};
use rmdify::export::ExportFormat;
use rmdify::store::fs_backend::FsBackend;
use rmdify::store::local::LocalStore;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const HOME_ENV: &str = "RMDIFY_HOME";
const LOG_ENV: &str = "RMDIFY_LOG";
const STORE_DIR: &str = "store";
// Upper bound on a single wait when no autosave is pending
const IDLE_WAIT: Duration = Duration::from_secs(3600);

type Api = RmdifyApi<LocalStore<FsBackend>>;

struct AppContext {
    api: Api,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::New { title, content }) => handle_new(&mut ctx, title, content),
        Some(Commands::Open { file }) => handle_open(&mut ctx, &file),
        Some(Commands::List { starred }) => handle_list(&ctx, starred),
        Some(Commands::View { selector, preview }) => handle_view(&ctx, &selector, preview),
        Some(Commands::Edit { selector }) => handle_edit(&mut ctx, &selector),
        Some(Commands::Update {
            selector,
            title,
            content,
            file,
        }) => handle_update(&mut ctx, &selector, title, content, file),
        Some(Commands::Write { selector, title }) => {
            handle_write(&mut ctx, selector.as_deref(), title)
        }
        Some(Commands::Star { selectors }) => handle_star(&mut ctx, &selectors),
        Some(Commands::Delete { selectors, yes }) => handle_delete(&mut ctx, &selectors, yes),
        Some(Commands::Export {
            selector,
            format,
            name,
            out,
        }) => handle_export(&ctx, &selector, format, name, &out),
        Some(Commands::Page { path }) => handle_page(&ctx, &path),
        Some(Commands::Doctor) => handle_doctor(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, false),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    ProjectDirs::from("com", "rmdify", "rmdify")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            RmdifyError::Store(format!(
                "Could not determine a data directory; set ${}",
                HOME_ENV
            ))
        })
}

fn init_context() -> Result<AppContext> {
    let data_dir = data_dir()?;
    let config = RmdifyConfig::load(&data_dir)?;
    debug!(dir = %data_dir.display(), namespace = %config.namespace, "context");

    let backend = FsBackend::new(data_dir.join(STORE_DIR)).with_quota(config.storage_quota_bytes);
    let store = LocalStore::new(backend).with_namespace(&config.namespace);

    Ok(AppContext {
        api: RmdifyApi::new(store, data_dir, config),
    })
}

fn handle_new(ctx: &mut AppContext, title: Option<String>, content: Option<String>) -> Result<()> {
    let result = ctx.api.create_document(title, content)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_open(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let result = ctx.api.open_file(file)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, starred: bool) -> Result<()> {
    let filter = if starred {
        ListFilter::Starred
    } else {
        ListFilter::All
    };
    let result = ctx.api.list_documents(filter)?;
    print_documents(&result.listed_docs);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &AppContext, selector: &str, preview: bool) -> Result<()> {
    let result = ctx.api.view_document(selector, preview)?;
    if let (Some(doc), Some(body)) = (result.affected_docs.first(), &result.rendered) {
        print_document(doc, body);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, selector: &str) -> Result<()> {
    let viewed = ctx.api.view_document(selector, false)?;
    let Some(doc) = viewed.affected_docs.into_iter().next() else {
        return Ok(());
    };

    let initial = EditorBuffer::new(doc.title.clone(), doc.content.clone());
    let edited = edit_buffer(&initial)?;
    if initial.is_unchanged(&edited) {
        println!("{}", "No changes.".dimmed());
        return Ok(());
    }
    if edited.title.is_empty() {
        return Err(RmdifyError::Api("Title cannot be empty".into()));
    }

    let result = ctx.api.apply_edit(&doc, edited.title, edited.content)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_update(
    ctx: &mut AppContext,
    selector: &str,
    title: Option<String>,
    content: Option<String>,
    file: Option<PathBuf>,
) -> Result<()> {
    let content = match file {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => content,
    };
    let result = ctx.api.update_document(selector, title, content)?;
    print_messages(&result.messages);
    Ok(())
}

enum WriteInput {
    Line(String),
    Failed(io::Error),
}

/// Stream stdin into an editing session. Autosave runs on the configured
/// quiet period; a failed save is reported and not retried until the next
/// edit or end of input.
fn handle_write(ctx: &mut AppContext, selector: Option<&str>, title: Option<String>) -> Result<()> {
    let mut session = ctx.api.open_session(selector)?;
    let mut body = String::new();
    let mut touched = false;
    if let Some(title) = title {
        session.set_title(&title, Instant::now());
        touched = true;
    }

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let message = match line {
                Ok(line) => WriteInput::Line(line),
                Err(e) => WriteInput::Failed(e),
            };
            if tx.send(message).is_err() {
                break;
            }
        }
    });

    eprintln!(
        "{}",
        format!(
            "Writing {} ({}). End input with Ctrl-D.",
            session.draft().title,
            session.draft().id
        )
        .dimmed()
    );

    loop {
        let wait = session
            .autosave_remaining(Instant::now())
            .unwrap_or(IDLE_WAIT);
        match rx.recv_timeout(wait) {
            Ok(WriteInput::Line(line)) => match line.trim() {
                ":save" => save_now(ctx, &mut session),
                ":preview" => {
                    session.toggle_tab();
                    println!("{}", session.preview());
                    session.toggle_tab();
                }
                _ => {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(&line);
                    session.set_content(&body, Instant::now());
                    touched = true;
                }
            },
            Ok(WriteInput::Failed(e)) => return Err(RmdifyError::Io(e)),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        match ctx.api.poll_session(&mut session, Instant::now()) {
            Ok(true) => eprintln!("{}", "Autosaved.".dimmed()),
            Ok(false) => {}
            Err(e) => eprintln!("{}", format!("Save failed: {}", e).red()),
        }
    }

    // Nothing typed into a fresh session: leave the store alone
    if touched && session.status() != SaveStatus::Saved {
        let saved = ctx.api.save_session(&mut session)?;
        println!("{}", format!("Document saved: {}", saved.title).green());
    }
    Ok(())
}

fn save_now(ctx: &mut AppContext, session: &mut EditorSession) {
    match ctx.api.save_session(session) {
        Ok(doc) => eprintln!("{}", format!("Saved {}.", doc.title).green()),
        Err(e) => eprintln!("{}", format!("Save failed: {}", e).red()),
    }
}

fn handle_star(ctx: &mut AppContext, selectors: &[String]) -> Result<()> {
    let result = ctx.api.toggle_star(selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, selectors: &[String], yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete {} document(s)? [y/N] ", selectors.len()))? {
        println!("{}", "Aborted.".dimmed());
        return Ok(());
    }
    let result = ctx.api.delete_documents(selectors)?;
    print_messages(&result.messages);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn handle_export(
    ctx: &AppContext,
    selector: &str,
    format: Option<String>,
    name: Option<String>,
    out: &Path,
) -> Result<()> {
    let format = format
        .map(|f| f.parse::<ExportFormat>())
        .transpose()?;
    let result = ctx
        .api
        .export_document(selector, format, name.as_deref(), out)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_page(ctx: &AppContext, path: &str) -> Result<()> {
    let (route, result) = ctx.api.page(path)?;
    let page = route.page();
    print_page(page.title, result.rendered.as_deref().unwrap_or_default());

    if route.shows_documents() {
        println!();
        if route.is_compact() {
            print_documents_compact(&result.listed_docs);
        } else {
            print_documents(&result.listed_docs);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
