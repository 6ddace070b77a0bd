//! Terminal front end for the notes service.
//!
//! # Responsibility
//! - Stand in for the view layer: build one store, invoke its actions and
//!   render the resulting snapshot.
//! - Exit non-zero whenever the final state carries an error.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tagnote_core::{
    default_log_level, init_logging, AppState, ClientConfig, EditorSession, HttpNotesClient, Note,
    NoteId, Store,
};

#[derive(Debug, Parser)]
#[command(name = "tagnote", version, about = "Browse and edit tagged notes")]
struct Cli {
    /// Log level: trace|debug|info|warn|error. Defaults to `warn` on stderr
    /// and to the build's default level when writing files.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rotating log files. Logs go to stderr otherwise.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List notes, optionally filtered.
    List {
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, short)]
        tag: Option<String>,
    },
    /// Print the tag catalogue.
    Tags,
    /// Show one note.
    Show { id: String },
    /// Create an untitled note, tagged with `--tag` when given.
    New {
        #[arg(long, short)]
        tag: Option<String>,
    },
    /// Edit a note's title, content or tags.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Tag to add; repeatable.
        #[arg(long = "tag", short)]
        tags: Vec<String>,
        /// Tag to remove; repeatable.
        #[arg(long = "untag")]
        untags: Vec<String>,
    },
    /// Delete a note.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

impl Cli {
    fn effective_log_level(&self) -> &str {
        match (&self.log_level, &self.log_dir) {
            (Some(level), _) => level.as_str(),
            (None, Some(_)) => default_log_level(),
            (None, None) => "warn",
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    init_logging(cli.effective_log_level(), cli.log_dir.as_deref())
        .context("failed to initialize logging")?;
    let config = ClientConfig::from_env().context("invalid client configuration")?;
    let client = HttpNotesClient::new(&config).context("failed to build http client")?;
    log::info!(
        "event=cli_start module=cli status=ok base_url={}",
        client.base_url()
    );

    let store = Store::new(client);
    store.load_initial().await;
    execute(&store, cli.command).await;

    let state = store.state();
    if let Some(message) = &state.error {
        eprintln!("error: {message}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn execute(store: &Store<HttpNotesClient>, command: Command) {
    let mut session = EditorSession::new();
    match command {
        Command::List { query, tag } => {
            if let Some(query) = query {
                store.set_query(query).await;
            }
            if let Some(tag) = tag {
                store.set_active_tag(tag).await;
            }
            print_list(&store.state());
        }
        Command::Tags => {
            for tag in &store.state().tags {
                println!("{tag}");
            }
        }
        Command::Show { id } => {
            if store.open_note(&NoteId::new(id)).await.is_some() {
                print_selected(&store.state());
            }
        }
        Command::New { tag } => {
            if let Some(tag) = tag {
                store.set_active_tag(tag).await;
            }
            if let Some(note) = store.create_note().await {
                println!("created {}", note.id);
            }
        }
        Command::Edit {
            id,
            title,
            content,
            tags,
            untags,
        } => {
            if store.open_note(&NoteId::new(id)).await.is_none() {
                return;
            }
            session.sync(&store.state());
            session.begin_edit();
            if let Some(title) = title {
                session.set_title(title);
            }
            if let Some(content) = content {
                session.set_content(content);
            }
            for tag in &tags {
                session.add_tag(tag);
            }
            for tag in &untags {
                session.remove_tag(tag);
            }
            if session.save(store).await.is_some() {
                print_selected(&store.state());
            }
        }
        Command::Delete { id, yes } => {
            if store.open_note(&NoteId::new(id)).await.is_none() {
                return;
            }
            session.sync(&store.state());
            let deleted = session
                .delete(store, |note| yes || confirm_delete(note))
                .await;
            if deleted {
                println!("deleted");
            } else if store.state().error.is_none() {
                println!("cancelled");
            }
        }
    }
}

fn confirm_delete(note: &Note) -> bool {
    print!("Delete \"{}\"? [y/N] ", note.display_title());
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn print_list(state: &AppState) {
    if state.notes.is_empty() {
        println!("no notes");
        return;
    }
    println!("{} items", state.notes.len());
    for note in &state.notes {
        let marker = if state.is_selected(&note.id) { '*' } else { ' ' };
        println!("{marker} {}  {}{}", note.id, note.display_title(), tag_suffix(note));
        let preview = note.preview();
        if !preview.is_empty() {
            println!("    {preview}");
        }
    }
}

fn print_selected(state: &AppState) {
    let Some(note) = state.selected_note() else {
        println!("no note selected");
        return;
    };
    println!("{}{}", note.display_title(), tag_suffix(note));
    println!("id: {}", note.id);
    println!();
    println!("{}", note.content);
}

fn tag_suffix(note: &Note) -> String {
    if note.tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", note.tags.join(", "))
    }
}
