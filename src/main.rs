use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};
use smart_notes::{
    Config, ContextScope, GeminiError, ListFilter, NewNote, NoteId, NoteService, NoteUpdate,
    ServiceError, display,
};

/// notes - personal notes with search and AI insights
#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Personal notes with search, analytics and AI-powered answers")]
#[command(version)]
struct Cli {
    /// Notes file to use instead of NOTES_FILE or the default location
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Add a new note
    Add(AddCommand),
    /// List notes, optionally filtered by tag or type
    List(ListCommand),
    /// Search notes by text
    Search(SearchCommand),
    /// Update fields of an existing note
    Update(UpdateCommand),
    /// Delete a note
    Delete(DeleteCommand),
    /// Ask the AI a question about your notes
    Ask(AskCommand),
    /// Write a quick journal entry with automatic tags
    Journal(JournalCommand),
    /// Show statistics about your notes
    Stats,
    /// Show mood trends
    Mood,
    /// Generate an AI insights report from all notes
    Analyze,
}

/// Add a new note
#[derive(Args)]
struct AddCommand {
    /// Title of the note (prompted for when omitted)
    #[arg(long)]
    title: Option<String>,

    /// Content of the note (read from stdin when omitted)
    #[arg(long)]
    content: Option<String>,

    /// Comma-separated tags to apply to the note
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,

    /// Note type, e.g. journal or idea
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,

    /// Mood rating from 1 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    mood: Option<u8>,

    /// Energy rating from 1 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    energy: Option<u8>,
}

#[derive(Args)]
struct ListCommand {
    /// Only notes carrying this tag
    #[arg(long)]
    tag: Option<String>,

    /// Only notes of this type
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,
}

#[derive(Args)]
struct SearchCommand {
    /// Text to look for in titles, content and tags
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[derive(Args)]
struct UpdateCommand {
    /// Id of the note to update
    id: NoteId,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    content: Option<String>,

    /// Comma-separated tags replacing the current ones
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,

    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,
}

#[derive(Args)]
struct DeleteCommand {
    /// Id of the note to delete
    id: NoteId,
}

#[derive(Args)]
struct AskCommand {
    /// Only send the notes most related to the question
    #[arg(long)]
    relevant_only: bool,

    /// How many related notes to send with --relevant-only
    #[arg(long, value_name = "N", default_value_t = smart_notes::ranker::DEFAULT_TOP_K,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    top_k: usize,

    /// The question to ask
    #[arg(required = true, num_args = 1..)]
    question: Vec<String>,
}

#[derive(Args)]
struct JournalCommand {
    /// Entry title (defaults to "Journal - <today>")
    #[arg(long)]
    title: Option<String>,

    /// Mood rating from 1 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    mood: Option<u8>,

    /// Energy rating from 1 to 10
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    energy: Option<u8>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        if is_transient(&e) {
            eprintln!("The AI service may be temporarily unavailable; try again shortly.");
        }
        std::process::exit(exit_code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env().with_notes_file(cli.file);
    log::debug!("using notes file {}", config.notes_file.display());

    let mut service = NoteService::from_config(&config);

    let output = match cli.command {
        Commands::Add(cmd) => {
            let stdin = io::stdin();
            execute_add(cmd, &mut service, &mut stdin.lock())?
        }
        Commands::Journal(cmd) => {
            let stdin = io::stdin();
            execute_journal(cmd, &mut service, &mut stdin.lock())?
        }
        Commands::List(cmd) => execute_list(&cmd, &service),
        Commands::Search(cmd) => execute_search(&cmd, &service)?,
        Commands::Update(cmd) => execute_update(cmd, &mut service)?,
        Commands::Delete(cmd) => execute_delete(&cmd, &mut service)?,
        Commands::Ask(cmd) => execute_ask(cmd, service)?,
        Commands::Stats => display::statistics(service.statistics().as_ref()),
        Commands::Mood => display::mood_trends(service.mood_trends().as_ref()),
        Commands::Analyze => display::analysis(&service.analyze_patterns()?),
    };

    println!("{}", output.trim_end());
    Ok(())
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are validation failures, unknown ids and missing AI
/// configuration. Everything else (I/O, network) is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<ServiceError>()
            .is_some_and(ServiceError::is_user_error)
    })
}

/// True when the failure came from a remote call that may succeed later.
fn is_transient(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| match cause.downcast_ref::<ServiceError>() {
        Some(ServiceError::Gemini(gemini)) => gemini.is_transient(),
        _ => cause
            .downcast_ref::<GeminiError>()
            .is_some_and(GeminiError::is_transient),
    })
}

/// Executes the add command, reading missing fields from `input`.
fn execute_add(cmd: AddCommand, service: &mut NoteService, input: &mut impl BufRead) -> Result<String> {
    let title = match cmd.title {
        Some(title) => title,
        None => prompt_line("Title: ", input)?,
    };
    let content = match cmd.content {
        Some(content) => content,
        None => {
            eprintln!("Enter note content (press Ctrl+D when done):");
            read_all(input)?
        }
    };

    let note = service.add_note(NewNote {
        title,
        content,
        tags: cmd.tags.as_deref().map(parse_tags).unwrap_or_default(),
        kind: cmd.kind,
        mood: cmd.mood,
        energy_level: cmd.energy,
    })?;

    Ok(display::note_saved(note))
}

fn execute_journal(
    cmd: JournalCommand,
    service: &mut NoteService,
    input: &mut impl BufRead,
) -> Result<String> {
    eprintln!("Share what's on your mind today (press Ctrl+D when done):");
    let content = read_all(input)?;

    let note = service.quick_journal(cmd.title, content, cmd.mood, cmd.energy)?;
    Ok(display::journal_saved(note))
}

fn execute_list(cmd: &ListCommand, service: &NoteService) -> String {
    let filter = ListFilter {
        tag: cmd.tag.clone(),
        kind: cmd.kind.clone(),
    };
    display::note_list(&service.list(&filter), &filter)
}

fn execute_search(cmd: &SearchCommand, service: &NoteService) -> Result<String> {
    let query = cmd.query.join(" ");
    let matches = service.search(&query)?;
    Ok(display::search_results(query.trim(), &matches))
}

fn execute_update(cmd: UpdateCommand, service: &mut NoteService) -> Result<String> {
    let update = NoteUpdate {
        title: cmd.title,
        content: cmd.content,
        tags: cmd.tags.as_deref().map(parse_tags),
        kind: cmd.kind,
    };

    let note = service.update_note(&cmd.id, update)?;
    Ok(format!("Note '{}' updated", note.title))
}

fn execute_delete(cmd: &DeleteCommand, service: &mut NoteService) -> Result<String> {
    let note = service.delete_note(&cmd.id)?;
    Ok(format!("Note '{}' deleted", note.title))
}

fn execute_ask(cmd: AskCommand, service: NoteService) -> Result<String> {
    let scope = if cmd.relevant_only {
        ContextScope::RelevantOnly
    } else {
        ContextScope::AllNotes
    };
    let question = cmd.question.join(" ");

    let service = service.with_top_k(cmd.top_k);
    eprintln!("Asking AI about: '{question}'");
    let answer = service.ask(&question, scope)?;
    Ok(display::answer(&answer))
}

/// Prints `prompt` to stderr and reads one line from `input`.
fn prompt_line(prompt: &str, input: &mut impl BufRead) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush().context("Failed to write prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn read_all(input: &mut impl BufRead) -> Result<String> {
    let mut content = String::new();
    input
        .read_to_string(&mut content)
        .context("Failed to read content from stdin")?;
    Ok(content.trim().to_string())
}

/// Parses comma-separated tags from a string.
///
/// Splits on commas, trims whitespace from each tag, and filters out empty strings.
fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
