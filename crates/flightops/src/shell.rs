//! Interactive shell.
//!
//! Reads lines with rustyline, parses them with the same clap command tree
//! as the command line, and runs them against one open [`App`].

use std::io::Write;

use clap::{CommandFactory, Parser};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Context, Editor, Helper, Highlighter, Hinter, Validator};
use tracing::{debug, warn};

use crate::app::App;
use crate::cli::ShellLine;
use crate::error::{Error, Result};

const PROMPT: &str = "flightops> ";
const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

/// What the loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Leave the shell.
    Exit,
}

/// Tab completion over the command tree.
#[derive(Debug, Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    commands: Vec<(String, Vec<String>)>,
}

impl CompleteHelper {
    /// Build the completion table from the shell's command tree.
    #[must_use]
    pub fn new() -> Self {
        let root = ShellLine::command();
        let mut commands: Vec<(String, Vec<String>)> = root
            .get_subcommands()
            .map(|cmd| {
                let subcommands = cmd
                    .get_subcommands()
                    .map(|sub| sub.get_name().to_string())
                    .collect();
                (cmd.get_name().to_string(), subcommands)
            })
            .collect();
        for word in EXIT_WORDS {
            commands.push((word.to_string(), Vec::new()));
        }
        Self { commands }
    }

    /// Candidates for the word under the cursor, with the byte offset where
    /// that word starts.
    #[must_use]
    pub fn candidates(&self, line: &str) -> (usize, Vec<Pair>) {
        let start = line.rfind(char::is_whitespace).map_or(0, |i| i + 1);
        let prefix = &line[start..];
        let before: Vec<&str> = line[..start].split_whitespace().collect();

        let words: Vec<&String> = match before.as_slice() {
            [] => self.commands.iter().map(|(name, _)| name).collect(),
            [command] => self
                .commands
                .iter()
                .find(|(name, _)| name == command)
                .map(|(_, subs)| subs.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let pairs = words
            .into_iter()
            .filter(|word| word.starts_with(prefix))
            .map(|word| Pair {
                display: word.clone(),
                replacement: format!("{word} "),
            })
            .collect();
        (start, pairs)
    }
}

impl Default for CompleteHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(&line[..pos]))
    }
}

/// Split a line into words, honouring single and double quotes.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an unterminated quote.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(Error::validation("command", "unterminated quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Run one shell line against `app`.
///
/// Usage errors are printed to `out` rather than returned so the shell keeps
/// going.
///
/// # Errors
///
/// Returns the command's error, or an I/O error if `out` cannot be written.
pub fn dispatch(app: &App, line: &str, out: &mut dyn Write) -> Result<Flow> {
    let words = tokenize(line)?;
    let Some(first) = words.first() else {
        return Ok(Flow::Continue);
    };

    if EXIT_WORDS.contains(&first.as_str()) {
        return Ok(Flow::Exit);
    }
    if (first == "help" && words.len() == 1) || first == "?" {
        writeln!(out, "{}", ShellLine::command().render_help())?;
        writeln!(out, "Type 'exit' or 'quit' (or press Ctrl-D) to leave.")?;
        return Ok(Flow::Continue);
    }

    match ShellLine::try_parse_from(&words) {
        Ok(parsed) => app.execute(parsed.command, out)?,
        Err(e) => write!(out, "{e}")?,
    }
    Ok(Flow::Continue)
}

/// Run the interactive shell until `exit` or end of input.
///
/// # Errors
///
/// Returns an error if the line editor fails.
pub fn run(app: &App) -> Result<()> {
    let interface = &app.config().interface;
    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .max_history_size(interface.history_size)?
        .build();

    let mut rl: Editor<CompleteHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(CompleteHelper::new()));

    let history = app.config().history_path();
    if let Some(parent) = history.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    if rl.load_history(&history).is_err() {
        debug!("No shell history at {}", history.display());
    }

    println!("flightops shell on {}. Type 'help' for commands.", app.storage().path().display());

    let mut stdout = std::io::stdout();
    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match dispatch(app, trimmed, &mut stdout) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit) => break,
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {}
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Err(e) = rl.save_history(&history) {
        warn!("Could not save shell history to {}: {}", history.display(), e);
    }
    Ok(())
}
