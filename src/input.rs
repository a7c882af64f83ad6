use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Settings;
use crate::core::error::AskError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};

/// Completes `/command` names and hints from the input history.
pub struct ChatHelper {
    command_registry: CommandDispatcher,
    history_hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self {
            command_registry,
            history_hinter: HistoryHinter {},
        }
    }

    fn command_candidates(&self, line: &str, pos: usize) -> Vec<Pair> {
        let Some(partial) = line.get(1..pos) else {
            return Vec::new();
        };
        if partial.contains(char::is_whitespace) {
            return Vec::new();
        }

        self.command_registry
            .get_command_names()
            .into_iter()
            .filter(|cmd| cmd.starts_with(partial))
            .map(|cmd| Pair {
                display: format!("/{}", cmd),
                replacement: cmd,
            })
            .collect()
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if line.starts_with('/') {
            return Ok((1, self.command_candidates(line, pos)));
        }
        Ok((pos, Vec::new()))
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {}

impl Validator for ChatHelper {}

/// Creates a configured rustyline editor with the saved input history loaded.
pub fn create_editor(
    command_registry: CommandDispatcher,
) -> Result<Editor<ChatHelper, FileHistory>, AskError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| AskError::Input(format!("Failed to create line editor: {}", e)))?;

    editor.set_helper(Some(ChatHelper::new(command_registry)));

    let _ = editor.load_history(&Settings::input_history_path());

    Ok(editor)
}

/// Reads one line; `None` means the user asked to leave (Ctrl-C / Ctrl-D).
pub fn read_input(
    editor: &mut Editor<ChatHelper, FileHistory>,
) -> Result<Option<String>, AskError> {
    let prompt = style("> ").bold().cyan().to_string();
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor
                    .add_history_entry(line.as_str())
                    .map_err(|e| AskError::Input(format!("Failed to add history entry: {}", e)))?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(AskError::Input(format!("Input error: {}", err))),
    }
}

pub fn save_history(editor: &mut Editor<ChatHelper, FileHistory>) -> Result<(), AskError> {
    let history_path = Settings::input_history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| AskError::Input(format!("Failed to save history: {}", e)))
}
