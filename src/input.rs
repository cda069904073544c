use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config;
use crate::core::error::ChatError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as EditorConfig, Context, EditMode, Editor, Helper};
use std::borrow::Cow;
use tokio::sync::mpsc;

/// What the input thread hands to the chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Eof,
}

/// Completes `/command` names, model ids after `/model` and connector ids
/// after `/toggle`
pub struct ChatCompleter {
    command_registry: CommandDispatcher,
    model_ids: Vec<String>,
    connector_ids: Vec<String>,
}

impl ChatCompleter {
    pub fn new(
        command_registry: CommandDispatcher,
        model_ids: Vec<String>,
        connector_ids: Vec<String>,
    ) -> Self {
        Self {
            command_registry,
            model_ids,
            connector_ids,
        }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let head = &line[..pos];
        let Some(command_line) = head.strip_prefix('/') else {
            return (pos, Vec::new());
        };

        let (pool, start, word): (Vec<String>, usize, &str) = match command_line.find(' ') {
            None => (self.command_registry.get_command_names(), 1, command_line),
            Some(space) => {
                let command = &command_line[..space];
                let word_start = head.rfind(' ').map(|i| i + 1).unwrap_or(pos);
                let pool = match command {
                    "model" => self.model_ids.clone(),
                    "toggle" => self.connector_ids.clone(),
                    _ => Vec::new(),
                };
                (pool, word_start, &head[word_start..])
            }
        };

        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.starts_with(word))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        (start, matches)
    }
}

impl Completer for ChatCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

/// Helper struct that combines all rustyline components
pub struct ChatHelper {
    completer: ChatCompleter,
    highlighter: MatchingBracketHighlighter,
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(completer: ChatCompleter) -> Self {
        Self {
            completer,
            highlighter: MatchingBracketHighlighter::new(),
            hinter: HistoryHinter::new(),
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: CmdKind) -> bool {
        self.highlighter.highlight_char(line, pos, kind)
    }
}

impl Validator for ChatHelper {}

pub type ChatEditor = Editor<ChatHelper, FileHistory>;

/// Creates a configured rustyline editor
pub fn create_editor(completer: ChatCompleter) -> Result<ChatEditor, ChatError> {
    let config = EditorConfig::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(ChatHelper::new(completer)));

    let _ = editor.load_history(&Config::history_path());
    Ok(editor)
}

/// Reads a line of input using rustyline
pub fn read_input(editor: &mut ChatEditor) -> Result<Option<String>, ChatError> {
    let prompt = style("> ").bold().cyan().to_string();
    match editor.readline(&prompt) {
        Ok(line) => {
            // only slash commands are remembered between runs
            if line.starts_with('/') && !line.trim().is_empty() {
                editor
                    .add_history_entry(&line)
                    .map_err(|e| ChatError::Input(format!("Failed to add history entry: {}", e)))?;
                if let Err(e) = save_history(editor) {
                    tracing::debug!(error = %e, "could not save input history");
                }
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(ChatError::Input(format!("Input error: {}", err))),
    }
}

fn save_history(editor: &mut ChatEditor) -> Result<(), ChatError> {
    let history_path = Config::history_path();
    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| ChatError::Input(format!("Failed to save history: {}", e)))
}

/// Runs the blocking line editor on its own thread so replies can be shown
/// while the user is typing
pub fn spawn_input_thread(completer: ChatCompleter) -> mpsc::UnboundedReceiver<InputEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut editor = match create_editor(completer) {
            Ok(editor) => editor,
            Err(e) => {
                tracing::warn!(error = %e, "line editor unavailable");
                let _ = tx.send(InputEvent::Eof);
                return;
            }
        };
        loop {
            let event = match read_input(&mut editor) {
                Ok(Some(line)) => InputEvent::Line(line),
                Ok(None) => InputEvent::Eof,
                Err(e) => {
                    tracing::warn!(error = %e, "input error");
                    InputEvent::Eof
                }
            };
            let done = event == InputEvent::Eof;
            if tx.send(event).is_err() || done {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;

    fn completer() -> ChatCompleter {
        ChatCompleter::new(
            create_command_registry(),
            vec!["claude-4-opus".to_string(), "gpt-4-turbo".to_string()],
            vec!["web".to_string(), "database".to_string()],
        )
    }

    fn replacements(line: &str) -> (usize, Vec<String>) {
        let (start, pairs) = completer().candidates(line, line.len());
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn completes_command_names() {
        let (start, names) = replacements("/to");
        assert_eq!(start, 1);
        assert_eq!(names, vec!["toggle"]);
    }

    #[test]
    fn completes_model_and_connector_ids() {
        let (start, models) = replacements("/model cl");
        assert_eq!(start, 7);
        assert_eq!(models, vec!["claude-4-opus"]);

        let (_, connectors) = replacements("/toggle web d");
        assert_eq!(connectors, vec!["database"]);
    }

    #[test]
    fn plain_text_has_no_completions() {
        let (_, none) = replacements("hello wor");
        assert!(none.is_empty());
    }
}
