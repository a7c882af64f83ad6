use super::ChatState;
use crate::core::error::AskError;
use crate::providers::Role;

use console::style;

const PREVIEW_CHARS: usize = 72;

pub trait CommandHandler {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, AskError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct ContextCommand;
pub struct HistoryCommand;
pub struct SelectCommand;

/// First line of `text`, cut to a readable width.
fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let mut out: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || text.lines().nth(1).is_some() {
        out.push('…');
    }
    out
}

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AskError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, AskError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = [
            title.to_string(),
            QuitCommand.help().to_string(),
            HelpCommand.help().to_string(),
            ClearCommand.help().to_string(),
            ContextCommand.help().to_string(),
            HistoryCommand.help().to_string(),
            SelectCommand.help().to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AskError> {
        state.session.clear();
        Ok(Some("Conversation cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Start over with an empty conversation (/history is kept)"
    }
}

impl CommandHandler for ContextCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AskError> {
        let context = state.session.context();
        if context.is_empty() {
            return Ok(Some("Context is empty.".to_string()));
        }

        let lines: Vec<String> = context
            .iter()
            .enumerate()
            .map(|(i, msg)| {
                let role = match msg.role() {
                    Role::User => style("user").bold().cyan(),
                    Role::Assistant => style("assistant").bold().magenta(),
                };
                format!("{:>2}. {}: {}", i + 1, role, preview(msg.content()))
            })
            .collect();

        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/context - Show the messages resent with the next prompt"
    }
}

impl CommandHandler for HistoryCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, AskError> {
        let history = state.session.history();
        if history.is_empty() {
            return Ok(Some("No exchanges yet.".to_string()));
        }

        let lines: Vec<String> = history
            .iter()
            .map(|exchange| {
                let mut line = format!(
                    "[{}] {}",
                    style(exchange.timestamp.format("%H:%M:%S")).dim(),
                    preview(&exchange.prompt)
                );
                if let Some(selected) = &exchange.selected_text {
                    line.push_str(&format!(" {}", style(format!("(on \"{}\")", preview(selected))).dim()));
                }
                line.push_str(&format!("\n    → {}", preview(&exchange.reply)));
                line
            })
            .collect();

        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/history - List the prompts and replies of this session"
    }
}

impl CommandHandler for SelectCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, AskError> {
        if args.is_empty() {
            state.session.select("");
            return Ok(Some("Selection cleared.".to_string()));
        }

        state.session.select(args.join(" "));
        Ok(Some(format!(
            "Selection set; the next prompt will refer to \"{}\".",
            preview(state.session.selection().unwrap_or_default())
        )))
    }

    fn help(&self) -> &'static str {
        "/select <text> - Attach text to the next prompt (no text clears it)"
    }
}

#[cfg(test)]
mod tests {
    use super::preview;

    #[test]
    fn preview_marks_truncation() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("two\nlines"), "two…");
        let long = "x".repeat(100);
        assert_eq!(preview(&long).chars().count(), 73);
    }
}
