use crate::cli::Args;
use crate::commands::{ChatState, dispatcher::CommandDispatcher};
use crate::config::{Settings, SettingsStore};
use crate::core::error::AskError;
use crate::display;
use crate::dispatcher::Dispatcher;
use crate::input;
use crate::session::ChatSession;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

pub struct Application {
    pub args: Args,
    pub settings: Arc<dyn SettingsStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(
        args: Args,
        settings: Arc<dyn SettingsStore>,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, AskError> {
        let dispatcher = Arc::new(Dispatcher::new(settings.clone())?);
        Ok(Self {
            args,
            settings,
            dispatcher,
            command_dispatcher,
        })
    }

    pub async fn run(&mut self) -> Result<(), AskError> {
        if self.args.check {
            return self.handle_check().await;
        }

        let piped = if self.args.selection.is_none() && !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AskError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer.trim().to_string()).filter(|s| !s.is_empty())
        } else {
            None
        };
        let selection = self.args.selection.clone().or(piped);

        if self.args.chat {
            self.handle_chat_mode(selection).await
        } else {
            self.handle_ask_mode(selection).await
        }
    }

    fn session(&self) -> ChatSession {
        ChatSession::new(self.dispatcher.clone())
            .with_timeout(Duration::from_secs(self.args.timeout))
    }

    async fn handle_check(&self) -> Result<(), AskError> {
        let settings = self.settings.load().await?;
        display::display_info(&format!("Testing {} ...", settings.api_provider));

        let timeout = Duration::from_secs(self.args.timeout);
        match tokio::time::timeout(timeout, self.dispatcher.check_connection()).await {
            Ok(Ok(_)) => {
                println!("✅ API connection successful!");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AskError::Timeout(timeout)),
        }
    }

    async fn handle_ask_mode(&self, selection: Option<String>) -> Result<(), AskError> {
        let prompt = self.args.prompt.clone().unwrap_or_default();
        if prompt.trim().is_empty() && selection.is_none() {
            return Err(AskError::Input(
                "No question provided; pass a prompt, --selection, or pipe text in".to_string(),
            ));
        }

        let mut session = self.session();
        let reply = session.send(&prompt, selection).await?;
        display::display_response(&reply);
        Ok(())
    }

    async fn handle_chat_mode(&mut self, selection: Option<String>) -> Result<(), AskError> {
        let settings = self.settings.load().await?;
        let mut state = ChatState::new(self.session());
        if let Some(text) = selection {
            state.session.select(text);
        }

        display::display_welcome(&settings.api_provider, self.args.timeout);
        if let Some(selected) = state.session.selection() {
            display::display_info(&format!(
                "Your first message will refer to the selected text ({} chars).",
                selected.chars().count()
            ));
        }

        if let Some(prompt) = self.args.prompt.clone() {
            self.send_chat_message(&mut state, &prompt).await;
        }

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        loop {
            let input = match input::read_input(&mut editor)? {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if let Some(command_line) = input.strip_prefix('/') {
                let parts: Vec<&str> = command_line.split_whitespace().collect();
                if let Some((command, args)) = parts.split_first() {
                    match self.command_dispatcher.execute(command, args, &mut state) {
                        Ok(Some(output)) => println!("{}", output),
                        Ok(None) => {}
                        Err(e) => display::display_error(&e),
                    }

                    if !state.should_continue {
                        break;
                    }
                }
                continue;
            }

            self.send_chat_message(&mut state, &input).await;
        }

        input::save_history(&mut editor)?;

        Ok(())
    }

    async fn send_chat_message(&self, state: &mut ChatState, message: &str) {
        display::display_thinking();
        match state.session.send(message, None).await {
            Ok(reply) => display::display_response(&reply),
            Err(e) => display::display_error(&e),
        }
    }
}

/// Settings path from the command line, or the default under the home directory.
pub fn settings_path(args: &Args) -> std::path::PathBuf {
    args.config.clone().unwrap_or_else(Settings::default_path)
}
