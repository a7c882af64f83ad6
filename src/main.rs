use askai::app::{Application, settings_path};
use askai::cli::Args;
use askai::commands::create_command_registry;
use askai::config::{FileSettingsStore, Settings, SettingsStore};
use askai::core::{error::AskError, logging};
use askai::display;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

async fn run(args: Args) -> Result<(), AskError> {
    let path = settings_path(&args);
    if let Err(e) = Settings::ensure_file(&path) {
        tracing::warn!(path = %path.display(), error = %e, "could not create settings file");
    }

    let store: Arc<dyn SettingsStore> =
        Arc::new(FileSettingsStore::new(path).with_provider_override(args.provider.clone()));

    let command_dispatcher = create_command_registry();
    let mut app = Application::new(args, store, command_dispatcher)?;
    app.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::display_error(&e);
            ExitCode::FAILURE
        }
    }
}
