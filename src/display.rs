use crate::core::error::{AskError, ErrorKind};
use console::style;
use termimad::MadSkin;

fn skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.bold.set_fg(termimad::crossterm::style::Color::White);
    skin
}

/// Prints a reply, rendering markdown when the terminal supports it.
pub fn display_response(response: &str) {
    if console::Term::stdout().is_term() {
        println!("\n{}", style("🤖 AI RESPONSE").bold().blue());
        skin().print_text(response);
    } else {
        println!("{}", response);
    }
}

/// Prints a failure as a single line, styled by its class.
pub fn display_error(err: &AskError) {
    let label = match err.kind() {
        _ if matches!(err, AskError::Input(_)) => style("✋ INPUT").bold().yellow(),
        ErrorKind::Configuration => style("⚙  CONFIGURATION").bold().yellow(),
        ErrorKind::Provider => style("❌ PROVIDER").bold().red(),
        ErrorKind::Transport => style("🔌 NETWORK").bold().red(),
    };

    eprintln!("{} {}", label, err.user_message());
}

pub fn display_info(message: &str) {
    println!("{}", style(message).dim());
}

pub fn display_thinking() {
    eprintln!("{}", style("… waiting for reply").dim().italic());
}

pub fn display_welcome(provider: &str, timeout_secs: u64) {
    println!(
        "{} {}",
        style("askai chat").bold().cyan(),
        style(format!("(provider: {}, timeout: {}s)", provider, timeout_secs)).dim()
    );
    println!("Type '/help' for available commands. Press Ctrl+D or type /quit to exit.");
}
