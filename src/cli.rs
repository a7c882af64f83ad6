use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Question to ask (defaults to asking for an explanation of the selection)
    pub prompt: Option<String>,

    /// Text the question is about; read from stdin when piped and not given
    #[arg(short, long)]
    pub selection: Option<String>,

    /// Start an interactive chat session
    #[arg(short, long)]
    pub chat: bool,

    /// Send a short test prompt to verify the configured provider and key
    #[arg(long)]
    pub check: bool,

    /// Provider to use instead of the configured one [possible values: openai, anthropic, mistralai]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Seconds to wait for a reply before giving up
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Settings file (defaults to ~/.askai/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log dispatch details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_shot_question() {
        let args = Args::try_parse_from(["askai", "what does this mean?", "-s", "idempotent"]).unwrap();
        assert_eq!(args.prompt.as_deref(), Some("what does this mean?"));
        assert_eq!(args.selection.as_deref(), Some("idempotent"));
        assert!(!args.chat);
        assert_eq!(args.timeout, 30);
    }

    #[test]
    fn parses_chat_flags() {
        let args = Args::try_parse_from(["askai", "-c", "-p", "anthropic", "-t", "5"]).unwrap();
        assert!(args.chat);
        assert!(args.prompt.is_none());
        assert_eq!(args.provider.as_deref(), Some("anthropic"));
        assert_eq!(args.timeout, 5);
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(Args::try_parse_from(["askai", "-t", "0"]).is_err());
        assert!(Args::try_parse_from(["askai", "-t", "1"]).is_ok());
    }
}
