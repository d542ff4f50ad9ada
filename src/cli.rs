use clap::Parser;
use std::path::PathBuf;
use summit::config::ConfigFile;
use summit::Mode;

#[derive(Parser, Debug)]
#[command(
    name = "summit",
    about = "Chat with or summarize text through a Summit backend",
    long_about = "Summit is a terminal client for the Summit service. Chat mode keeps a multi-turn conversation; summary mode summarizes each input on its own. Token usage is tracked per mode.",
    version
)]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:8000/api/v1
    #[arg(long, env = "SUMMIT_BASE_URL")]
    pub base_url: Option<String>,

    /// Mode to start in
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: Option<Mode>,

    /// Language tag the backend should answer in
    #[arg(short, long, env = "SUMMIT_LANGUAGE")]
    pub language: Option<String>,

    #[arg(long)]
    pub max_input_length: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Extra config file applied after the default locations
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Prompt to send (if not provided, starts interactive REPL)
    #[arg(short, long)]
    pub prompt: Option<String>,

    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse()
}

impl Cli {
    /// Flags as the highest-priority config layer.
    pub fn overrides(&self) -> ConfigFile {
        ConfigFile {
            base_url: self.base_url.clone(),
            max_input_length: self.max_input_length,
            request_timeout_secs: self.timeout,
            respond_in_language: self.language.clone(),
            default_mode: self.mode,
        }
    }
}
