use crate::repl::Repl;
use summit::error::Result;
use summit::Mode;

pub mod builtin;

/// All available commands as strings (for autocomplete)
pub static COMMANDS: &[&str] = &[
    "/exit",
    "/quit",
    "/q",
    "/help",
    "/chat",
    "/summary",
    "/summarize",
    "/mode",
    "/clear",
    "/reset",
    "/usage",
    "/raw",
    "/history",
    "/lang",
    "/lang off",
];

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue REPL loop
    Continue,
    /// Exit REPL loop
    Exit,
}

/// Enum representing all available REPL commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    SwitchMode(Mode),
    ShowMode,
    Clear,
    Reset,
    Usage,
    Raw,
    History,
    Language(Option<String>),
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (name, arg) = match input.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (input, ""),
        };

        match name.to_lowercase().as_str() {
            "/exit" | "/quit" | "/q" => Some(Command::Exit),
            "/help" | "/?" => Some(Command::Help),
            "/chat" => Some(Command::SwitchMode(Mode::Chat)),
            "/summary" | "/summarize" => Some(Command::SwitchMode(Mode::Summary)),
            "/mode" => Some(Command::ShowMode),
            "/clear" => Some(Command::Clear),
            "/reset" => Some(Command::Reset),
            "/usage" => Some(Command::Usage),
            "/raw" => Some(Command::Raw),
            "/history" => Some(Command::History),
            "/lang" => match arg {
                "" | "off" | "none" => Some(Command::Language(None)),
                tag => Some(Command::Language(Some(tag.to_string()))),
            },
            _ => None,
        }
    }

    pub fn execute(&self, repl: &mut Repl) -> Result<CommandResult> {
        match self {
            Command::Exit => builtin::exit_command(repl),
            Command::Help => builtin::help_command(),
            Command::SwitchMode(mode) => builtin::switch_mode_command(repl, *mode),
            Command::ShowMode => builtin::show_mode_command(repl),
            Command::Clear => builtin::clear_command(repl),
            Command::Reset => builtin::reset_command(repl),
            Command::Usage => builtin::usage_command(repl),
            Command::Raw => builtin::raw_command(repl),
            Command::History => builtin::history_command(repl),
            Command::Language(tag) => builtin::language_command(repl, tag.clone()),
        }
    }
}

/// One unit of user input: a command to run or a message to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Message(String),
    UnknownCommand(String),
}

impl Input {
    /// Classify one editor buffer. Returns `None` for blank input.
    ///
    /// A leading `//` sends the rest as a message starting with `/`.
    /// Commands are single-line; a multi-line buffer is never a command.
    pub fn classify(buffer: &str) -> Option<Self> {
        let text = buffer.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(escaped) = text.strip_prefix("//") {
            return Some(Input::Message(format!("/{}", escaped)));
        }

        if text.starts_with('/') {
            if !text.contains('\n') {
                if let Some(command) = Command::parse(text) {
                    return Some(Input::Command(command));
                }
            }
            let name = text.split_whitespace().next().unwrap_or(text);
            return Some(Input::UnknownCommand(name.to_string()));
        }

        Some(Input::Message(text.to_string()))
    }

    /// Split non-interactive input into units. Every line that parses as a
    /// command stands alone; the lines between commands, blank lines
    /// included, form a single message.
    pub fn batch(text: &str) -> Vec<Self> {
        let mut inputs = Vec::new();
        let mut pending = String::new();

        for line in text.lines() {
            if let Some(command) = Command::parse(line) {
                inputs.extend(Self::classify(&pending));
                pending.clear();
                inputs.push(Input::Command(command));
            } else {
                pending.push_str(line);
                pending.push('\n');
            }
        }
        inputs.extend(Self::classify(&pending));
        inputs
    }
}
