use crate::render::MarkdownRenderer;
use chrono::Local;
use colored::Colorize;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use summit::{Message, Mode, Role, SessionState, SummitError, UsageTotals};

/// Message severity levels for consistent UI feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageSeverity {
    Warning,
    Error,
    Info,
}

impl MessageSeverity {
    pub fn prefix(&self) -> colored::ColoredString {
        match self {
            Self::Warning => "Warning:".bright_yellow().bold(),
            Self::Error => "Error:".bright_red().bold(),
            Self::Info => "Info:".bright_cyan().bold(),
        }
    }
}

/// Stops the spinner thread and restores the cursor when dropped.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_anim = Arc::clone(&running);

        let handle = thread::spawn(move || {
            let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let mut frame_idx = 0;
            let mut out = io::stdout();
            let _ = execute!(out, Hide);

            while running_anim.load(Ordering::SeqCst) {
                print!(
                    "\r{} {}",
                    frames[frame_idx].truecolor(0xFF, 0x99, 0x33),
                    message.truecolor(0xFF, 0x99, 0x33),
                );
                let _ = out.flush();
                frame_idx = (frame_idx + 1) % frames.len();
                thread::sleep(Duration::from_millis(80));
            }

            print!("\r{}\r", " ".repeat(message.chars().count() + 4));
            let _ = execute!(out, Show);
            let _ = out.flush();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// UI utilities for displaying messages and session details
pub struct UI {
    renderer: MarkdownRenderer,
}

impl UI {
    pub fn new() -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn print_message(severity: MessageSeverity, message: &str) {
        eprintln!("{} {}", severity.prefix(), message);
    }

    pub fn print_warning(message: &str) {
        Self::print_message(MessageSeverity::Warning, message);
    }

    pub fn print_error(message: &str) {
        Self::print_message(MessageSeverity::Error, message);
    }

    pub fn print_info(message: &str) {
        Self::print_message(MessageSeverity::Info, message);
    }

    pub fn print_error_with_hint(error: &SummitError) {
        eprintln!("{} {}", MessageSeverity::Error.prefix(), error);
        if let Some(hint) = error.hint() {
            eprintln!("  {} {}", "Hint:".bright_cyan(), hint);
        }
    }

    pub fn print_welcome(mode: Mode, base_url: &str) {
        println!("{}", "Summit - Chat & Summarize".bright_cyan().bold());
        println!("{} {}", "Backend:".bright_green(), base_url.dimmed());
        println!("{} {}", "Mode:".bright_green(), mode.label());
        println!("{}", "Type your message, or /help for commands.".dimmed());
        println!();
    }

    pub fn print_goodbye() {
        println!("{}", "Goodbye!".bright_cyan());
    }

    pub fn print_help() {
        let rows = [
            ("/chat", "Switch to chat mode (multi-turn)"),
            ("/summary", "Switch to summary mode (one input at a time)"),
            ("/mode", "Show the current mode"),
            ("/clear", "Clear the current mode's conversation"),
            ("/reset", "Clear both conversations and token usage"),
            ("/usage", "Show token usage per mode"),
            ("/raw", "Show the raw reply behind the last answer"),
            ("/history", "Show the current mode's conversation"),
            ("/lang <tag>", "Ask for answers in a language (/lang off to stop)"),
            ("/exit", "Quit"),
            ("//text", "Send a message that starts with '/'"),
            ("Alt+Enter", "Insert a newline (pasted text keeps its lines)"),
        ];
        println!();
        for (command, description) in rows {
            println!("  {:<14} {}", command.bright_green(), description.dimmed());
        }
        println!();
    }

    pub fn print_message_header(message: &Message) {
        let time = message
            .created_at()
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string();
        let speaker = match message.role() {
            Role::User => "You".bright_green().bold(),
            Role::Assistant => "Assistant".bright_blue().bold(),
        };
        println!("{} {}", speaker, time.dimmed());
    }

    pub fn print_assistant(&self, message: &Message) {
        Self::print_message_header(message);
        println!("{}", self.renderer.render(message.content()));
        if let Some(metadata) = message.metadata() {
            println!(
                "{}",
                format!(
                    "{} · {:.2}s · {} tokens",
                    metadata.model,
                    metadata.execution_time_seconds,
                    Self::format_number(metadata.total_tokens)
                )
                .dimmed()
            );
        }
    }

    pub fn display_conversation(&self, mode: Mode, messages: &[Message]) {
        if messages.is_empty() {
            println!(
                "{}",
                format!("No {} messages yet.", mode.label().to_lowercase()).dimmed()
            );
            return;
        }

        println!("{}", "═".repeat(60).bright_cyan());
        println!("{}", format!("{} conversation", mode.label()).bright_cyan().bold());
        println!("{}", "═".repeat(60).bright_cyan());
        println!();

        for message in messages {
            match message.role() {
                Role::User => {
                    Self::print_message_header(message);
                    println!("{}", message.content());
                }
                Role::Assistant => self.print_assistant(message),
            }
            println!();
        }
    }

    pub fn display_raw(message: Option<&Message>) {
        let Some(metadata) = message.and_then(|m| m.metadata()) else {
            println!("{}", "No reply in this mode yet.".dimmed());
            return;
        };

        let pretty = serde_json::from_str::<serde_json::Value>(&metadata.raw_payload)
            .and_then(|value| serde_json::to_string_pretty(&value))
            .unwrap_or_else(|_| metadata.raw_payload.clone());
        println!("{}", "Raw response:".bright_cyan().bold());
        println!("{}", pretty.dimmed());
    }

    pub fn display_usage(state: &SessionState) {
        println!();
        println!("{}", "─".repeat(50).bright_cyan());
        println!("{}", "Token Usage".bright_cyan().bold());
        println!("{}", "─".repeat(50).bright_cyan());
        println!(
            "{:<12} {:>12} {:>12} {:>12}",
            "".bright_white(),
            "Input".bright_white(),
            "Output".bright_white(),
            "Total".bright_white()
        );
        for mode in Mode::ALL {
            Self::print_usage_row(mode, &state.usage_totals(mode));
        }
        println!("{}", "─".repeat(50).bright_cyan());
        println!();
    }

    fn print_usage_row(mode: Mode, totals: &UsageTotals) {
        println!(
            "{:<12} {:>12} {:>12} {:>12}",
            mode.label().bright_white(),
            Self::format_number(totals.input_tokens).bright_green(),
            Self::format_number(totals.output_tokens).bright_green(),
            Self::format_number(totals.total_tokens).bright_green()
        );
    }

    pub fn display_session_summary(state: &SessionState) {
        if Mode::ALL
            .iter()
            .all(|mode| state.usage_totals(*mode).is_empty())
        {
            return;
        }
        Self::display_usage(state);
    }

    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();
        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result.chars().rev().collect()
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_prefixes() {
        colored::control::set_override(false);
        assert_eq!(MessageSeverity::Error.prefix().to_string(), "Error:");
        assert_eq!(MessageSeverity::Warning.prefix().to_string(), "Warning:");
        assert_eq!(MessageSeverity::Info.prefix().to_string(), "Info:");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(UI::format_number(0), "0");
        assert_eq!(UI::format_number(999), "999");
        assert_eq!(UI::format_number(1_000), "1,000");
        assert_eq!(UI::format_number(20_000_001), "20,000,001");
    }
}
