use crate::commands::{CommandResult, Input, COMMANDS};
use crate::prompt::ReplPrompt;
use crate::ui::{Spinner, UI};
use colored::Colorize;
use crossterm::tty::IsTty;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, DefaultCompleter, EditCommand, Emacs, KeyCode,
    KeyModifiers, MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal,
};
use std::io;
use summit::error::{Result, SummitError};
use summit::{HttpTransport, SessionController};

pub struct Repl {
    runtime: tokio::runtime::Runtime,
    session: SessionController<HttpTransport>,
    ui: UI,
    editor: Reedline,
    prompt: ReplPrompt,
}

impl Repl {
    pub fn new(session: SessionController<HttpTransport>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| SummitError::Config(format!("Failed to create async runtime: {}", e)))?;

        let commands: Vec<String> = COMMANDS.iter().map(|c| c.to_string()).collect();
        let mut completer = DefaultCompleter::with_inclusions(&['/', '-', '_']);
        completer = completer.set_min_word_len(1);
        completer.insert(commands);
        let completer = Box::new(completer);

        let completion_menu = ColumnarMenu::default().with_name("completion_menu");
        let completion_menu = ReedlineMenu::EngineCompleter(Box::new(completion_menu));

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu("completion_menu".into()),
                ReedlineEvent::MenuNext,
            ]),
        );
        keybindings.add_binding(
            KeyModifiers::SHIFT,
            KeyCode::BackTab,
            ReedlineEvent::MenuPrevious,
        );
        keybindings.add_binding(
            KeyModifiers::ALT,
            KeyCode::Enter,
            ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
        );

        let edit_mode = Box::new(Emacs::new(keybindings));

        // Bracketed paste keeps a pasted article in the buffer as one submission.
        let editor = Reedline::create()
            .use_bracketed_paste(true)
            .with_completer(completer)
            .with_edit_mode(edit_mode)
            .with_menu(completion_menu);

        let prompt = ReplPrompt::new(session.current_mode());

        Ok(Self {
            runtime,
            session,
            ui: UI::new(),
            editor,
            prompt,
        })
    }

    pub fn session(&self) -> &SessionController<HttpTransport> {
        &self.session
    }

    pub fn ui(&self) -> &UI {
        &self.ui
    }

    /// Warn, without failing, when the backend does not answer its health check.
    pub fn check_backend(&self) {
        let transport = self.session.transport();
        if let Err(e) = self.runtime.block_on(transport.check_health()) {
            tracing::warn!(error = %e, "Health check failed");
            UI::print_warning(&format!(
                "Backend at {} is not responding: {}",
                transport.base_url(),
                e
            ));
        }
    }

    pub fn run(&mut self) -> Result<()> {
        if !io::stdin().is_tty() {
            return self.run_piped();
        }

        UI::print_welcome(self.session.current_mode(), self.session.transport().base_url());

        loop {
            match self.editor.read_line(&self.prompt) {
                Ok(Signal::Success(buffer)) => {
                    let Some(input) = Input::classify(&buffer) else {
                        continue;
                    };
                    if self.handle_input(input) == CommandResult::Exit {
                        break;
                    }
                }
                Ok(Signal::CtrlC) | Ok(Signal::CtrlD) => {
                    println!("\nExiting...");
                    self.finish();
                    break;
                }
                Ok(_) => continue,
                Err(err) => {
                    UI::print_error(&err.to_string());
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads all of a piped stdin and runs it as batched input.
    fn run_piped(&mut self) -> Result<()> {
        let text = io::read_to_string(io::stdin())?;
        tracing::debug!(bytes = text.len(), "Read piped input");

        for input in Input::batch(&text) {
            if self.handle_input(input) == CommandResult::Exit {
                return Ok(());
            }
        }

        self.finish();
        Ok(())
    }

    fn handle_input(&mut self, input: Input) -> CommandResult {
        match input {
            Input::Command(command) => {
                let result = command.execute(self);
                self.prompt.set_mode(self.session.current_mode());
                match result {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        UI::print_error_with_hint(&e);
                        CommandResult::Continue
                    }
                }
            }
            Input::UnknownCommand(name) => {
                UI::print_warning(&format!(
                    "Unknown command: {} (try /help, or start with // to send it as a message)",
                    name
                ));
                CommandResult::Continue
            }
            Input::Message(text) => {
                if let Err(e) = self.process_message(&text) {
                    UI::print_error_with_hint(&e);
                }
                println!();
                CommandResult::Continue
            }
        }
    }

    fn finish(&self) {
        UI::display_session_summary(&self.session.state());
        UI::print_goodbye();
    }

    fn process_message(&mut self, user_input: &str) -> Result<()> {
        let spinner = Spinner::start("Awaiting response...".to_string());
        let result = self.runtime.block_on(self.session.submit(user_input));
        drop(spinner);

        let message = result?;
        println!();
        self.ui.print_assistant(&message);
        Ok(())
    }

    pub fn process_single_prompt(&mut self, prompt: &str) -> Result<()> {
        println!(
            "{} {}",
            ReplPrompt::symbol(self.session.current_mode())
                .bright_green()
                .bold(),
            prompt
        );
        let result = self.process_message(prompt);
        UI::display_session_summary(&self.session.state());

        if let Err(ref e) = result {
            if !e.is_validation() {
                eprintln!(
                    "{}",
                    "The request was not completed; no answer was recorded.".dimmed()
                );
            }
        }
        result
    }
}
