use colored::Colorize;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch};
use summit::Mode;

/// Line editor prompt naming the mode the next message goes to.
#[derive(Clone)]
pub struct ReplPrompt {
    mode: Mode,
}

impl ReplPrompt {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Uncolored prompt text, also echoed before a `--prompt` run.
    pub fn symbol(mode: Mode) -> String {
        format!("{}>", mode)
    }
}

impl Prompt for ReplPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(Self::symbol(self.mode).bright_green().bold().to_string() + " ")
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("… ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_names_mode() {
        assert_eq!(ReplPrompt::symbol(Mode::Chat), "chat>");
        assert_eq!(ReplPrompt::symbol(Mode::Summary), "summary>");
    }

    #[test]
    fn test_prompt_follows_mode_switch() {
        colored::control::set_override(false);
        let mut prompt = ReplPrompt::new(Mode::Chat);
        assert_eq!(prompt.render_prompt_left(), "chat> ");

        prompt.set_mode(Mode::Summary);
        assert_eq!(prompt.mode(), Mode::Summary);
        assert_eq!(prompt.render_prompt_left(), "summary> ");
    }
}
