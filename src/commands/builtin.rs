use super::CommandResult;
use crate::repl::Repl;
use crate::ui::UI;
use colored::Colorize;
use summit::error::Result;
use summit::Mode;

pub fn exit_command(repl: &mut Repl) -> Result<CommandResult> {
    UI::display_session_summary(&repl.session().state());
    UI::print_goodbye();
    Ok(CommandResult::Exit)
}

pub fn help_command() -> Result<CommandResult> {
    UI::print_help();
    Ok(CommandResult::Continue)
}

pub fn switch_mode_command(repl: &mut Repl, mode: Mode) -> Result<CommandResult> {
    repl.session().switch_mode(mode)?;
    let count = repl.session().state().conversation(mode).len();
    println!(
        "\n{} {}\n",
        format!("{} mode.", mode.label()).bright_green(),
        format!("({} messages in history)", count).dimmed()
    );
    Ok(CommandResult::Continue)
}

pub fn show_mode_command(repl: &mut Repl) -> Result<CommandResult> {
    let mode = repl.session().current_mode();
    println!("\n{} {}\n", "Mode:".bright_green(), mode.label());
    Ok(CommandResult::Continue)
}

pub fn clear_command(repl: &mut Repl) -> Result<CommandResult> {
    let mode = repl.session().current_mode();
    repl.session().clear(mode)?;
    println!(
        "\n{}\n",
        format!("{} history cleared.", mode.label()).bright_yellow()
    );
    Ok(CommandResult::Continue)
}

pub fn reset_command(repl: &mut Repl) -> Result<CommandResult> {
    repl.session().reset()?;
    println!(
        "\n{}\n",
        "All conversations and token usage cleared.".bright_yellow()
    );
    Ok(CommandResult::Continue)
}

pub fn usage_command(repl: &mut Repl) -> Result<CommandResult> {
    UI::display_usage(&repl.session().state());
    Ok(CommandResult::Continue)
}

pub fn raw_command(repl: &mut Repl) -> Result<CommandResult> {
    let state = repl.session().state();
    UI::display_raw(state.conversations.last_assistant(state.current_mode));
    Ok(CommandResult::Continue)
}

pub fn history_command(repl: &mut Repl) -> Result<CommandResult> {
    let state = repl.session().state();
    repl.ui()
        .display_conversation(state.current_mode, state.current_conversation());
    Ok(CommandResult::Continue)
}

pub fn language_command(repl: &mut Repl, tag: Option<String>) -> Result<CommandResult> {
    match &tag {
        Some(tag) => UI::print_info(&format!("Answers will be requested in {}", tag)),
        None => UI::print_info("Answers will use the backend's default language"),
    }
    repl.session().set_language(tag);
    Ok(CommandResult::Continue)
}
