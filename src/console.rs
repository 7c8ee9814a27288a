//! Line-oriented presentation adapter: parses typed commands into
//! [`MixAction`]s and renders [`MixView`] snapshots as plain text.

use std::fmt::Write as _;
use std::time::Duration;

use mix_core::{Color, Palette};
use mix_game::{ButtonState, FeedbackKind, MixAction, MixView, Mode, Outcome, Rejection, Slot, TransitionKind};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  pick 1|2 <name|#hex>   choose a color for a slot
  mix | check            mix the two picks (check against the target in game mode)
  reset                  clear both picks
  mode practice|game     switch mode
  next                   new target (game mode)
  hint                   show a pair that makes the target (game mode)
  wait <ms>              let time pass (delayed advance / reset)
  view                   print the current state
  journal                dump recent results as JSON
  help                   this text
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Action(MixAction),
    Wait(Duration),
    View,
    Journal,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' needs {what}")]
    MissingArgument { command: &'static str, what: &'static str },
    #[error("slot must be 1 or 2, got '{0}'")]
    BadSlot(String),
    #[error("no palette color matches '{0}'")]
    UnknownColor(String),
    #[error("mode must be 'practice' or 'game', got '{0}'")]
    BadMode(String),
    #[error("'{0}' is not a number of milliseconds")]
    BadDuration(String),
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_command(line: &str, palette: &Palette) -> Result<Option<ConsoleCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let cmd = match head.to_ascii_lowercase().as_str() {
        "pick" | "select" => {
            let slot = match words.next() {
                Some("1") => Slot::First,
                Some("2") => Slot::Second,
                Some(other) => return Err(ParseError::BadSlot(other.to_string())),
                None => return Err(ParseError::MissingArgument { command: "pick", what: "a slot" }),
            };
            // names may contain spaces ("Dark Red")
            let rest = words.collect::<Vec<_>>().join(" ");
            if rest.is_empty() {
                return Err(ParseError::MissingArgument { command: "pick", what: "a color" });
            }
            let color = palette.lookup(&rest).ok_or(ParseError::UnknownColor(rest))?;
            ConsoleCommand::Action(MixAction::Select { slot, color })
        }
        "mix" => ConsoleCommand::Action(MixAction::Mix),
        "check" => ConsoleCommand::Action(MixAction::Check),
        "reset" => ConsoleCommand::Action(MixAction::Reset),
        "next" => ConsoleCommand::Action(MixAction::Next),
        "hint" => ConsoleCommand::Action(MixAction::Hint),
        "mode" => {
            let mode = match words.next().map(str::to_ascii_lowercase).as_deref() {
                Some("practice") => Mode::Practice,
                Some("game") => Mode::Game,
                Some(other) => return Err(ParseError::BadMode(other.to_string())),
                None => return Err(ParseError::MissingArgument { command: "mode", what: "practice or game" }),
            };
            ConsoleCommand::Action(MixAction::SwitchMode(mode))
        }
        "wait" => {
            let arg = words
                .next()
                .ok_or(ParseError::MissingArgument { command: "wait", what: "milliseconds" })?;
            let ms: u64 = arg.parse().map_err(|_| ParseError::BadDuration(arg.to_string()))?;
            ConsoleCommand::Wait(Duration::from_millis(ms))
        }
        "view" => ConsoleCommand::View,
        "journal" => ConsoleCommand::Journal,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

fn named(palette: &Palette, color: Color) -> String {
    format!("{} ({color})", palette.display_name(color))
}

/// One-line description of a successful action or fired transition.
pub fn describe_outcome(outcome: &Outcome, palette: &Palette) -> String {
    match outcome {
        Outcome::Selected { slot, color } => format!("{slot}: {}", named(palette, *color)),
        Outcome::Mixed { result } => format!("result: {}", named(palette, *result)),
        Outcome::Checked { result, correct, score, .. } => {
            let verdict = if *correct { "correct" } else { "wrong" };
            match score {
                Some(s) => format!("result: {} ({verdict}, score {s})", named(palette, *result)),
                None => format!("result: {} ({verdict})", named(palette, *result)),
            }
        }
        Outcome::Reset => "selection cleared".to_string(),
        Outcome::ModeSwitched { mode, target: Some(t) } => format!("{mode} mode, target {}", named(palette, *t)),
        Outcome::ModeSwitched { mode, target: None } => format!("{mode} mode"),
        Outcome::NewTarget { target } => format!("new target: {}", named(palette, *target)),
        Outcome::Hint { first, second } => {
            format!("Try mixing {} and {}", palette.display_name(*first), palette.display_name(*second))
        }
        Outcome::TransitionFired { kind: TransitionKind::Advance, target } => match target {
            Some(t) => format!("next round, target {}", named(palette, *t)),
            None => "next round".to_string(),
        },
        Outcome::TransitionFired { kind: TransitionKind::ResetSelection, .. } => {
            "selection cleared, try again".to_string()
        }
    }
}

/// Text for a refused action, or `None` when the refusal is silent.
pub fn describe_rejection(rejection: &Rejection) -> Option<String> {
    rejection.feedback().map(|f| f.message)
}

fn button_row(buttons: &[ButtonState]) -> String {
    buttons
        .iter()
        .map(|b| match (b.selected, b.enabled) {
            (true, _) => format!("[{}]", b.name),
            (false, true) => b.name.clone(),
            (false, false) => format!("({})", b.name),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Multi-line rendering of a view. Selected buttons are bracketed,
/// disabled ones parenthesised.
pub fn render_view(view: &MixView) -> String {
    let mut out = String::new();
    let _ = write!(out, "mode: {}", view.mode);
    if let Some(target) = &view.target {
        let _ = write!(out, " | target: {} ({})", target.name, target.color);
    }
    if let Some(score) = view.score {
        let _ = write!(out, " | score: {score}");
    }
    out.push('\n');
    for slot in Slot::ALL {
        let _ = writeln!(out, "{slot}: {}", button_row(view.buttons(slot)));
    }
    match &view.result {
        Some(r) => {
            let _ = writeln!(out, "result: {} ({})", r.name, r.color);
        }
        None => out.push_str("result: -\n"),
    }
    let mark = match view.feedback.kind {
        FeedbackKind::None => None,
        FeedbackKind::Correct | FeedbackKind::Incorrect => Some(""),
        FeedbackKind::ValidationError => Some("! "),
    };
    if let Some(mark) = mark {
        let _ = writeln!(out, "{mark}{}", view.feedback.message);
    }
    if let Some(hint) = &view.hint {
        let _ = writeln!(out, "hint: {hint}");
    }
    match view.pending {
        Some(TransitionKind::Advance) => out.push_str("(next round pending)\n"),
        Some(TransitionKind::ResetSelection) => out.push_str("(reset pending)\n"),
        None => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_picks_by_name_and_hex() {
        let p = Palette::classic();
        let red = p.color_named("Red").unwrap();
        assert_eq!(
            parse_command("pick 1 red", &p),
            Ok(Some(ConsoleCommand::Action(MixAction::Select { slot: Slot::First, color: red })))
        );
        assert_eq!(
            parse_command("  PICK 2 #ff361c ", &p),
            Ok(Some(ConsoleCommand::Action(MixAction::Select { slot: Slot::Second, color: red })))
        );
    }

    #[test]
    fn multi_word_color_names() {
        let p = Palette::classic();
        let dark_red = p.color_named("Dark Red").unwrap();
        assert_eq!(
            parse_command("pick 1 dark red", &p),
            Ok(Some(ConsoleCommand::Action(MixAction::Select { slot: Slot::First, color: dark_red })))
        );
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let p = Palette::classic();
        assert_eq!(parse_command("", &p), Ok(None));
        assert_eq!(parse_command("   # setup", &p), Ok(None));
    }

    #[test]
    fn parse_errors_are_named() {
        let p = Palette::classic();
        assert_eq!(parse_command("pick 3 red", &p), Err(ParseError::BadSlot("3".into())));
        assert_eq!(parse_command("pick 1 mauve", &p), Err(ParseError::UnknownColor("mauve".into())));
        assert!(matches!(parse_command("pick 1", &p), Err(ParseError::MissingArgument { .. })));
        assert_eq!(parse_command("mode arcade", &p), Err(ParseError::BadMode("arcade".into())));
        assert_eq!(parse_command("wait soon", &p), Err(ParseError::BadDuration("soon".into())));
        assert_eq!(parse_command("paint", &p), Err(ParseError::UnknownCommand("paint".into())));
    }

    #[test]
    fn simple_commands() {
        let p = Palette::classic();
        assert_eq!(parse_command("mix", &p), Ok(Some(ConsoleCommand::Action(MixAction::Mix))));
        assert_eq!(parse_command("check", &p), Ok(Some(ConsoleCommand::Action(MixAction::Check))));
        assert_eq!(
            parse_command("mode game", &p),
            Ok(Some(ConsoleCommand::Action(MixAction::SwitchMode(Mode::Game))))
        );
        assert_eq!(parse_command("wait 2000", &p), Ok(Some(ConsoleCommand::Wait(Duration::from_millis(2000)))));
        assert_eq!(parse_command("exit", &p), Ok(Some(ConsoleCommand::Quit)));
    }

    #[test]
    fn hint_outcome_uses_palette_names() {
        let p = Palette::classic();
        let (blue, red) = (p.color_named("Blue").unwrap(), p.color_named("Red").unwrap());
        assert_eq!(describe_outcome(&Outcome::Hint { first: blue, second: red }, &p), "Try mixing Blue and Red");
    }

    #[test]
    fn silent_rejections_render_nothing() {
        assert_eq!(describe_rejection(&Rejection::NoTarget), None);
        assert_eq!(
            describe_rejection(&Rejection::MissingColors { missing: vec![Slot::First] }).as_deref(),
            Some("Please select both colors before mixing!")
        );
    }
}
