use std::fmt;

use mix_core::Color;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color {}", self.index() + 1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    #[default]
    Practice,
    Game,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Practice => "practice",
            Mode::Game => "game",
        })
    }
}

/// Commands the presentation layer sends into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MixAction {
    Select { slot: Slot, color: Color },
    /// Mix and Check are one operation; the adapter labels it per mode.
    Mix,
    Check,
    Reset,
    SwitchMode(Mode),
    Next,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Select,
    Mix,
    Check,
    Reset,
    SwitchMode,
    Next,
    Hint,
}

impl MixAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            MixAction::Select { .. } => ActionKind::Select,
            MixAction::Mix => ActionKind::Mix,
            MixAction::Check => ActionKind::Check,
            MixAction::Reset => ActionKind::Reset,
            MixAction::SwitchMode(_) => ActionKind::SwitchMode,
            MixAction::Next => ActionKind::Next,
            MixAction::Hint => ActionKind::Hint,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Select => "select",
            ActionKind::Mix => "mix",
            ActionKind::Check => "check",
            ActionKind::Reset => "reset",
            ActionKind::SwitchMode => "switch mode",
            ActionKind::Next => "next",
            ActionKind::Hint => "hint",
        })
    }
}

/// State change the controller performs after a delay unless superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    /// New target, cleared selection (after a correct check).
    Advance,
    /// Cleared selection (after a wrong check).
    ResetSelection,
}

/// Successful result of an action or a fired deferred transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Selected { slot: Slot, color: Color },
    /// Practice mode: result shown, no correctness notion.
    Mixed { result: Color },
    Checked {
        result: Color,
        correct: bool,
        /// Current score when scoring is enabled.
        score: Option<u32>,
        scheduled: Option<TransitionKind>,
    },
    Reset,
    ModeSwitched { mode: Mode, target: Option<Color> },
    NewTarget { target: Color },
    Hint { first: Color, second: Color },
    TransitionFired { kind: TransitionKind, target: Option<Color> },
}

/// Named reason an action was refused. A rejection never changes state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("Please select both colors before mixing!")]
    MissingColors { missing: Vec<Slot> },
    #[error("no mixing result defined for {first} + {second}")]
    UndefinedCombination { first: Color, second: Color },
    #[error("{action} is not available in {mode} mode")]
    WrongMode { action: ActionKind, mode: Mode },
    #[error("no target color is set")]
    NoTarget,
    #[error("palette has no mixable target colors")]
    NoTargetsAvailable,
    #[error("no pair in the table produces {0}")]
    NoHint(Color),
    #[error("hints are disabled")]
    HintsDisabled,
    #[error("{0} is not a selectable palette color")]
    UnknownColor(Color),
    #[error("{color} does not mix with the other selection ({slot})")]
    ColorUnavailable { slot: Slot, color: Color },
    #[error("this combination was just mixed")]
    AlreadyMixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeedbackKind {
    #[default]
    None,
    Correct,
    Incorrect,
    ValidationError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

pub const CORRECT_MESSAGE: &str = "✓ Correct! Well done!";
pub const INCORRECT_MESSAGE: &str = "✗ Not quite! Try a different combination.";

impl Feedback {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn correct() -> Self {
        Self { kind: FeedbackKind::Correct, message: CORRECT_MESSAGE.into() }
    }

    pub fn incorrect() -> Self {
        Self { kind: FeedbackKind::Incorrect, message: INCORRECT_MESSAGE.into() }
    }

    pub fn is_none(&self) -> bool {
        self.kind == FeedbackKind::None
    }
}

impl Rejection {
    /// What an adapter should show for this rejection; `None` means stay quiet.
    pub fn feedback(&self) -> Option<Feedback> {
        match self {
            Rejection::WrongMode { .. }
            | Rejection::NoTarget
            | Rejection::HintsDisabled
            | Rejection::AlreadyMixed => None,
            other => Some(Feedback {
                kind: FeedbackKind::ValidationError,
                message: other.to_string(),
            }),
        }
    }
}
