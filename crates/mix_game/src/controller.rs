//! Practice/game state machine.
//!
//! Every action either mutates state and returns an [`Outcome`], or returns a
//! [`Rejection`] and leaves state exactly as it was. Validation therefore runs
//! to completion before the first write in each handler.

use std::time::Duration;

use bevy::log::{debug, info};
use bevy::prelude::Resource;
use mix_config::GameRules;
use mix_core::{available_for, resolve_with, Color, Palette};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{
    ActionKind, ButtonState, DeferredTransitions, Feedback, MixAction, MixView, Mode, Outcome,
    PendingTransition, Rejection, Selection, ShownColor, Slot, TransitionKind,
};

#[derive(Resource, Debug)]
pub struct MixGame {
    palette: Palette,
    rules: GameRules,
    mode: Mode,
    selection: Selection,
    target: Option<Color>,
    score: u32,
    /// Bumped on every new target and mode switch; keys deferred transitions.
    round: u64,
    round_solved: bool,
    shown_result: Option<Color>,
    feedback: Feedback,
    hint: Option<(Color, Color)>,
    last_mixed: Option<(Color, Color)>,
    deferred: DeferredTransitions,
    rng: StdRng,
}

impl MixGame {
    pub fn new(palette: Palette, rules: GameRules) -> Self {
        let rng = match rules.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            palette,
            rules,
            mode: Mode::Practice,
            selection: Selection::default(),
            target: None,
            score: 0,
            round: 0,
            round_solved: false,
            shown_result: None,
            feedback: Feedback::none(),
            hint: None,
            last_mixed: None,
            deferred: DeferredTransitions::default(),
            rng,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn selection(&self) -> &Selection {
        &self.selection
    }
    pub fn target(&self) -> Option<Color> {
        self.target
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }
    pub fn shown_result(&self) -> Option<Color> {
        self.shown_result
    }
    pub fn pending(&self) -> Option<&PendingTransition> {
        self.deferred.pending()
    }
    pub fn now(&self) -> Duration {
        self.deferred.now()
    }

    pub fn dispatch(&mut self, action: MixAction) -> Result<Outcome, Rejection> {
        let result = match action {
            MixAction::Select { slot, color } => self.select(slot, color),
            MixAction::Mix | MixAction::Check => self.mix_or_check(),
            MixAction::Reset => Ok(self.reset()),
            MixAction::SwitchMode(mode) => self.switch_mode(mode),
            MixAction::Next => self.next(),
            MixAction::Hint => self.hint(),
        };
        if let Err(rejection @ Rejection::WrongMode { .. }) = &result {
            debug!(target: "mix_game", "ignored: {rejection}");
        }
        result
    }

    fn restricts_picks(&self) -> bool {
        self.mode == Mode::Practice || self.rules.restrict_in_game
    }

    /// Colors the availability filter leaves enabled for `slot`.
    fn allowed_for(&self, slot: Slot) -> Option<std::collections::BTreeSet<Color>> {
        if !self.restricts_picks() {
            return None;
        }
        Some(available_for(
            self.palette.table(),
            self.selection.get(slot.other()),
            !self.rules.allow_self_mix,
            &self.palette.base_set(),
        ))
    }

    pub fn select(&mut self, slot: Slot, color: Color) -> Result<Outcome, Rejection> {
        if !self.palette.is_base(color) {
            return Err(Rejection::UnknownColor(color));
        }
        if let Some(allowed) = self.allowed_for(slot) {
            if !allowed.contains(&color) {
                return Err(Rejection::ColorUnavailable { slot, color });
            }
        }
        self.supersede_pending(ActionKind::Select);
        self.selection.set(slot, color);
        Ok(Outcome::Selected { slot, color })
    }

    pub fn mix_or_check(&mut self) -> Result<Outcome, Rejection> {
        let (first, second) = self.selection.pair().ok_or_else(|| Rejection::MissingColors {
            missing: self.selection.missing(),
        })?;
        if self.rules.suppress_repeat_mix && self.last_mixed == Some((first, second)) {
            return Err(Rejection::AlreadyMixed);
        }
        let result = resolve_with(self.palette.table(), first, second, self.rules.undefined)
            .map_err(|u| Rejection::UndefinedCombination { first: u.first, second: u.second })?;
        let target = match self.mode {
            Mode::Practice => None,
            Mode::Game => Some(self.target.ok_or(Rejection::NoTarget)?),
        };

        self.supersede_pending(ActionKind::Mix);
        self.last_mixed = Some((first, second));
        self.shown_result = Some(result);

        let Some(target) = target else {
            return Ok(Outcome::Mixed { result });
        };

        let correct = result == target;
        let scheduled = if correct {
            if self.rules.scoring && !self.round_solved {
                self.score += 1;
            }
            self.round_solved = true;
            self.feedback = Feedback::correct();
            info!(
                target: "mix_game",
                "correct: {} + {} = {} (score {})",
                self.palette.display_name(first),
                self.palette.display_name(second),
                self.palette.display_name(result),
                self.score
            );
            self.rules.auto_advance.then(|| {
                self.deferred.schedule(TransitionKind::Advance, self.rules.advance_delay(), self.round);
                TransitionKind::Advance
            })
        } else {
            self.feedback = Feedback::incorrect();
            info!(
                target: "mix_game",
                "incorrect: {} + {} = {}, wanted {}",
                self.palette.display_name(first),
                self.palette.display_name(second),
                self.palette.display_name(result),
                self.palette.display_name(target)
            );
            self.rules.auto_reset_on_wrong.then(|| {
                self.deferred
                    .schedule(TransitionKind::ResetSelection, self.rules.reset_delay(), self.round);
                TransitionKind::ResetSelection
            })
        };
        Ok(Outcome::Checked {
            result,
            correct,
            score: self.rules.scoring.then_some(self.score),
            scheduled,
        })
    }

    /// Clears selection and feedback; mode, target and score stay.
    pub fn reset(&mut self) -> Outcome {
        self.supersede_pending(ActionKind::Reset);
        self.clear_round_display();
        Outcome::Reset
    }

    pub fn switch_mode(&mut self, mode: Mode) -> Result<Outcome, Rejection> {
        if mode == Mode::Game && self.palette.target_pool().is_empty() {
            return Err(Rejection::NoTargetsAvailable);
        }
        self.supersede_pending(ActionKind::SwitchMode);
        self.mode = mode;
        self.score = 0;
        self.clear_round_display();
        match mode {
            Mode::Game => {
                self.roll_target()?;
            }
            Mode::Practice => {
                self.target = None;
                self.round += 1;
                self.round_solved = false;
            }
        }
        info!(target: "mix_game", "mode -> {mode}");
        Ok(Outcome::ModeSwitched { mode, target: self.target })
    }

    /// Skip to a fresh target (game mode).
    pub fn next(&mut self) -> Result<Outcome, Rejection> {
        self.require_game(ActionKind::Next)?;
        if self.palette.target_pool().is_empty() {
            return Err(Rejection::NoTargetsAvailable);
        }
        self.supersede_pending(ActionKind::Next);
        self.clear_round_display();
        let target = self.roll_target()?;
        Ok(Outcome::NewTarget { target })
    }

    /// Choose a new target without touching the selection.
    pub fn pick_new_target(&mut self) -> Result<Color, Rejection> {
        self.require_game(ActionKind::Next)?;
        if self.palette.target_pool().is_empty() {
            return Err(Rejection::NoTargetsAvailable);
        }
        self.supersede_pending(ActionKind::Next);
        self.roll_target()
    }

    /// First table pair (authored order) producing the current target.
    pub fn hint(&mut self) -> Result<Outcome, Rejection> {
        if !self.rules.hints {
            return Err(Rejection::HintsDisabled);
        }
        self.require_game(ActionKind::Hint)?;
        let target = self.target.ok_or(Rejection::NoTarget)?;
        let entry = self
            .palette
            .table()
            .pairs_producing(target)
            .next()
            .copied()
            .ok_or(Rejection::NoHint(target))?;
        self.hint = Some((entry.first, entry.second));
        Ok(Outcome::Hint { first: entry.first, second: entry.second })
    }

    /// Human-readable form of the last hint.
    pub fn hint_text(&self) -> Option<String> {
        self.hint.map(|(a, b)| {
            format!(
                "Try mixing {} and {}",
                self.palette.display_name(a),
                self.palette.display_name(b)
            )
        })
    }

    /// Advance the controller clock; applies a deferred transition that came due.
    pub fn advance_clock(&mut self, elapsed: Duration) -> Option<Outcome> {
        let due = self.deferred.advance(elapsed)?;
        if due.round != self.round {
            debug!(target: "mix_game", "dropping stale {:?} from round {}", due.kind, due.round);
            return None;
        }
        match due.kind {
            TransitionKind::Advance => {
                self.clear_round_display();
                if self.roll_target().is_err() {
                    return None;
                }
            }
            TransitionKind::ResetSelection => {
                self.clear_round_display();
            }
        }
        info!(target: "mix_game", "deferred {:?} fired", due.kind);
        Some(Outcome::TransitionFired { kind: due.kind, target: self.target })
    }

    pub fn view(&self) -> MixView {
        let shown = |c: Color| ShownColor { color: c, name: self.palette.display_name(c).to_string() };
        let buttons: [Vec<ButtonState>; 2] = Slot::ALL.map(|slot| {
            let allowed = self.allowed_for(slot);
            self.palette
                .swatches()
                .iter()
                .filter(|s| s.base)
                .map(|s| ButtonState {
                    color: s.color,
                    name: s.name.clone(),
                    enabled: allowed.as_ref().map_or(true, |a| a.contains(&s.color)),
                    selected: self.selection.get(slot) == Some(s.color),
                })
                .collect()
        });
        MixView {
            mode: self.mode,
            selection: self.selection,
            result: self.shown_result.map(shown),
            target: match self.mode {
                Mode::Game => self.target.map(shown),
                Mode::Practice => None,
            },
            score: (self.mode == Mode::Game && self.rules.scoring).then_some(self.score),
            feedback: self.feedback.clone(),
            buttons,
            hint: self.hint_text(),
            pending: self.deferred.pending().map(|p| p.kind),
        }
    }

    fn require_game(&self, action: ActionKind) -> Result<(), Rejection> {
        match self.mode {
            Mode::Game => Ok(()),
            mode => Err(Rejection::WrongMode { action, mode }),
        }
    }

    fn supersede_pending(&mut self, by: ActionKind) {
        if let Some(p) = self.deferred.cancel() {
            debug!(target: "mix_game", "{by} cancelled pending {:?}", p.kind);
        }
    }

    fn clear_round_display(&mut self) {
        self.selection.clear();
        self.shown_result = None;
        self.feedback = Feedback::none();
        self.hint = None;
        self.last_mixed = None;
    }

    fn roll_target(&mut self) -> Result<Color, Rejection> {
        let pool = self.palette.target_pool();
        let target = *pool.choose(&mut self.rng).ok_or(Rejection::NoTargetsAvailable)?;
        self.target = Some(target);
        self.round += 1;
        self.round_solved = false;
        self.feedback = Feedback::none();
        self.hint = None;
        info!(target: "mix_game", "new target {} ({target})", self.palette.display_name(target));
        Ok(target)
    }
}
