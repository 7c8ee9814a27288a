//! mix_game: practice/game state machine for the color mixer plus the Bevy
//! plumbing that feeds it.
//!
//! [`MixGame`] is usable on its own (call [`MixGame::dispatch`] and
//! [`MixGame::advance_clock`] directly). [`MixGamePlugin`] wraps it in a
//! resource, queues [`MixAction`]s and reduces them once per frame.

mod action;
mod controller;
mod queue;
mod reducer;
mod schedule;
mod state;

pub use action::*;
pub use controller::*;
pub use queue::*;
pub use reducer::*;
pub use schedule::*;
pub use state::*;

use bevy::prelude::*;
use mix_config::{GameRules, MixerConfig};
use mix_core::{Palette, PaletteError};

pub struct MixGamePlugin {
    pub palette: Palette,
    pub rules: GameRules,
    pub journal_capacity: usize,
}

impl Default for MixGamePlugin {
    fn default() -> Self {
        Self {
            palette: Palette::classic(),
            rules: GameRules::default(),
            journal_capacity: 512,
        }
    }
}

impl MixGamePlugin {
    pub fn new(palette: Palette, rules: GameRules) -> Self {
        Self { palette, rules, ..Default::default() }
    }

    pub fn from_config(cfg: &MixerConfig) -> Result<Self, PaletteError> {
        Ok(Self {
            palette: cfg.load_palette()?,
            rules: cfg.rules.clone(),
            journal_capacity: cfg.journal_capacity,
        })
    }
}

impl Plugin for MixGamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameCounter>()
            .insert_resource(ActionQueue::with_capacity(self.journal_capacity))
            .insert_resource(MixGame::new(self.palette.clone(), self.rules.clone()))
            .add_systems(PreUpdate, increment_frame_counter)
            .add_systems(Update, tick_deferred_transitions)
            .add_systems(PostUpdate, reduce_actions);
    }
}

#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct FrameCounter(pub u64);
fn increment_frame_counter(mut fc: ResMut<FrameCounter>) {
    fc.0 += 1;
}

pub trait MixGameAppExt {
    /// Queue an action for the next reducer pass.
    fn queue_action(&mut self, action: MixAction) -> &mut Self;
}

impl MixGameAppExt for App {
    fn queue_action(&mut self, action: MixAction) -> &mut Self {
        self.world_mut().resource_mut::<ActionQueue>().enqueue(action);
        self
    }
}
