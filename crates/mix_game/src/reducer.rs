use bevy::prelude::*;

use crate::{ActionQueue, FrameCounter, JournalEntry, JournalSource, MixGame, Outcome};

/// Drains this frame's queued actions into the controller, journaling every result.
pub fn reduce_actions(mut queue: ResMut<ActionQueue>, mut game: ResMut<MixGame>, frame: Res<FrameCounter>) {
    for action in queue.drain() {
        let result = game.dispatch(action);
        if let Err(rejection) = &result {
            debug!(target: "mix_game", "{:?} rejected: {rejection}", action.kind());
        }
        queue.push_journal(JournalEntry {
            source: JournalSource::Action(action),
            result,
            frame: frame.0,
        });
    }
}

/// Feeds frame time into the controller clock so deferred transitions can fire.
pub fn tick_deferred_transitions(
    time: Res<Time>,
    mut game: ResMut<MixGame>,
    mut queue: ResMut<ActionQueue>,
    frame: Res<FrameCounter>,
) {
    if let Some(outcome) = game.advance_clock(time.delta()) {
        let Outcome::TransitionFired { kind, .. } = outcome else {
            return;
        };
        queue.push_journal(JournalEntry {
            source: JournalSource::Deferred(kind),
            result: Ok(outcome),
            frame: frame.0,
        });
    }
}
