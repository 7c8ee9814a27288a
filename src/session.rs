//! Drives a Bevy [`App`] carrying [`MixGamePlugin`] one console command at a time.
//!
//! Frame time is manual: ordinary commands run a zero-length frame and only
//! `wait` moves the clock, so scripted sessions replay identically.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use mix_core::Palette;
use mix_game::{ActionQueue, FrameCounter, JournalEntry, MixGame, MixGameAppExt, MixGamePlugin, MixView};

use crate::console::{describe_outcome, describe_rejection, render_view, ConsoleCommand, HELP};

/// Longest single frame step; larger waits are split into several frames.
const MAX_STEP: Duration = Duration::from_secs(60);
/// Longest a single `wait` can run the clock.
const MAX_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

pub struct Session {
    app: App,
}

impl Session {
    /// `app` must already carry the base plugins (at least `MinimalPlugins`).
    pub fn new(mut app: App, plugin: MixGamePlugin) -> Self {
        app.add_plugins(plugin)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO));
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .set_max_delta(MAX_STEP);
        // the first frame only initialises the clocks
        app.update();
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn game(&self) -> &MixGame {
        self.app.world().resource::<MixGame>()
    }

    pub fn palette(&self) -> &Palette {
        self.game().palette()
    }

    pub fn view(&self) -> MixView {
        self.game().view()
    }

    pub fn render(&self) -> String {
        render_view(&self.view())
    }

    /// Execute one command and return the lines to print. `Quit` is left to the caller.
    pub fn run(&mut self, command: ConsoleCommand) -> Result<Vec<String>, serde_json::Error> {
        let mut lines = Vec::new();
        match command {
            ConsoleCommand::Action(action) => {
                self.app.queue_action(action);
                self.step(Duration::ZERO, &mut lines);
                lines.push(self.render());
            }
            ConsoleCommand::Wait(total) => {
                // only a pending transition can make time observable
                let mut left = total.min(MAX_WAIT);
                while !left.is_zero() && self.game().pending().is_some() {
                    let dt = left.min(MAX_STEP);
                    self.step(dt, &mut lines);
                    left -= dt;
                }
                lines.push(self.render());
            }
            ConsoleCommand::View => lines.push(self.render()),
            ConsoleCommand::Journal => {
                let entries: Vec<&JournalEntry> = self.app.world().resource::<ActionQueue>().journal().collect();
                lines.push(serde_json::to_string_pretty(&entries)?);
            }
            ConsoleCommand::Help => lines.push(HELP.to_string()),
            ConsoleCommand::Quit => {}
        }
        Ok(lines)
    }

    /// Run one frame of `dt` and describe whatever the journal recorded in it.
    fn step(&mut self, dt: Duration, lines: &mut Vec<String>) {
        self.app.insert_resource(TimeUpdateStrategy::ManualDuration(dt));
        self.app.update();
        self.app
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO));

        let world = self.app.world();
        let frame = world.resource::<FrameCounter>().0;
        let palette = world.resource::<MixGame>().palette();
        for entry in world.resource::<ActionQueue>().journal().filter(|e| e.frame == frame) {
            let line = match &entry.result {
                Ok(outcome) => Some(describe_outcome(outcome, palette)),
                Err(rejection) => describe_rejection(rejection),
            };
            lines.extend(line);
        }
    }
}
