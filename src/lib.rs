//! Console front end for the color mixer: command parsing, text rendering
//! and a [`session::Session`] that feeds commands through the Bevy app.

pub mod console;
pub mod session;

pub use console::{parse_command, render_view, ConsoleCommand, ParseError};
pub use session::Session;
