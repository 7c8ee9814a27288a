//! mix_core: pure color-mixing data and lookups (no Bevy dependency).
//!
//! Mixing is a table lookup, never color-space math: a [`Palette`] names the
//! colors and owns a symmetric [`MixingTable`]; [`resolve`] applies the
//! lookup/fallback rules and [`available_for`] answers which partners give a
//! defined result.

pub mod availability;
pub mod color;
pub mod palette;
pub mod resolve;
pub mod table;

pub use availability::{available_for, enabled_buttons};
pub use color::{Color, ColorParseError};
pub use palette::{MixSpec, Palette, PaletteError, PaletteFile, Swatch, UNKNOWN_COLOR_NAME};
pub use resolve::{resolve, resolve_with, UndefinedCombination, UndefinedPolicy, DEFAULT_NEUTRAL};
pub use table::{MixEntry, MixingTable, TableError};
