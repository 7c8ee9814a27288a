//! Named swatches plus the mixing table that relates them.
//! Single source of truth for what the adapter shows as buttons and names.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Color, MixingTable, TableError};

/// Shown for result colors the palette has no name for.
pub const UNKNOWN_COLOR_NAME: &str = "Unknown Color";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    pub color: Color,
    pub name: String,
    /// Selectable in the palette (as opposed to a derived mixing result).
    #[serde(default)]
    pub base: bool,
}

/// Authored mix in a palette file; expands to both orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixSpec {
    pub first: Color,
    pub second: Color,
    pub result: Color,
}

/// On-disk RON form of a palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteFile {
    pub name: String,
    pub swatches: Vec<Swatch>,
    pub mixes: Vec<MixSpec>,
}

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("{path}: read error: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("swatch color {0} listed twice")]
    DuplicateSwatch(Color),
    #[error("palette '{0}' has no base (selectable) colors")]
    NoBaseColors(String),
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Clone)]
pub struct Palette {
    name: String,
    swatches: Vec<Swatch>,
    table: MixingTable,
}

impl Palette {
    pub fn new(name: impl Into<String>, swatches: Vec<Swatch>, table: MixingTable) -> Result<Self, PaletteError> {
        let name = name.into();
        let mut seen = BTreeSet::new();
        for s in &swatches {
            if !seen.insert(s.color) {
                return Err(PaletteError::DuplicateSwatch(s.color));
            }
        }
        if !swatches.iter().any(|s| s.base) {
            return Err(PaletteError::NoBaseColors(name));
        }
        Ok(Self { name, swatches, table })
    }

    pub fn from_file_data(file: PaletteFile) -> Result<Self, PaletteError> {
        let table = MixingTable::symmetric(file.mixes.iter().map(|m| (m.first, m.second, m.result)))?;
        Self::new(file.name, file.swatches, table)
    }

    pub fn from_ron_str(data: &str) -> Result<Self, PaletteError> {
        let file: PaletteFile = ron::from_str(data)?;
        Self::from_file_data(file)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| PaletteError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&data)
    }

    /// Export back into the file form (mixes written once per unordered pair).
    pub fn to_file_data(&self) -> PaletteFile {
        let mut emitted = BTreeSet::new();
        let mixes = self
            .table
            .entries()
            .filter(|e| emitted.insert((e.first.min(e.second), e.first.max(e.second))))
            .map(|e| MixSpec { first: e.first, second: e.second, result: e.result })
            .collect();
        PaletteFile { name: self.name.clone(), swatches: self.swatches.clone(), mixes }
    }

    /// Built-in primary/secondary/tertiary palette.
    pub fn classic() -> Self {
        let swatch = |hex: u32, name: &str, base: bool| Swatch {
            color: Color::from_hex(hex),
            name: name.to_string(),
            base,
        };
        let swatches = vec![
            swatch(0xFF361C, "Red", true),
            swatch(0x1F4F99, "Blue", true),
            swatch(0xFEFF01, "Yellow", true),
            swatch(0x823A84, "Purple", true),
            swatch(0xFF851E, "Orange", true),
            swatch(0x2A892D, "Green", true),
            swatch(0xE01F34, "Dark Red", false),
            swatch(0xFE531B, "Red-Orange", false),
            swatch(0x0173B1, "Blue-Green", false),
            swatch(0x3D317B, "Blue-Purple", false),
            swatch(0xAEB71E, "Yellow-Green", false),
            swatch(0xFDA230, "Yellow-Orange", false),
        ];
        let table = classic_table();
        debug_assert!(table.is_ok(), "classic mixes conflict: {table:?}");
        Self { name: "classic".into(), swatches, table: table.unwrap_or_default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &MixingTable {
        &self.table
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// Selectable colors in button order.
    pub fn base_colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.swatches.iter().filter(|s| s.base).map(|s| s.color)
    }

    pub fn base_set(&self) -> BTreeSet<Color> {
        self.base_colors().collect()
    }

    pub fn is_base(&self, color: Color) -> bool {
        self.swatches.iter().any(|s| s.base && s.color == color)
    }

    pub fn name_of(&self, color: Color) -> Option<&str> {
        self.swatches
            .iter()
            .find(|s| s.color == color)
            .map(|s| s.name.as_str())
    }

    pub fn display_name(&self, color: Color) -> &str {
        self.name_of(color).unwrap_or(UNKNOWN_COLOR_NAME)
    }

    /// Case-insensitive name lookup over every swatch.
    pub fn color_named(&self, name: &str) -> Option<Color> {
        let name = name.trim();
        self.swatches
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.color)
    }

    /// Accept either a swatch name or a hex string.
    pub fn lookup(&self, token: &str) -> Option<Color> {
        self.color_named(token).or_else(|| Color::parse(token).ok())
    }

    /// Result colors that cannot be picked directly; candidates for game targets.
    pub fn target_pool(&self) -> Vec<Color> {
        self.table.target_pool(&self.base_set())
    }

    /// Non-fatal warnings for suspicious palette data.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        for e in self.table.entries() {
            for operand in [e.first, e.second] {
                if self.name_of(operand).is_none() {
                    w.push(format!("mix operand {operand} is not a swatch"));
                }
            }
            if self.name_of(e.result).is_none() {
                w.push(format!("mix result {} has no name", e.result));
            }
        }
        for c in self.base_colors() {
            if self.table.entries_with(c).next().is_none() {
                w.push(format!("base color {} ({c}) mixes with nothing", self.display_name(c)));
            }
        }
        if self.target_pool().is_empty() {
            w.push("no mix result outside the base colors; game mode has no targets".into());
        }
        for e in self.table.asymmetric_entries() {
            w.push(format!("{} + {} has no mirror entry", e.first, e.second));
        }
        w.sort();
        w.dedup();
        w
    }
}

fn classic_table() -> Result<MixingTable, TableError> {
    MixingTable::symmetric(
        CLASSIC_MIXES
            .iter()
            .map(|&(a, b, r)| (Color::from_hex(a), Color::from_hex(b), Color::from_hex(r))),
    )
}

const CLASSIC_MIXES: [(u32, u32, u32); 9] = [
    (0x1F4F99, 0xFF361C, 0x823A84), // blue + red = purple
    (0xFF361C, 0xFEFF01, 0xFF851E), // red + yellow = orange
    (0xFEFF01, 0x1F4F99, 0x2A892D), // yellow + blue = green
    (0xFF361C, 0x823A84, 0xE01F34),
    (0xFF361C, 0xFF851E, 0xFE531B),
    (0x1F4F99, 0x2A892D, 0x0173B1),
    (0x1F4F99, 0x823A84, 0x3D317B),
    (0xFEFF01, 0x2A892D, 0xAEB71E),
    (0xFEFF01, 0xFF851E, 0xFDA230),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn classic_mixes_insert_without_conflict() {
        let table = classic_table().expect("classic mixes are consistent");
        assert_eq!(table.len(), CLASSIC_MIXES.len() * 2);
        assert!(table.is_symmetric());
        assert_eq!(Palette::classic().table().len(), table.len());
    }

    #[test]
    fn classic_is_symmetric_and_clean() {
        let p = Palette::classic();
        assert_eq!(p.table().len(), 18);
        assert!(p.table().is_symmetric());
        assert!(p.validate().is_empty(), "unexpected warnings: {:?}", p.validate());
        assert_eq!(p.base_colors().count(), 6);
    }

    #[test]
    fn classic_targets_are_the_tertiaries() {
        let p = Palette::classic();
        let names: Vec<&str> = p.target_pool().into_iter().map(|c| p.display_name(c)).collect();
        assert_eq!(
            names,
            vec!["Dark Red", "Red-Orange", "Blue-Green", "Blue-Purple", "Yellow-Green", "Yellow-Orange"]
        );
    }

    #[test]
    fn lookup_accepts_names_and_hex() {
        let p = Palette::classic();
        assert_eq!(p.lookup("red"), Some(Color::from_hex(0xFF361C)));
        assert_eq!(p.lookup("Blue-Green"), Some(Color::from_hex(0x0173B1)));
        assert_eq!(p.lookup("#abcdef"), Some(Color::from_hex(0xABCDEF)));
        assert_eq!(p.lookup("mauve"), None);
        assert_eq!(p.display_name(Color::from_hex(0xABCDEF)), UNKNOWN_COLOR_NAME);
    }

    #[test]
    fn parse_palette_file() {
        let data = r##"
            (
                name: "tiny",
                swatches: [
                    (color: "#FF0000", name: "Red", base: true),
                    (color: "#0000FF", name: "Blue", base: true),
                    (color: "#800080", name: "Purple"),
                ],
                mixes: [
                    (first: "#FF0000", second: "#0000FF", result: "#800080"),
                ],
            )
        "##;
        let p = Palette::from_ron_str(data).unwrap();
        assert_eq!(p.name(), "tiny");
        assert_eq!(p.table().len(), 2);
        assert!(!p.is_base(Color::from_hex(0x800080)));
        assert_eq!(p.target_pool(), vec![Color::from_hex(0x800080)]);
    }

    #[test]
    fn conflicting_mixes_fail_to_load() {
        let data = r##"
            (
                name: "bad",
                swatches: [(color: "#FF0000", name: "Red", base: true)],
                mixes: [
                    (first: "#FF0000", second: "#0000FF", result: "#800080"),
                    (first: "#0000FF", second: "#FF0000", result: "#000000"),
                ],
            )
        "##;
        assert!(matches!(Palette::from_ron_str(data), Err(PaletteError::Table(_))));
    }

    #[test]
    fn duplicate_and_baseless_palettes_rejected() {
        let s = |hex, base| Swatch { color: Color::from_hex(hex), name: "x".into(), base };
        assert!(matches!(
            Palette::new("dup", vec![s(1, true), s(1, false)], MixingTable::new()),
            Err(PaletteError::DuplicateSwatch(_))
        ));
        assert!(matches!(
            Palette::new("none", vec![s(1, false)], MixingTable::new()),
            Err(PaletteError::NoBaseColors(_))
        ));
    }

    #[test]
    fn file_round_trip_through_disk() {
        let classic = Palette::classic();
        let text = ron::ser::to_string_pretty(&classic.to_file_data(), Default::default()).unwrap();
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        let loaded = Palette::load_from_file(f.path()).unwrap();
        assert_eq!(loaded.table().len(), classic.table().len());
        assert_eq!(loaded.swatches(), classic.swatches());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Palette::load_from_file("/definitely/not/here.ron").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.ron"));
    }
}
