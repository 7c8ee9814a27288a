use std::collections::BTreeSet;

use crate::{Color, MixingTable, Palette};

/// Colors that produce a defined result when paired with `chosen`.
///
/// `None` means nothing is picked in that slot yet, so the whole `universe`
/// is returned unrestricted. Self-mix is governed by `exclude_self` alone,
/// whatever the table says about `(chosen, chosen)`.
pub fn available_for(
    table: &MixingTable,
    chosen: Option<Color>,
    exclude_self: bool,
    universe: &BTreeSet<Color>,
) -> BTreeSet<Color> {
    let Some(chosen) = chosen else {
        return universe.clone();
    };
    let mut out: BTreeSet<Color> = table
        .entries_with(chosen)
        .map(|e| if e.first == chosen { e.second } else { e.first })
        .collect();
    if exclude_self {
        out.remove(&chosen);
    } else {
        out.insert(chosen);
    }
    out
}

/// Enabled flag per base swatch (palette order) for the slot opposite `chosen`.
pub fn enabled_buttons(palette: &Palette, chosen: Option<Color>, exclude_self: bool) -> Vec<(Color, bool)> {
    let universe = palette.base_set();
    let available = available_for(palette.table(), chosen, exclude_self, &universe);
    palette
        .base_colors()
        .map(|c| (c, available.contains(&c)))
        .collect()
}
