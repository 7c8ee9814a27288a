use mix_core::Color;

use crate::{Feedback, Mode, Slot, TransitionKind};

/// The two currently chosen colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    slots: [Option<Color>; 2],
}

impl Selection {
    pub fn get(&self, slot: Slot) -> Option<Color> {
        self.slots[slot.index()]
    }

    pub fn set(&mut self, slot: Slot, color: Color) {
        self.slots[slot.index()] = Some(color);
    }

    pub fn clear(&mut self) {
        self.slots = [None, None];
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Both colors, in slot order, once both are picked.
    pub fn pair(&self) -> Option<(Color, Color)> {
        Some((self.slots[0]?, self.slots[1]?))
    }

    pub fn missing(&self) -> Vec<Slot> {
        Slot::ALL.into_iter().filter(|s| self.get(*s).is_none()).collect()
    }
}

/// A color together with the name to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShownColor {
    pub color: Color,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonState {
    pub color: Color,
    pub name: String,
    pub enabled: bool,
    pub selected: bool,
}

/// Everything a presentation layer needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixView {
    pub mode: Mode,
    pub selection: Selection,
    pub result: Option<ShownColor>,
    /// Game mode only.
    pub target: Option<ShownColor>,
    /// Game mode with scoring enabled only.
    pub score: Option<u32>,
    pub feedback: Feedback,
    /// Palette buttons per slot, indexed by [`Slot::index`].
    pub buttons: [Vec<ButtonState>; 2],
    pub hint: Option<String>,
    pub pending: Option<TransitionKind>,
}

impl MixView {
    pub fn buttons(&self, slot: Slot) -> &[ButtonState] {
        &self.buttons[slot.index()]
    }

    pub fn enabled_colors(&self, slot: Slot) -> Vec<Color> {
        self.buttons(slot)
            .iter()
            .filter(|b| b.enabled)
            .map(|b| b.color)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_requires_both_slots() {
        let mut s = Selection::default();
        assert!(s.is_empty());
        s.set(Slot::Second, Color::from_hex(0x1F4F99));
        assert_eq!(s.pair(), None);
        assert_eq!(s.missing(), vec![Slot::First]);
        s.set(Slot::First, Color::from_hex(0xFF361C));
        assert_eq!(s.pair(), Some((Color::from_hex(0xFF361C), Color::from_hex(0x1F4F99))));
        assert!(s.missing().is_empty());
        s.clear();
        assert_eq!(s.missing(), vec![Slot::First, Slot::Second]);
    }

    #[test]
    fn picking_again_overwrites_slot() {
        let mut s = Selection::default();
        s.set(Slot::First, Color::from_hex(0xFF361C));
        s.set(Slot::First, Color::from_hex(0xFEFF01));
        assert_eq!(s.get(Slot::First), Some(Color::from_hex(0xFEFF01)));
        assert_eq!(s.get(Slot::Second), None);
    }
}
