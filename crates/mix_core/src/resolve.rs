use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Color, MixingTable};

/// Gray used when [`UndefinedPolicy::Neutral`] is configured without a color.
pub const DEFAULT_NEUTRAL: Color = Color::from_hex(0x808080);

/// What the caller does with a pair the table has no entry for.
///
/// Deserializes from `Reject`, `Neutral`, `Neutral("#RRGGBB")`, or the
/// shapes those take after passing through `ron::Value` (unit, one-element
/// sequence), so layered configs keep the setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum UndefinedPolicy {
    /// Surface [`UndefinedCombination`].
    #[default]
    Reject,
    /// Substitute a fixed neutral color.
    Neutral(Color),
}

const POLICY_VARIANTS: &[&str] = &["Reject", "Neutral"];

impl<'de> Deserialize<'de> for UndefinedPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PolicyVisitor)
    }
}

struct PolicyVisitor;

impl<'de> Visitor<'de> for PolicyVisitor {
    type Value = UndefinedPolicy;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reject, Neutral or Neutral(\"#RRGGBB\")")
    }

    // a bare variant name parses as unit
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(UndefinedPolicy::Reject)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v {
            "Reject" | "reject" => Ok(UndefinedPolicy::Reject),
            "Neutral" | "neutral" => Ok(UndefinedPolicy::Neutral(DEFAULT_NEUTRAL)),
            other => Color::parse(other)
                .map(UndefinedPolicy::Neutral)
                .map_err(|_| E::invalid_value(Unexpected::Str(other), &self)),
        }
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let color = seq.next_element::<Color>()?.unwrap_or(DEFAULT_NEUTRAL);
        Ok(UndefinedPolicy::Neutral(color))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let Some(key) = map.next_key::<String>()? else {
            return Err(de::Error::invalid_length(0, &self));
        };
        match key.as_str() {
            "Reject" => {
                map.next_value::<de::IgnoredAny>()?;
                Ok(UndefinedPolicy::Reject)
            }
            "Neutral" => Ok(UndefinedPolicy::Neutral(map.next_value::<Color>()?)),
            other => Err(de::Error::unknown_variant(other, POLICY_VARIANTS)),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no mixing result defined for {first} + {second}")]
pub struct UndefinedCombination {
    pub first: Color,
    pub second: Color,
}

/// Resolve a pair: direct entry, reverse entry, self-mix, otherwise `None`.
pub fn resolve(table: &MixingTable, first: Color, second: Color) -> Option<Color> {
    table
        .get(first, second)
        .or_else(|| table.get(second, first))
        .or_else(|| (first == second).then_some(first))
}

pub fn resolve_with(
    table: &MixingTable,
    first: Color,
    second: Color,
    policy: UndefinedPolicy,
) -> Result<Color, UndefinedCombination> {
    match (resolve(table, first, second), policy) {
        (Some(c), _) => Ok(c),
        (None, UndefinedPolicy::Neutral(neutral)) => Ok(neutral),
        (None, UndefinedPolicy::Reject) => Err(UndefinedCombination { first, second }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MixEntry;

    const RED: Color = Color::from_hex(0xFF361C);
    const BLUE: Color = Color::from_hex(0x1F4F99);
    const YELLOW: Color = Color::from_hex(0xFEFF01);
    const ORANGE: Color = Color::from_hex(0xFF851E);

    #[test]
    fn one_sided_table_still_resolves_both_ways() {
        let t = MixingTable::from_directed([MixEntry { first: RED, second: YELLOW, result: ORANGE }]).unwrap();
        assert_eq!(resolve(&t, RED, YELLOW), Some(ORANGE));
        assert_eq!(resolve(&t, YELLOW, RED), Some(ORANGE));
    }

    #[test]
    fn self_mix_falls_back_to_input() {
        let t = MixingTable::new();
        assert_eq!(resolve(&t, BLUE, BLUE), Some(BLUE));
    }

    #[test]
    fn table_entry_beats_self_mix() {
        let custom = Color::from_hex(0x123456);
        let t = MixingTable::symmetric([(BLUE, BLUE, custom)]).unwrap();
        assert_eq!(resolve(&t, BLUE, BLUE), Some(custom));
    }

    #[test]
    fn undefined_pair_follows_policy() {
        let t = MixingTable::new();
        assert_eq!(resolve(&t, RED, BLUE), None);
        assert_eq!(
            resolve_with(&t, RED, BLUE, UndefinedPolicy::Reject),
            Err(UndefinedCombination { first: RED, second: BLUE })
        );
        assert_eq!(
            resolve_with(&t, RED, BLUE, UndefinedPolicy::Neutral(DEFAULT_NEUTRAL)),
            Ok(DEFAULT_NEUTRAL)
        );
    }

    #[test]
    fn policy_reads_from_ron_text() {
        assert_eq!(ron::from_str::<UndefinedPolicy>("Reject").unwrap(), UndefinedPolicy::Reject);
        assert_eq!(
            ron::from_str::<UndefinedPolicy>(r##"Neutral("#102030")"##).unwrap(),
            UndefinedPolicy::Neutral(Color::from_hex(0x102030))
        );
        assert_eq!(
            ron::from_str::<UndefinedPolicy>(r#""neutral""#).unwrap(),
            UndefinedPolicy::Neutral(DEFAULT_NEUTRAL)
        );
        assert!(ron::from_str::<UndefinedPolicy>(r#""sometimes""#).is_err());
    }

    #[test]
    fn policy_survives_ron_value() {
        for text in ["Reject", r##"Neutral("#102030")"##] {
            let direct: UndefinedPolicy = ron::from_str(text).unwrap();
            let value: ron::Value = ron::from_str(text).unwrap();
            assert_eq!(value.into_rust::<UndefinedPolicy>().unwrap(), direct, "{text}");
        }
    }

    #[test]
    fn policy_written_by_ron_reads_back() {
        for policy in [UndefinedPolicy::Reject, UndefinedPolicy::Neutral(Color::from_hex(0xABCDEF))] {
            let text = ron::to_string(&policy).unwrap();
            assert_eq!(ron::from_str::<UndefinedPolicy>(&text).unwrap(), policy);
        }
    }
}
