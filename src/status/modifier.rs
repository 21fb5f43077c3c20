//! Per-stat modifier stacks
//!
//! Every modifiable stat keeps an ordered list of modifiers, each tagged with
//! the effect instance that pushed it. Effective values are folded from the
//! base stat on demand, so removing one source never disturbs another and
//! removing every source always yields the base value exactly.

use crate::entity::StatField;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Identifies the effect instance that owns a modifier
pub type ModifierSource = u64;

/// How a modifier changes the value it is folded over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModifierOp {
    Add(f32),
    Multiply(f32),
}

impl ModifierOp {
    fn apply(&self, value: f32) -> f32 {
        match *self {
            ModifierOp::Add(amount) => value + amount,
            ModifierOp::Multiply(factor) => value * factor,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatModifiers {
    by_field: AHashMap<StatField, Vec<(ModifierSource, ModifierOp)>>,
}

impl StatModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: ModifierSource, field: StatField, op: ModifierOp) {
        self.by_field.entry(field).or_default().push((source, op));
    }

    /// Remove every modifier pushed by `source`; returns how many went
    pub fn remove_source(&mut self, source: ModifierSource) -> usize {
        let mut removed = 0;
        for list in self.by_field.values_mut() {
            let before = list.len();
            list.retain(|(s, _)| *s != source);
            removed += before - list.len();
        }
        self.by_field.retain(|_, list| !list.is_empty());
        removed
    }

    /// Fold `base` through the modifiers on `field`, in insertion order
    pub fn apply(&self, field: StatField, base: f32) -> f32 {
        match self.by_field.get(&field) {
            Some(list) => list.iter().fold(base, |value, (_, op)| op.apply(value)),
            None => base,
        }
    }

    pub fn count(&self, field: StatField) -> usize {
        self.by_field.get(&field).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_field.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_modifiers_is_base() {
        let mods = StatModifiers::new();
        assert_eq!(mods.apply(StatField::Defense, 7.0), 7.0);
    }

    #[test]
    fn test_fold_in_insertion_order() {
        let mut mods = StatModifiers::new();
        mods.push(1, StatField::Attack, ModifierOp::Add(2.0));
        mods.push(2, StatField::Attack, ModifierOp::Multiply(2.0));
        assert_eq!(mods.apply(StatField::Attack, 10.0), 24.0);
    }

    #[test]
    fn test_remove_source_leaves_others() {
        let mut mods = StatModifiers::new();
        mods.push(1, StatField::Defense, ModifierOp::Multiply(1.5));
        mods.push(2, StatField::Defense, ModifierOp::Multiply(2.0));

        assert_eq!(mods.remove_source(1), 1);
        assert_eq!(mods.apply(StatField::Defense, 10.0), 20.0);

        assert_eq!(mods.remove_source(2), 1);
        assert_eq!(mods.apply(StatField::Defense, 10.0), 10.0);
        assert!(mods.is_empty());
    }

    #[test]
    fn test_remove_unknown_source_is_noop() {
        let mut mods = StatModifiers::new();
        mods.push(1, StatField::Speed, ModifierOp::Add(1.0));
        assert_eq!(mods.remove_source(99), 0);
        assert_eq!(mods.count(StatField::Speed), 1);
    }
}
