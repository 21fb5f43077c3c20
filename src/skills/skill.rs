//! Skill definitions
//!
//! A skill is plain data: the behaviour lives in the resolver for its
//! [`SkillKind`], so catalogs can be serialized without carrying code.

use crate::core::types::{ActorId, Millis, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    QuickStrike,
    PowerStrike,
    Recover,
    Defend,
    MultiStrike,
}

impl SkillKind {
    pub fn all() -> &'static [SkillKind] {
        &[
            SkillKind::QuickStrike,
            SkillKind::PowerStrike,
            SkillKind::Recover,
            SkillKind::Defend,
            SkillKind::MultiStrike,
        ]
    }

    /// Catalog id used when the skill is built from its kind
    pub fn id(&self) -> &'static str {
        match self {
            SkillKind::QuickStrike => "quick_strike",
            SkillKind::PowerStrike => "power_strike",
            SkillKind::Recover => "recover",
            SkillKind::Defend => "defend",
            SkillKind::MultiStrike => "multi_strike",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillKind::QuickStrike => "Quick Strike",
            SkillKind::PowerStrike => "Power Strike",
            SkillKind::Recover => "Recover",
            SkillKind::Defend => "Defend",
            SkillKind::MultiStrike => "Multi-Strike",
        }
    }

    pub fn default_cooldown_ms(&self) -> Millis {
        match self {
            SkillKind::QuickStrike => 3000.0,
            SkillKind::PowerStrike => 8000.0,
            SkillKind::Recover => 15000.0,
            SkillKind::Defend => 12000.0,
            SkillKind::MultiStrike => 10000.0,
        }
    }

    pub fn default_mana_cost(&self) -> Option<f32> {
        match self {
            SkillKind::QuickStrike => None,
            SkillKind::PowerStrike => Some(10.0),
            SkillKind::Recover => Some(15.0),
            SkillKind::Defend => Some(10.0),
            SkillKind::MultiStrike => Some(20.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub cooldown_ms: Millis,
    pub mana_cost: Option<f32>,
    pub kind: SkillKind,
}

impl Skill {
    pub fn new(id: impl Into<String>, kind: SkillKind, cooldown_ms: Millis, mana_cost: Option<f32>) -> Self {
        Self {
            id: id.into(),
            name: kind.display_name().to_string(),
            cooldown_ms,
            mana_cost,
            kind,
        }
    }

    /// The reference skill for `kind` with its default cooldown and cost
    pub fn from_kind(kind: SkillKind) -> Self {
        Self::new(kind.id(), kind, kind.default_cooldown_ms(), kind.default_mana_cost())
    }
}

/// Who or where a skill is aimed at
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetInfo {
    pub actor: Option<ActorId>,
    pub point: Option<Vec2>,
}

impl TargetInfo {
    pub fn actor(id: ActorId) -> Self {
        Self { actor: Some(id), point: None }
    }

    pub fn point(point: Vec2) -> Self {
        Self { actor: None, point: Some(point) }
    }

    pub fn none() -> Self {
        Self::default()
    }
}
