//! `BehaviourRegistry` — the frozen settings table plus type relationships.
//!
//! # Symmetry by construction
//!
//! The observed-design invariant "if A avoids B, B avoids A" is enforced
//! here, once, at build time.  [`RegistryBuilder::relate`] mirrors every
//! declared relation into both types' masks, and [`RegistryBuilder::build`]
//! additionally cross-checks any masks that were set directly on the
//! settings records.  The per-step pipeline never re-validates.

use shoal_core::{ShoalError, ShoalResult, TypeId, TypeMask};

use crate::BehaviourSettings;
use crate::settings::MIN_RADIUS;

/// How one behaviour type classifies another.
///
/// The three classifications are mutually exclusive; the aggregator checks
/// them in this order and takes the first match.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    /// School together: alignment, cohesion, and the schooling band apply.
    Friendly,
    /// Predator/prey: the weaker party flees, scaled by the weight delta.
    Avoid,
    /// Keep distance without fleeing.
    Neutral,
}

// ── RegistryBuilder ───────────────────────────────────────────────────────────

/// Accumulates behaviour types and their relations, then freezes them into a
/// [`BehaviourRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    settings: Vec<BehaviourSettings>,
    relations: Vec<(TypeId, TypeId, Relation)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behaviour type; the returned [`TypeId`] is its index.
    ///
    /// The 32-type bitmask capacity is checked at [`build`][Self::build],
    /// not here, so authoring code can stay fluent.
    pub fn add_type(&mut self, settings: BehaviourSettings) -> TypeId {
        let id = TypeId(self.settings.len() as u8);
        self.settings.push(settings);
        id
    }

    /// Declare a relation between two types.  Mirrored automatically: both
    /// types' masks receive the other's bit.  `a == b` is allowed (a type
    /// may school with, or avoid, its own kind).
    pub fn relate(&mut self, a: TypeId, b: TypeId, relation: Relation) -> &mut Self {
        self.relations.push((a, b, relation));
        self
    }

    /// Validate, sanitize, and freeze into a [`BehaviourRegistry`].
    ///
    /// `cell_size` is the uniform-grid cell edge length; each type's
    /// neighbour-scan ring count is derived from it here, once, instead of
    /// per agent per frame.
    pub fn build(mut self, cell_size: f32) -> ShoalResult<BehaviourRegistry> {
        let count = self.settings.len();
        if count == 0 {
            return Err(ShoalError::Config("no behaviour types registered".into()));
        }
        if count > TypeMask::MAX_TYPES {
            return Err(ShoalError::TooManyTypes(count, TypeMask::MAX_TYPES));
        }

        // Mirror declared relations into both masks.
        for (a, b, relation) in self.relations.drain(..) {
            for id in [a, b] {
                if id.index() >= count {
                    return Err(ShoalError::Config(format!(
                        "relation references unregistered type {id}"
                    )));
                }
            }
            let (mask_of, other) = (a.index(), b);
            match relation {
                Relation::Friendly => {
                    self.settings[mask_of].group_mask = self.settings[mask_of].group_mask.with(other);
                    self.settings[b.index()].group_mask = self.settings[b.index()].group_mask.with(a);
                }
                Relation::Avoid => {
                    self.settings[mask_of].avoid_mask = self.settings[mask_of].avoid_mask.with(other);
                    self.settings[b.index()].avoid_mask = self.settings[b.index()].avoid_mask.with(a);
                }
                Relation::Neutral => {
                    self.settings[mask_of].neutral_mask = self.settings[mask_of].neutral_mask.with(other);
                    self.settings[b.index()].neutral_mask = self.settings[b.index()].neutral_mask.with(a);
                }
            }
        }

        BehaviourRegistry::from_settings(self.settings, cell_size)
    }
}

// ── BehaviourRegistry ─────────────────────────────────────────────────────────

/// Immutable-per-run table of [`BehaviourSettings`], one per type, plus
/// derived per-type constants.
pub struct BehaviourRegistry {
    settings: Vec<BehaviourSettings>,
    /// Grid rings scanned around an agent's own cell:
    /// `ceil(neighbour_radius / cell_size)`, per type.
    cell_rings: Vec<i32>,
}

impl BehaviourRegistry {
    /// Build directly from fully-authored settings (masks included).
    ///
    /// Fails if more than [`TypeMask::MAX_TYPES`] types are supplied or any
    /// relationship mask is asymmetric.
    pub fn from_settings(
        mut settings: Vec<BehaviourSettings>,
        cell_size: f32,
    ) -> ShoalResult<Self> {
        let count = settings.len();
        if count == 0 {
            return Err(ShoalError::Config("no behaviour types registered".into()));
        }
        if count > TypeMask::MAX_TYPES {
            return Err(ShoalError::TooManyTypes(count, TypeMask::MAX_TYPES));
        }

        check_symmetry(&settings)?;

        for s in &mut settings {
            s.sanitize();
        }

        let cell_size = cell_size.max(MIN_RADIUS);
        let cell_rings = settings
            .iter()
            .map(|s| (s.neighbour_radius / cell_size).ceil() as i32)
            .collect();

        Ok(Self { settings, cell_rings })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// `true` if `ty` indexes a registered type (staged behaviour changes
    /// are validated against this at apply time).
    #[inline]
    pub fn is_valid_type(&self, ty: TypeId) -> bool {
        ty.index() < self.settings.len()
    }

    /// Settings for one type.  `ty` must be registered.
    #[inline]
    pub fn get(&self, ty: TypeId) -> &BehaviourSettings {
        &self.settings[ty.index()]
    }

    /// Precomputed neighbour-scan ring count for one type.
    #[inline]
    pub fn cell_rings(&self, ty: TypeId) -> i32 {
        self.cell_rings[ty.index()]
    }

    /// Classify `other` from `observer`'s point of view.
    ///
    /// Checks friendly, then avoid, then neutral; returns `None` for types
    /// the observer does not react to.
    #[inline]
    pub fn relation(&self, observer: TypeId, other: TypeId) -> Option<Relation> {
        let s = self.get(observer);
        if s.group_mask.contains(other) {
            Some(Relation::Friendly)
        } else if s.avoid_mask.contains(other) {
            Some(Relation::Avoid)
        } else if s.neutral_mask.contains(other) {
            Some(Relation::Neutral)
        } else {
            None
        }
    }

    /// Iterator over `(TypeId, &BehaviourSettings)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &BehaviourSettings)> {
        self.settings
            .iter()
            .enumerate()
            .map(|(i, s)| (TypeId(i as u8), s))
    }
}

/// Verify every relationship mask is symmetric across the table.
fn check_symmetry(settings: &[BehaviourSettings]) -> ShoalResult<()> {
    for (ai, a) in settings.iter().enumerate() {
        for bi in 0..settings.len() {
            let b = &settings[bi];
            let (ta, tb) = (TypeId(ai as u8), TypeId(bi as u8));
            let pairs = [
                ("group", a.group_mask.contains(tb), b.group_mask.contains(ta)),
                ("avoid", a.avoid_mask.contains(tb), b.avoid_mask.contains(ta)),
                ("neutral", a.neutral_mask.contains(tb), b.neutral_mask.contains(ta)),
            ];
            for (name, ab, ba) in pairs {
                if ab != ba {
                    return Err(ShoalError::Config(format!(
                        "asymmetric {name} mask between {ta} and {tb}"
                    )));
                }
            }
        }
    }
    Ok(())
}
