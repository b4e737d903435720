//! `PatternPool` — generation-indexed slots for runtime-spawned patterns.
//!
//! External code creates, retargets, and destroys shell patterns while the
//! simulation runs, holding only a [`PatternHandle`].  The pool guarantees a
//! stale handle can never touch a reused slot:
//!
//! - a slot's generation is fixed while **Free** and while **Active**;
//! - `stop` returns the slot to the free list *and increments the
//!   generation*, so every handle minted before the stop mismatches forever;
//! - `update_*`/`stop` on a mismatched handle return `false` with no side
//!   effects — a documented contract, not an error.
//!
//! Active-list removal is O(1): swap the removed entry with the last one and
//! truncate, patching the moved slot's stored list position.  Payload storage
//! (sphere/box shell parameters) uses the same free-list pattern, indexed
//! independently of the slot pool.

use glam::Vec3;
use shoal_core::{TypeId, TypeMask};

use crate::{BoxShell, SphereShell};

/// Stable external reference to one live pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatternHandle {
    pub index: u32,
    pub generation: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum PatternKind {
    SphereShell,
    BoxShell,
}

#[derive(Clone, Debug)]
struct PatternSlot {
    generation: u32,
    active: bool,
    kind: PatternKind,
    /// Index into the kind-specific payload pool.
    payload: u32,
    strength: f32,
    affects: TypeMask,
    /// This slot's position in `active`, for O(1) removal.
    active_pos: u32,
}

/// Free-list-backed pool of runtime pattern instances.
#[derive(Default)]
pub struct PatternPool {
    slots: Vec<PatternSlot>,
    free: Vec<u32>,
    /// Slot indices of live patterns, in no particular order.
    active: Vec<u32>,

    sphere_payloads: Vec<SphereShell>,
    sphere_free: Vec<u32>,
    box_payloads: Vec<BoxShell>,
    box_free: Vec<u32>,
}

impl PatternPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live patterns.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// `true` while `handle` still references the pattern it was minted for.
    pub fn is_live(&self, handle: PatternHandle) -> bool {
        self.resolve(handle).is_some()
    }

    // ── Start ─────────────────────────────────────────────────────────────

    /// Spawn a sphere-shell pattern; the returned handle stays valid until
    /// [`stop`][Self::stop].
    pub fn start_sphere_shell(
        &mut self,
        shell: SphereShell,
        strength: f32,
        affects: TypeMask,
    ) -> PatternHandle {
        let payload = alloc_payload(&mut self.sphere_payloads, &mut self.sphere_free, shell);
        self.activate(PatternKind::SphereShell, payload, strength, affects)
    }

    /// Spawn a box-shell pattern.
    pub fn start_box_shell(
        &mut self,
        shell: BoxShell,
        strength: f32,
        affects: TypeMask,
    ) -> PatternHandle {
        let payload = alloc_payload(&mut self.box_payloads, &mut self.box_free, shell);
        self.activate(PatternKind::BoxShell, payload, strength, affects)
    }

    // ── Update ────────────────────────────────────────────────────────────

    /// Retarget a live sphere-shell pattern.  Returns `false` (touching
    /// nothing) if the handle is stale or references a box shell.
    pub fn update_sphere_shell(
        &mut self,
        handle: PatternHandle,
        shell: SphereShell,
        strength: f32,
    ) -> bool {
        let Some(slot_index) = self.resolve(handle) else {
            return false;
        };
        let slot = &mut self.slots[slot_index];
        if slot.kind != PatternKind::SphereShell {
            return false;
        }
        self.sphere_payloads[slot.payload as usize] = shell;
        slot.strength = strength;
        true
    }

    /// Retarget a live box-shell pattern.  Returns `false` if the handle is
    /// stale or references a sphere shell.
    pub fn update_box_shell(
        &mut self,
        handle: PatternHandle,
        shell: BoxShell,
        strength: f32,
    ) -> bool {
        let Some(slot_index) = self.resolve(handle) else {
            return false;
        };
        let slot = &mut self.slots[slot_index];
        if slot.kind != PatternKind::BoxShell {
            return false;
        }
        self.box_payloads[slot.payload as usize] = shell;
        slot.strength = strength;
        true
    }

    // ── Stop ──────────────────────────────────────────────────────────────

    /// Destroy a live pattern.  Returns `false` if the handle is stale.
    ///
    /// The slot's generation is incremented here, which is what invalidates
    /// every outstanding copy of `handle`.
    pub fn stop(&mut self, handle: PatternHandle) -> bool {
        let Some(slot_index) = self.resolve(handle) else {
            return false;
        };

        // O(1) active-list removal: swap with the last entry and truncate,
        // then patch the moved entry's back-pointer.
        let pos = self.slots[slot_index].active_pos as usize;
        let last = self.active.len() - 1;
        self.active.swap(pos, last);
        self.active.truncate(last);
        if pos < self.active.len() {
            let moved = self.active[pos] as usize;
            self.slots[moved].active_pos = pos as u32;
        }

        let slot = &mut self.slots[slot_index];
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        match slot.kind {
            PatternKind::SphereShell => self.sphere_free.push(slot.payload),
            PatternKind::BoxShell => self.box_free.push(slot.payload),
        }
        self.free.push(slot_index as u32);
        true
    }

    // ── Evaluation ────────────────────────────────────────────────────────

    /// Sum of all live pattern signals at `p` applicable to type `ty`.
    pub fn sample(&self, p: Vec3, ty: TypeId) -> Vec3 {
        let mut sum = Vec3::ZERO;
        for &slot_index in &self.active {
            let slot = &self.slots[slot_index as usize];
            if !slot.affects.contains(ty) {
                continue;
            }
            let signal = match slot.kind {
                PatternKind::SphereShell => {
                    self.sphere_payloads[slot.payload as usize].signal(p)
                }
                PatternKind::BoxShell => self.box_payloads[slot.payload as usize].signal(p),
            };
            sum += signal * slot.strength;
        }
        sum
    }

    // ── Internal ──────────────────────────────────────────────────────────

    /// Slot index for a handle whose generation still matches, else `None`.
    fn resolve(&self, handle: PatternHandle) -> Option<usize> {
        let slot = self.slots.get(handle.index as usize)?;
        (slot.active && slot.generation == handle.generation).then_some(handle.index as usize)
    }

    fn activate(
        &mut self,
        kind: PatternKind,
        payload: u32,
        strength: f32,
        affects: TypeMask,
    ) -> PatternHandle {
        let slot_index = match self.free.pop() {
            Some(i) => i as usize,
            None => {
                self.slots.push(PatternSlot {
                    generation: 0,
                    active: false,
                    kind,
                    payload: 0,
                    strength: 0.0,
                    affects: TypeMask::NONE,
                    active_pos: 0,
                });
                self.slots.len() - 1
            }
        };

        let active_pos = self.active.len() as u32;
        self.active.push(slot_index as u32);

        let slot = &mut self.slots[slot_index];
        slot.active = true;
        slot.kind = kind;
        slot.payload = payload;
        slot.strength = strength;
        slot.affects = affects;
        slot.active_pos = active_pos;

        PatternHandle {
            index: slot_index as u32,
            generation: slot.generation,
        }
    }
}

/// Allocate from a payload free list, growing the pool when empty.
fn alloc_payload<T>(pool: &mut Vec<T>, free: &mut Vec<u32>, value: T) -> u32 {
    match free.pop() {
        Some(i) => {
            pool[i as usize] = value;
            i
        }
        None => {
            pool.push(value);
            (pool.len() - 1) as u32
        }
    }
}
