//! Weapon registry and the player/weapon ownership relation.
//!
//! Ownership is tracked as two mirrored tables (weapon to holder and player to
//! held weapon) that only [`Armory::pick_up`] mutates, so both directions
//! always agree. A held weapon stores no cell of its own: its location is the
//! holder's cell.

use std::collections::BTreeMap;

use chase_toe_core::{CellCoord, PlayerId, Visibility, WeaponId, WeaponSpec};

/// Weapon stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct WeaponState {
    pub(crate) id: WeaponId,
    pub(crate) name: String,
    pub(crate) class_tag: String,
    pub(crate) damage: u32,
    /// Cell the weapon lies on; `None` while a player holds it.
    pub(crate) cell: Option<CellCoord>,
    pub(crate) visibility: Visibility,
}

/// Outcome of a successful pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Swap {
    /// Weapon now held by the player.
    pub(crate) picked_up: WeaponId,
    /// Previously held weapon, left hidden on the pickup cell.
    pub(crate) dropped: Option<WeaponId>,
}

/// Registry that stores weapons and the ownership relation.
#[derive(Debug, Default)]
pub(crate) struct Armory {
    weapons: Vec<WeaponState>,
    holders: BTreeMap<WeaponId, PlayerId>,
    held: BTreeMap<PlayerId, WeaponId>,
    pending_drops: BTreeMap<PlayerId, WeaponId>,
}

impl Armory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores a new weapon lying visibly on `cell` and allocates its identifier.
    pub(crate) fn register(&mut self, spec: WeaponSpec, cell: CellCoord) -> WeaponId {
        let id = WeaponId::new(u32::try_from(self.weapons.len()).unwrap_or(u32::MAX));
        self.weapons.push(WeaponState {
            id,
            name: spec.name,
            class_tag: spec.class_tag,
            damage: spec.damage,
            cell: Some(cell),
            visibility: Visibility::Visible,
        });
        id
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &WeaponState> {
        self.weapons.iter()
    }

    pub(crate) fn weapon(&self, weapon: WeaponId) -> Option<&WeaponState> {
        self.weapons.iter().find(|state| state.id == weapon)
    }

    pub(crate) fn holder_of(&self, weapon: WeaponId) -> Option<PlayerId> {
        self.holders.get(&weapon).copied()
    }

    pub(crate) fn weapon_of(&self, player: PlayerId) -> Option<WeaponId> {
        self.held.get(&player).copied()
    }

    pub(crate) fn pending_drop(&self, player: PlayerId) -> Option<WeaponId> {
        self.pending_drops.get(&player).copied()
    }

    /// Cells of every weapon lying on the board, hidden ones included.
    pub(crate) fn board_cells(&self) -> Vec<CellCoord> {
        self.weapons.iter().filter_map(|state| state.cell).collect()
    }

    /// Weapon that a player entering `cell` would pick up.
    pub(crate) fn pickable_at(&self, cell: CellCoord) -> Option<WeaponId> {
        self.weapons
            .iter()
            .find(|state| state.cell == Some(cell) && state.visibility == Visibility::Visible)
            .map(|state| state.id)
    }

    /// Makes the pending drop of `player` visible, returning the weapon and its cell.
    pub(crate) fn complete_drop(&mut self, player: PlayerId) -> Option<(WeaponId, CellCoord)> {
        let weapon = self.pending_drops.remove(&player)?;
        let state = self.weapons.iter_mut().find(|state| state.id == weapon)?;
        state.visibility = Visibility::Visible;
        state.cell.map(|cell| (weapon, cell))
    }

    /// Binds the weapon lying visibly on `cell` to `player`.
    ///
    /// A weapon the player already holds is left hidden on `cell` as the new
    /// pending drop. The player's previous drop must have been completed with
    /// [`Armory::complete_drop`]. Returns `None` without touching any state
    /// when a drop is still pending or the weapon is held or lies elsewhere.
    pub(crate) fn pick_up(
        &mut self,
        player: PlayerId,
        weapon: WeaponId,
        cell: CellCoord,
    ) -> Option<Swap> {
        let lying_on_cell = self.weapon(weapon).is_some_and(|state| {
            state.cell == Some(cell) && state.visibility == Visibility::Visible
        });
        if !lying_on_cell
            || self.holders.contains_key(&weapon)
            || self.pending_drops.contains_key(&player)
        {
            return None;
        }

        let dropped = self.held.remove(&player);
        if let Some(old) = dropped {
            let _ = self.holders.remove(&old);
            if let Some(state) = self.weapons.iter_mut().find(|state| state.id == old) {
                state.cell = Some(cell);
                state.visibility = Visibility::Hidden;
            }
            let _ = self.pending_drops.insert(player, old);
        }

        let _ = self.holders.insert(weapon, player);
        let _ = self.held.insert(player, weapon);
        if let Some(state) = self.weapons.iter_mut().find(|state| state.id == weapon) {
            state.cell = None;
            state.visibility = Visibility::Visible;
        }

        Some(Swap {
            picked_up: weapon,
            dropped,
        })
    }
}
