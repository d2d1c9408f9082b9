//! Bucketed entity ownership
//!
//! Entities live in an arena addressed by [`EntityId`]. Membership lists
//! (all, per species, per faction for actors, per faction for projectiles)
//! hold ids in nullable slots: removal clears the slot in place so indices
//! stay stable while a frame iterates, and insertion reuses the first cleared
//! slot before growing the list.

use super::entity::{Entity, Faction, Species};

/// Stable handle to an arena slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// List whose removed entries leave a hole that the next insert fills
#[derive(Debug, Clone)]
pub struct SlotList<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for SlotList<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> SlotList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` in the first empty slot (or append). Returns its index.
    pub fn insert(&mut self, value: T) -> usize {
        if let Some(index) = self.slots.iter().position(Option::is_none) {
            self.slots[index] = Some(value);
            index
        } else {
            self.slots.push(Some(value));
            self.slots.len() - 1
        }
    }

    /// Store `value` at a specific index, growing the list if needed
    pub fn put(&mut self, index: usize, value: T) -> Option<T> {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index].replace(value)
    }

    /// Empty a slot, returning what it held
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Slot count, including holes
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of occupied slots
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().flatten()
    }

    /// Occupied slots with their indices
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    /// Clear every slot whose value matches `dead`, returning how many
    pub fn sweep(&mut self, mut dead: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(&mut dead) {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }
}

impl<T: PartialEq> SlotList<T> {
    /// Clear the slot holding `value`
    pub fn remove_value(&mut self, value: &T) -> bool {
        match self.slots.iter().position(|s| s.as_ref() == Some(value)) {
            Some(index) => {
                self.slots[index] = None;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }
}

/// Which membership lists an entity belongs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Membership {
    species: Species,
    actor_faction: Option<Faction>,
    projectile_faction: Option<Faction>,
}

impl Membership {
    fn of(entity: &Entity) -> Self {
        Self {
            species: entity.species,
            actor_faction: entity.flags.is_actor.then_some(entity.faction),
            projectile_faction: entity.flags.is_projectile.then_some(entity.faction),
        }
    }
}

/// Arena plus the four bucket families
#[derive(Debug, Clone)]
pub struct Registry {
    arena: SlotList<Entity>,
    /// Buckets each live id is filed under, by arena index
    filed: Vec<Option<Membership>>,
    all: SlotList<EntityId>,
    by_species: [SlotList<EntityId>; Species::COUNT],
    actors: [SlotList<EntityId>; Faction::COUNT],
    projectiles: [SlotList<EntityId>; Faction::COUNT],
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            arena: SlotList::new(),
            filed: Vec::new(),
            all: SlotList::new(),
            by_species: std::array::from_fn(|_| SlotList::new()),
            actors: std::array::from_fn(|_| SlotList::new()),
            projectiles: std::array::from_fn(|_| SlotList::new()),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an entity and file it in its buckets
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let membership = Membership::of(&entity);
        // A taken entity is still filed, so its slot is not free
        let index = (0..self.arena.len())
            .find(|&i| self.arena.get(i).is_none() && self.filed.get(i).copied().flatten().is_none())
            .unwrap_or(self.arena.len());
        self.arena.put(index, entity);
        let id = EntityId(index as u32);
        if self.filed.len() <= id.index() {
            self.filed.resize(id.index() + 1, None);
        }
        self.file(id, membership);
        self.all.insert(id);
        id
    }

    /// Remove an entity from every bucket and hand it back
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.unfile(id);
        self.all.remove_value(&id);
        self.arena.remove(id.index())
    }

    fn file(&mut self, id: EntityId, membership: Membership) {
        self.by_species[membership.species.index()].insert(id);
        if let Some(faction) = membership.actor_faction {
            self.actors[faction.index()].insert(id);
        }
        if let Some(faction) = membership.projectile_faction {
            self.projectiles[faction.index()].insert(id);
        }
        self.filed[id.index()] = Some(membership);
    }

    fn unfile(&mut self, id: EntityId) {
        let Some(membership) = self.filed.get_mut(id.index()).and_then(Option::take) else {
            return;
        };
        self.by_species[membership.species.index()].remove_value(&id);
        if let Some(faction) = membership.actor_faction {
            self.actors[faction.index()].remove_value(&id);
        }
        if let Some(faction) = membership.projectile_faction {
            self.projectiles[faction.index()].remove_value(&id);
        }
    }

    /// Re-file an entity whose faction or flags changed
    pub fn refile(&mut self, id: EntityId) {
        let Some(membership) = self.arena.get(id.index()).map(Membership::of) else {
            return;
        };
        if self.filed.get(id.index()).copied().flatten() == Some(membership) {
            return;
        }
        self.unfile(id);
        self.file(id, membership);
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.arena.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.arena.get_mut(id.index())
    }

    /// Lift an entity out of its arena slot without touching its buckets.
    /// The slot stays reserved until [`Registry::restore`].
    pub fn take(&mut self, id: EntityId) -> Option<Entity> {
        self.arena.remove(id.index())
    }

    /// Put back an entity lifted by [`Registry::take`]
    pub fn restore(&mut self, id: EntityId, entity: Entity) {
        let previous = self.arena.put(id.index(), entity);
        debug_assert!(previous.is_none(), "restore must refill an empty slot");
    }

    /// Snapshot of every filed id, in bucket order
    pub fn ids(&self) -> Vec<EntityId> {
        self.all.iter().copied().collect()
    }

    pub fn species_ids(&self, species: Species) -> Vec<EntityId> {
        self.by_species[species.index()].iter().copied().collect()
    }

    pub fn actor_ids(&self, faction: Faction) -> Vec<EntityId> {
        self.actors[faction.index()].iter().copied().collect()
    }

    pub fn projectile_ids(&self, faction: Faction) -> Vec<EntityId> {
        self.projectiles[faction.index()].iter().copied().collect()
    }

    /// Live entities of one species
    pub fn of_species(&self, species: Species) -> impl Iterator<Item = &Entity> {
        self.by_species[species.index()]
            .iter()
            .filter_map(move |id| self.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.all
            .iter()
            .filter_map(move |&id| self.get(id).map(|e| (id, e)))
    }

    /// Number of filed entities
    pub fn len(&self) -> usize {
        self.all.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot length of the all-entities bucket, holes included
    pub fn bucket_len(&self) -> usize {
        self.all.len()
    }

    /// Slot length of one species bucket, holes included
    pub fn species_bucket_len(&self, species: Species) -> usize {
        self.by_species[species.index()].len()
    }

    /// Whether `id` is filed in exactly the buckets its flags call for
    pub fn is_filed_consistently(&self, id: EntityId) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };
        let m = Membership::of(entity);
        let species_ok = Species::ALL
            .iter()
            .all(|s| self.by_species[s.index()].contains(&id) == (*s == m.species));
        let factions = [Faction::Good, Faction::Evil, Faction::Neutral];
        let actors_ok = factions
            .iter()
            .all(|f| self.actors[f.index()].contains(&id) == (m.actor_faction == Some(*f)));
        let projectiles_ok = factions.iter().all(|f| {
            self.projectiles[f.index()].contains(&id) == (m.projectile_faction == Some(*f))
        });
        self.all.contains(&id) && species_ok && actors_ok && projectiles_ok
    }
}
