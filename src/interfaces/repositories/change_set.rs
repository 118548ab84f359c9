use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::entities::base::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Unchanged,
    Added,
    Modified,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct TrackedEntry<T> {
    pub entity: T,
    pub state: EntryState,
}

/// Identity map plus staged operations for one entity type.
///
/// Every record a unit of work reads or stages is tracked here exactly once,
/// keyed by id, in first-seen order so flushes are deterministic.
#[derive(Debug)]
pub struct ChangeSet<T: Entity> {
    entries: HashMap<Uuid, TrackedEntry<T>>,
    order: Vec<Uuid>,
}

impl<T: Entity> Default for ChangeSet<T> {
    fn default() -> Self {
        ChangeSet {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T: Entity> ChangeSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &Uuid) -> Option<&TrackedEntry<T>> {
        self.entries.get(id)
    }

    pub fn is_tracked(&self, id: &Uuid) -> bool {
        self.entries.contains_key(id)
    }

    /// Records a freshly loaded row unless a tracked copy already exists.
    /// Returns the copy this unit of work should see.
    pub fn attach(&mut self, entity: T) -> &TrackedEntry<T> {
        let id = entity.id();
        if !self.entries.contains_key(&id) {
            self.order.push(id);
        }
        self.entries.entry(id).or_insert(TrackedEntry {
            entity,
            state: EntryState::Unchanged,
        })
    }

    pub fn stage(&mut self, entity: T, state: EntryState) {
        let id = entity.id();
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.entity = entity;
                entry.state = state;
            }
            None => {
                self.order.push(id);
                self.entries.insert(id, TrackedEntry { entity, state });
            }
        }
    }

    pub fn detach(&mut self, id: &Uuid) {
        if self.entries.remove(id).is_some() {
            self.order.retain(|tracked| tracked != id);
        }
    }

    /// Overlays staged state on rows read from the store.
    ///
    /// Tracked copies win over stored ones, staged deletes and soft-deleted
    /// copies are hidden, staged inserts are appended.
    pub fn merge(&mut self, stored: Vec<T>) -> Vec<T> {
        let mut visible = Vec::with_capacity(stored.len());
        let mut seen = HashSet::with_capacity(stored.len());

        for row in stored {
            let id = row.id();
            seen.insert(id);
            let entry = self.attach(row);
            if entry.state != EntryState::Deleted && !entry.entity.is_deleted() {
                visible.push(entry.entity.clone());
            }
        }

        for id in &self.order {
            if seen.contains(id) {
                continue;
            }
            if let Some(entry) = self.entries.get(id) {
                if entry.state == EntryState::Added && !entry.entity.is_deleted() {
                    visible.push(entry.entity.clone());
                }
            }
        }

        visible
    }

    pub fn has_pending(&self) -> bool {
        self.entries.values().any(|e| e.state != EntryState::Unchanged)
    }

    /// Staged entries in first-seen order.
    pub fn pending(&self) -> impl Iterator<Item = &TrackedEntry<T>> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .filter(|entry| entry.state != EntryState::Unchanged)
    }

    /// Called once staged work is durable.
    pub fn accept(&mut self) {
        let deleted: Vec<Uuid> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.state == EntryState::Deleted)
            .map(|(id, _)| *id)
            .collect();

        for id in &deleted {
            self.detach(id);
        }
        for entry in self.entries.values_mut() {
            entry.state = EntryState::Unchanged;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
