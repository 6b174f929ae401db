//! Insertion-order-preserving entity container
//!
//! Owned exclusively by one data controller and mutated only during refresh.
//! Full refresh reconciles membership against a fresh enumeration; auto
//! refresh folds field updates into existing entries without ever changing
//! membership or order, so an interactive selection survives the timer.

use std::collections::{HashMap, HashSet};

use super::entity::ManagedEntity;

/// Mapping identity -> entity that remembers insertion order.
pub struct EntityContainer<E: ManagedEntity> {
    order: Vec<E::Key>,
    entries: HashMap<E::Key, E>,
}

impl<E: ManagedEntity> EntityContainer<E> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entity at the given position, in insertion order.
    pub fn get_index(&self, index: usize) -> Option<&E> {
        self.order.get(index).and_then(|k| self.entries.get(k))
    }

    /// Position of the entity with the given identity.
    pub fn index_of(&self, key: &E::Key) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }

    /// Iterates entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.order.iter().filter_map(|k| self.entries.get(k))
    }

    /// Reconciles membership against a fresh enumeration: surviving
    /// identities are updated in place (keeping their position), new ones
    /// are appended in enumeration order, vanished ones are dropped.
    ///
    /// Duplicate identities within one snapshot keep the first occurrence.
    pub fn full_refresh(&mut self, fresh: Vec<E>) {
        let mut seen: HashSet<E::Key> = HashSet::with_capacity(fresh.len());
        for entity in fresh {
            let key = entity.key();
            if !seen.insert(key.clone()) {
                continue;
            }
            if self.entries.insert(key.clone(), entity).is_none() {
                self.order.push(key);
            }
        }
        self.order.retain(|k| seen.contains(k));
        self.entries.retain(|k, _| seen.contains(k));
    }

    /// Folds field updates into existing entries only. Identities not
    /// currently in the container are ignored; entries missing from the
    /// fresh snapshot are kept unchanged until the next full refresh.
    pub fn auto_refresh(&mut self, fresh: Vec<E>) {
        for entity in fresh {
            if let Some(existing) = self.entries.get_mut(&entity.key()) {
                existing.absorb(entity);
            }
        }
    }
}

impl<E: ManagedEntity> Default for EntityContainer<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Action;
    use crate::core::entity::VisualState;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Item {
        id: u32,
        value: String,
    }

    impl ManagedEntity for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn id(&self) -> String {
            self.id.to_string()
        }

        fn label(&self) -> String {
            self.value.clone()
        }

        fn columns() -> &'static [&'static str] {
            &["Id", "Value"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.id.to_string(), self.value.clone()]
        }

        fn visual_state(&self) -> VisualState {
            VisualState::Neutral
        }

        fn eligible_actions(&self) -> Vec<Action> {
            Vec::new()
        }

        fn catalog() -> &'static [Action] {
            &[]
        }
    }

    fn item(id: u32, value: &str) -> Item {
        Item {
            id,
            value: value.to_string(),
        }
    }

    fn keys<E: ManagedEntity>(c: &EntityContainer<E>) -> Vec<E::Key> {
        c.iter().map(|e| e.key()).collect()
    }

    #[test]
    fn full_refresh_populates_in_enumeration_order() {
        let mut c = EntityContainer::new();
        c.full_refresh(vec![item(3, "c"), item(1, "a"), item(2, "b")]);
        assert_eq!(keys(&c), vec![3, 1, 2]);
    }

    #[test]
    fn full_refresh_updates_survivors_in_place_and_appends_new() {
        let mut c = EntityContainer::new();
        c.full_refresh(vec![item(1, "a"), item(2, "b"), item(3, "c")]);

        // 2 vanishes, 1 changes, 4 appears
        c.full_refresh(vec![item(4, "d"), item(1, "a2"), item(3, "c")]);

        assert_eq!(keys(&c), vec![1, 3, 4]);
        assert_eq!(c.get_index(0).unwrap().value, "a2");
        assert_eq!(c.index_of(&4), Some(2));
        assert_eq!(c.index_of(&2), None);
    }

    #[test]
    fn full_refresh_is_idempotent_on_quiescent_input() {
        let snapshot = vec![item(1, "a"), item(2, "b")];
        let mut c = EntityContainer::new();
        c.full_refresh(snapshot.clone());
        let before: Vec<Item> = c.iter().cloned().collect();
        c.full_refresh(snapshot);
        let after: Vec<Item> = c.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn full_refresh_keeps_first_of_duplicate_identities() {
        let mut c = EntityContainer::new();
        c.full_refresh(vec![item(1, "first"), item(1, "second")]);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get_index(0).unwrap().value, "first");
    }

    #[test]
    fn auto_refresh_never_changes_membership_or_order() {
        let mut c = EntityContainer::new();
        c.full_refresh(vec![item(1, "a"), item(2, "b"), item(3, "c")]);

        // 2 vanished, 5 is new, 1 changed fields
        c.auto_refresh(vec![item(1, "a2"), item(5, "new")]);

        assert_eq!(keys(&c), vec![1, 2, 3]);
        assert_eq!(c.get_index(0).unwrap().value, "a2");
        assert_eq!(c.get_index(1).unwrap().value, "b");
    }
}
