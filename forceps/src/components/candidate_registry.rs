use hecs::Entity;
use log::debug;

use crate::contexts::SpatialQuery;

/// The grabbable objects currently touching a tool.
///
/// Kept in sync by contact begin/end notifications. Entries are handles to objects the scene owns,
/// so any of them may have been destroyed since it was registered: [`CandidateRegistry::snapshot`]
/// only yields the ones that still exist.
///
/// Candidates are kept in registration order, which is what breaks ties between equally distant
/// candidates.
#[derive(Debug, Clone, Default)]
pub struct CandidateRegistry {
    candidates: Vec<Entity>,
}

impl CandidateRegistry {
    /// Add `entity`. Registering an entity twice has no effect.
    pub fn register(&mut self, entity: Entity) {
        if self.candidates.contains(&entity) {
            return;
        }
        debug!("[FORCEPS_CANDIDATES] {entity:?} is in range");
        self.candidates.push(entity);
    }

    /// Remove `entity`. Does nothing if it was never registered.
    pub fn unregister(&mut self, entity: Entity) {
        if let Some(index) = self.candidates.iter().position(|c| *c == entity) {
            debug!("[FORCEPS_CANDIDATES] {entity:?} is out of range");
            self.candidates.remove(index);
        }
    }

    /// The registered candidates that still exist. The iterator is lazy and can be cloned to walk
    /// the candidates again.
    pub fn snapshot<'a, Q: SpatialQuery>(
        &'a self,
        query: &'a Q,
    ) -> impl Iterator<Item = Entity> + Clone + 'a {
        self.candidates
            .iter()
            .copied()
            .filter(move |entity| query.contains(*entity))
    }

    /// Forget about candidates that no longer exist.
    pub fn prune<Q: SpatialQuery>(&mut self, query: &Q) {
        self.candidates.retain(|entity| query.contains(*entity));
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.candidates.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::util::FakeSpace;

    #[test]
    fn test_register_and_unregister() {
        let mut space = FakeSpace::default();
        let a = space.add([0., 0., 0.]);
        let b = space.add([1., 0., 0.]);
        let c = space.add([2., 0., 0.]);

        let mut registry = CandidateRegistry::default();
        registry.register(a);
        registry.register(b);
        registry.register(a);
        registry.unregister(c);
        registry.register(c);
        registry.unregister(b);
        registry.unregister(b);

        let snapshot: HashSet<Entity> = registry.snapshot(&space).collect();
        assert_eq!(snapshot, HashSet::from([a, c]));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_snapshot_matches_registered_set_for_any_sequence() {
        let mut space = FakeSpace::default();
        let objects = (0..4)
            .map(|i| space.add([i as f32, 0., 0.]))
            .collect::<Vec<_>>();

        // A fixed but irregular mix of register/unregister calls, with duplicates and absentees.
        let operations = [
            (true, 0),
            (true, 1),
            (true, 1),
            (false, 3),
            (true, 2),
            (false, 0),
            (true, 3),
            (false, 0),
            (true, 0),
            (false, 2),
            (true, 2),
            (true, 2),
            (false, 1),
        ];

        let mut registry = CandidateRegistry::default();
        let mut expected = HashSet::new();
        for (register, index) in operations {
            let entity = objects[index];
            if register {
                registry.register(entity);
                expected.insert(entity);
            } else {
                registry.unregister(entity);
                expected.remove(&entity);
            }

            let snapshot = registry.snapshot(&space).collect::<Vec<_>>();
            assert_eq!(snapshot.len(), expected.len(), "no duplicates");
            assert_eq!(snapshot.into_iter().collect::<HashSet<_>>(), expected);
        }
    }

    #[test]
    fn test_snapshot_skips_destroyed_objects() {
        let mut space = FakeSpace::default();
        let a = space.add([0., 0., 0.]);
        let b = space.add([1., 0., 0.]);

        let mut registry = CandidateRegistry::default();
        registry.register(a);
        registry.register(b);
        space.remove(a);

        let snapshot = registry.snapshot(&space);
        assert_eq!(snapshot.clone().collect::<Vec<_>>(), vec![b]);
        // Restartable
        assert_eq!(snapshot.collect::<Vec<_>>(), vec![b]);

        // The stale entry is still there until pruned
        assert!(registry.contains(a));
        registry.prune(&space);
        assert!(!registry.contains(a));
        assert_eq!(registry.len(), 1);
    }
}
