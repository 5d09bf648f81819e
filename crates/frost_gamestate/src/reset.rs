//! Level-wide reset and pause broadcast
//!
//! Entities register themselves when the level builds them. The registry
//! only holds weak references, so an entity dropped by its owner simply
//! disappears from the next broadcast.

use frost_core::{CoreError, EntityId, Pausable, Resettable};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Outcome of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Entities the call reached
    pub invoked: usize,
    /// Entities that failed or were busy
    pub failed: usize,
    /// Dead registrations removed
    pub pruned: usize,
}

impl BroadcastReport {
    /// Whether every reached entity succeeded
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Registry of resettable and pausable entities
#[derive(Default)]
pub struct ResetRegistry {
    resettables: Vec<Weak<RefCell<dyn Resettable>>>,
    pausables: Vec<(EntityId, Weak<RefCell<dyn Pausable>>)>,
}

impl ResetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity for reset broadcasts
    pub fn register_resettable<T: Resettable + 'static>(&mut self, entity: &Rc<RefCell<T>>) {
        let entity: Rc<RefCell<dyn Resettable>> = entity.clone();
        self.resettables.push(Rc::downgrade(&entity));
    }

    /// Register an entity for pause broadcasts
    pub fn register_pausable<T: Pausable + 'static>(&mut self, id: EntityId, entity: &Rc<RefCell<T>>) {
        let entity: Rc<RefCell<dyn Pausable>> = entity.clone();
        self.pausables.push((id, Rc::downgrade(&entity)));
    }

    /// Live resettable registrations
    pub fn resettable_count(&self) -> usize {
        self.resettables.iter().filter(|w| w.strong_count() > 0).count()
    }

    /// Live pausable registrations
    pub fn pausable_count(&self) -> usize {
        self.pausables.iter().filter(|(_, w)| w.strong_count() > 0).count()
    }

    /// Reset every registered entity.
    ///
    /// A failing or busy entity is logged and skipped; the rest still reset.
    pub fn broadcast_reset(&mut self) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        self.resettables.retain(|weak| {
            let Some(entity) = weak.upgrade() else {
                report.pruned += 1;
                return false;
            };
            report.invoked += 1;

            let result = match entity.try_borrow_mut() {
                Ok(mut entity) => entity.on_reset(),
                Err(_) => Err(CoreError::EntityBusy),
            };
            if let Err(e) = result {
                report.failed += 1;
                log::warn!("Reset skipped an entity: {}", e);
            }
            true
        });

        log::info!(
            "Reset broadcast: {} invoked, {} failed, {} pruned",
            report.invoked,
            report.failed,
            report.pruned
        );
        report
    }

    /// Pause every registered threat agent
    pub fn broadcast_pause(&mut self) -> BroadcastReport {
        self.broadcast_pausable("pause", |p| p.stop_behaviour())
    }

    /// Resume every registered threat agent
    pub fn broadcast_resume(&mut self) -> BroadcastReport {
        self.broadcast_pausable("resume", |p| p.start_behaviour())
    }

    fn broadcast_pausable(&mut self, what: &str, call: impl Fn(&mut dyn Pausable) -> bool) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        self.pausables.retain(|(id, weak)| {
            let Some(entity) = weak.upgrade() else {
                report.pruned += 1;
                return false;
            };
            report.invoked += 1;

            match entity.try_borrow_mut() {
                Ok(mut entity) => {
                    call(&mut *entity);
                }
                Err(_) => {
                    report.failed += 1;
                    log::warn!("Cannot {} entity {}: busy", what, id);
                }
            }
            true
        });

        log::debug!("{} broadcast reached {} entities", what, report.invoked);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::Result as CoreResult;

    struct Counter {
        id: EntityId,
        resets: u32,
        fail: bool,
        paused: bool,
    }

    impl Counter {
        fn shared(id: u64) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                id: EntityId::from_raw(id),
                resets: 0,
                fail: false,
                paused: false,
            }))
        }
    }

    impl Resettable for Counter {
        fn entity(&self) -> EntityId {
            self.id
        }

        fn on_reset(&mut self) -> CoreResult<()> {
            self.resets += 1;
            if self.fail {
                return Err(CoreError::reset_failed(self.id, "test failure"));
            }
            Ok(())
        }
    }

    impl Pausable for Counter {
        fn stop_behaviour(&mut self) -> bool {
            !std::mem::replace(&mut self.paused, true)
        }

        fn start_behaviour(&mut self) -> bool {
            std::mem::replace(&mut self.paused, false)
        }
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = ResetRegistry::new();
        assert_eq!(registry.broadcast_reset(), BroadcastReport::default());
        assert_eq!(registry.broadcast_pause(), BroadcastReport::default());
    }

    #[test]
    fn test_single_entity_reset_once() {
        let mut registry = ResetRegistry::new();
        let a = Counter::shared(1);
        registry.register_resettable(&a);

        let report = registry.broadcast_reset();
        assert_eq!(report.invoked, 1);
        assert_eq!(a.borrow().resets, 1);
    }

    #[test]
    fn test_many_entities_each_reset_once() {
        let mut registry = ResetRegistry::new();
        let entities: Vec<_> = (0..25).map(Counter::shared).collect();
        for e in &entities {
            registry.register_resettable(e);
        }

        registry.broadcast_reset();
        registry.broadcast_reset();
        assert!(entities.iter().all(|e| e.borrow().resets == 2));
    }

    #[test]
    fn test_failure_is_isolated() {
        let mut registry = ResetRegistry::new();
        let a = Counter::shared(1);
        let b = Counter::shared(2);
        let c = Counter::shared(3);
        b.borrow_mut().fail = true;
        for e in [&a, &b, &c] {
            registry.register_resettable(e);
        }

        let report = registry.broadcast_reset();
        assert_eq!(report.invoked, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(a.borrow().resets, 1);
        assert_eq!(c.borrow().resets, 1);
    }

    #[test]
    fn test_busy_entity_counts_as_failed() {
        let mut registry = ResetRegistry::new();
        let a = Counter::shared(1);
        let b = Counter::shared(2);
        registry.register_resettable(&a);
        registry.register_resettable(&b);

        let _held = a.borrow_mut();
        let report = registry.broadcast_reset();
        assert_eq!(report.failed, 1);
        assert_eq!(b.borrow().resets, 1);
    }

    #[test]
    fn test_dropped_entities_pruned() {
        let mut registry = ResetRegistry::new();
        let a = Counter::shared(1);
        let b = Counter::shared(2);
        registry.register_resettable(&a);
        registry.register_resettable(&b);
        drop(b);

        let report = registry.broadcast_reset();
        assert_eq!(report.invoked, 1);
        assert_eq!(report.pruned, 1);
        assert_eq!(registry.resettable_count(), 1);
    }

    #[test]
    fn test_pause_and_resume_broadcast() {
        let mut registry = ResetRegistry::new();
        let a = Counter::shared(1);
        registry.register_pausable(EntityId::from_raw(1), &a);

        assert_eq!(registry.broadcast_pause().invoked, 1);
        assert!(a.borrow().paused);
        registry.broadcast_resume();
        assert!(!a.borrow().paused);
    }
}
