//! Deferred state transitions keyed by entity and timer kind.
//!
//! Every timer is identified by a [`Timer`] value that embeds the owning
//! entity, so there is at most one pending entry per (entity, kind).
//! Scheduling an already-pending timer replaces its due time.

use std::collections::BTreeMap;

use super::types::{EntityId, ProjectileId, Timestamp};

/// Pending deferred transition.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Timer {
    /// Turns a frog player back into a human.
    FrogRevert(EntityId),
    /// Brings the hand out once a force-dropped wand has settled.
    HandSettle(EntityId),
    /// Re-arms a wand after a cast.
    CastCooldown(EntityId),
    /// Refills a reloading wand.
    Reload(EntityId),
    /// Tears down a projectile that never resolved.
    ProjectileExpire(ProjectileId),
    /// Tears down a resolved projectile after the grace delay.
    ProjectileDespawn(ProjectileId),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scheduler {
    entries: BTreeMap<Timer, Timestamp>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `timer` at `due`, returning the due time it replaced.
    pub fn schedule(&mut self, timer: Timer, due: Timestamp) -> Option<Timestamp> {
        self.entries.insert(timer, due)
    }

    /// Cancels `timer`, returning its due time if it was pending.
    pub fn cancel(&mut self, timer: Timer) -> Option<Timestamp> {
        self.entries.remove(&timer)
    }

    pub fn due_at(&self, timer: Timer) -> Option<Timestamp> {
        self.entries.get(&timer).copied()
    }

    pub fn is_pending(&self, timer: Timer) -> bool {
        self.entries.contains_key(&timer)
    }

    /// Removes and returns the earliest timer due at or before `now`.
    ///
    /// Ties on the due time are broken by the [`Timer`] ordering, which keeps
    /// firing order deterministic.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(Timer, Timestamp)> {
        let (timer, due) = self
            .entries
            .iter()
            .filter(|(_, due)| **due <= now)
            .min_by_key(|(timer, due)| (**due, **timer))
            .map(|(timer, due)| (*timer, *due))?;
        self.entries.remove(&timer);
        Some((timer, due))
    }

    /// Next due time, if anything is pending.
    pub fn next_due(&self) -> Option<Timestamp> {
        self.entries.values().min().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescheduling_replaces_entry() {
        let mut scheduler = Scheduler::new();
        let timer = Timer::FrogRevert(EntityId(1));

        assert_eq!(scheduler.schedule(timer, Timestamp(100)), None);
        assert_eq!(scheduler.schedule(timer, Timestamp(250)), Some(Timestamp(100)));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.due_at(timer), Some(Timestamp(250)));
    }

    #[test]
    fn pops_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Timer::Reload(EntityId(7)), Timestamp(300));
        scheduler.schedule(Timer::FrogRevert(EntityId(2)), Timestamp(100));
        scheduler.schedule(Timer::CastCooldown(EntityId(7)), Timestamp(100));

        assert_eq!(
            scheduler.pop_due(Timestamp(500)),
            Some((Timer::FrogRevert(EntityId(2)), Timestamp(100)))
        );
        assert_eq!(
            scheduler.pop_due(Timestamp(500)),
            Some((Timer::CastCooldown(EntityId(7)), Timestamp(100)))
        );
        assert_eq!(
            scheduler.pop_due(Timestamp(500)),
            Some((Timer::Reload(EntityId(7)), Timestamp(300)))
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn nothing_due_before_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Timer::HandSettle(EntityId(1)), Timestamp(100));

        assert_eq!(scheduler.pop_due(Timestamp(99)), None);
        assert_eq!(scheduler.next_due(), Some(Timestamp(100)));
    }

    #[test]
    fn cancel_removes_pending_entry() {
        let mut scheduler = Scheduler::new();
        let timer = Timer::ProjectileExpire(ProjectileId(3));
        scheduler.schedule(timer, Timestamp(10));

        assert_eq!(scheduler.cancel(timer), Some(Timestamp(10)));
        assert!(!scheduler.is_pending(timer));
        assert_eq!(scheduler.cancel(timer), None);
    }
}
