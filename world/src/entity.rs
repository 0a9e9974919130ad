//! Entities living on the lane.

use serde::Serialize;
use spire_siege_core::{
    EntityId, EntityKind, EntityState, ProjectileData, Stats, StatusEffect,
};

/// Combatant occupying a position on the lane.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entity {
    /// Identifier allocated by the world.
    pub id: EntityId,
    /// Broad category.
    pub kind: EntityKind,
    /// Definition the entity was created from.
    pub def_id: String,
    /// Lane position; 0 is the tower end and 100 the spawn end.
    pub position: f64,
    /// Current, possibly modified, stats.
    pub stats: Stats,
    /// Unmodified stats captured on the first status pass.
    pub base_stats: Option<Stats>,
    /// Finite state.
    pub state: EntityState,
    /// Weak reference to the current target, resolved by id every tick.
    pub target: Option<EntityId>,
    /// Seconds until the next attack is allowed.
    pub attack_cooldown: f64,
    /// Active status effects in application order.
    pub status_effects: Vec<StatusEffect>,
    /// Payload of projectile entities.
    pub projectile: Option<ProjectileData>,
    /// Seconds left in the death animation.
    pub death_timer: Option<f64>,
}

impl Entity {
    /// Creates an entity with no target, cooldown or effects.
    #[must_use]
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        def_id: impl Into<String>,
        position: f64,
        stats: Stats,
        state: EntityState,
    ) -> Self {
        Self {
            id,
            kind,
            def_id: def_id.into(),
            position,
            stats,
            base_stats: None,
            state,
            target: None,
            attack_cooldown: 0.0,
            status_effects: Vec::new(),
            projectile: None,
            death_timer: None,
        }
    }

    /// Reports whether other entities may still lock onto this one.
    #[must_use]
    pub const fn is_targetable(&self) -> bool {
        !self.state.is_dead()
    }

    /// Lane distance to another entity.
    #[must_use]
    pub fn distance_to(&self, other: &Entity) -> f64 {
        (self.position - other.position).abs()
    }

    /// Reports whether `other` is within this entity's attack range.
    #[must_use]
    pub fn in_attack_range(&self, other: &Entity) -> bool {
        self.distance_to(other) <= self.stats.range
    }
}

/// Parameters for launching a projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileLaunch {
    /// Lane position the projectile starts at.
    pub position: f64,
    /// Signed lane units per second; positive travels toward the spawn end.
    pub speed: f64,
    /// Enemy a homing projectile chases.
    pub target: Option<EntityId>,
    /// Hit payload.
    pub data: ProjectileData,
}

/// Returns the entity nearest to `position` that passes `filter`.
///
/// Ties keep the first entity encountered.
pub fn nearest<'a, F>(position: f64, entities: &'a [Entity], mut filter: F) -> Option<&'a Entity>
where
    F: FnMut(&Entity) -> bool,
{
    let mut best: Option<(&Entity, f64)> = None;
    for entity in entities {
        if !filter(entity) {
            continue;
        }
        let distance = (entity.position - position).abs();
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((entity, distance)),
        }
    }
    best.map(|(entity, _)| entity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker(id: u32, position: f64) -> Entity {
        Entity::new(
            EntityId::new(id),
            EntityKind::Enemy,
            "test",
            position,
            Stats::new(10.0, 1.0, 5.0, 1.0, 1.0),
            EntityState::Walking,
        )
    }

    #[test]
    fn nearest_prefers_first_on_ties() {
        let entities = vec![walker(1, 40.0), walker(2, 60.0), walker(3, 30.0)];
        let found = nearest(50.0, &entities, |_| true).expect("candidate");
        assert_eq!(found.id, EntityId::new(1));
    }

    #[test]
    fn nearest_respects_filter() {
        let mut entities = vec![walker(1, 49.0), walker(2, 70.0)];
        entities[0].state = EntityState::Dead;
        let found = nearest(50.0, &entities, Entity::is_targetable).expect("candidate");
        assert_eq!(found.id, EntityId::new(2));
    }

    #[test]
    fn range_check_is_inclusive() {
        let attacker = walker(1, 10.0);
        assert!(attacker.in_attack_range(&walker(2, 15.0)));
        assert!(!attacker.in_attack_range(&walker(3, 15.5)));
    }
}
