//! Gameplay entities: a component carrying health and movement stats.

use crate::component::{Component, ComponentContext};

/// Stats an entity kind starts from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityRegistration {
    pub registry_name: String,
    pub max_health: i32,
    pub movement_speed: f32,
}

impl EntityRegistration {
    pub fn new(registry_name: impl Into<String>, max_health: i32, movement_speed: f32) -> Self {
        Self {
            registry_name: registry_name.into(),
            max_health,
            movement_speed,
        }
    }
}

/// Health and movement state of a gameplay object.
///
/// Stats stay zeroed until the component is attached; `initialize` copies
/// them from the registration and fills health to the maximum.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    registration: EntityRegistration,
    pub custom_name: String,
    max_health: i32,
    health: i32,
    movement_speed: f32,
}

impl Entity {
    pub fn new(registration: EntityRegistration) -> Self {
        Self {
            registration,
            ..Self::default()
        }
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = name.into();
        self
    }

    pub fn registration(&self) -> &EntityRegistration {
        &self.registration
    }

    pub fn registry_name(&self) -> &str {
        &self.registration.registry_name
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn set_health(&mut self, health: i32) {
        self.health = health;
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Subtract `amount` from health. Health may go below zero.
    pub fn damage(&mut self, amount: i32) {
        self.health -= amount;
        if self.is_dead() {
            tracing::debug!(entity = %self.registration.registry_name, "entity died");
        }
    }

    /// Add `amount` to health, capped at the maximum.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

impl Component for Entity {
    fn initialize(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.max_health = self.registration.max_health;
        self.health = self.max_health;
        self.movement_speed = self.registration.movement_speed;
    }
}
