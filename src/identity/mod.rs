use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::actor::{Actor, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierProfile {
    pub id: Uuid,
    pub name: String,
    pub verified: bool,
}

#[derive(Debug, Clone)]
struct Registration {
    actor: Actor,
    name: String,
}

/// Token-keyed registry of everyone who can call the API. Registration hands
/// out an opaque bearer token; couriers start unverified and stay locked out
/// of claiming work until an admin flips them.
#[derive(Default)]
pub struct TokenDirectory {
    users: DashMap<String, Registration>,
}

impl TokenDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str, role: Role) -> (String, Actor) {
        let token = Uuid::new_v4().to_string();
        let actor = self.insert(token.clone(), name, role);
        (token, actor)
    }

    /// Installs an actor under a known token. Used at startup to plant the
    /// admin account from configuration.
    pub fn seed(&self, token: &str, name: &str, role: Role) -> Actor {
        self.insert(token.to_string(), name, role)
    }

    pub fn resolve(&self, token: &str) -> Option<Actor> {
        self.users.get(token).map(|entry| entry.actor)
    }

    pub fn unverified_couriers(&self) -> Vec<CourierProfile> {
        let mut couriers: Vec<CourierProfile> = self
            .users
            .iter()
            .filter(|entry| entry.actor.role == Role::Courier && !entry.actor.verified)
            .map(|entry| profile(&entry))
            .collect();
        couriers.sort_by(|a, b| a.name.cmp(&b.name));
        couriers
    }

    /// Marks a courier as verified. Returns the updated profile, or None when
    /// no courier has that id.
    pub fn verify_courier(&self, courier_id: Uuid) -> Option<CourierProfile> {
        self.users
            .iter_mut()
            .find(|entry| entry.actor.role == Role::Courier && entry.actor.id == courier_id)
            .map(|mut entry| {
                entry.actor.verified = true;
                profile(&entry)
            })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn insert(&self, token: String, name: &str, role: Role) -> Actor {
        let actor = Actor {
            id: Uuid::new_v4(),
            role,
            // Couriers earn verification through an admin; everyone else is
            // trusted at registration.
            verified: role != Role::Courier,
        };
        self.users.insert(
            token,
            Registration {
                actor,
                name: name.to_string(),
            },
        );
        actor
    }
}

fn profile(registration: &Registration) -> CourierProfile {
    CourierProfile {
        id: registration.actor.id,
        name: registration.name.clone(),
        verified: registration.actor.verified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_tokens_resolve_to_their_actor() {
        let directory = TokenDirectory::new();

        let (token, actor) = directory.register("Alice", Role::Customer);

        let resolved = directory.resolve(&token).unwrap();
        assert_eq!(resolved.id, actor.id);
        assert_eq!(resolved.role, Role::Customer);
        assert!(resolved.verified);
    }

    #[test]
    fn unknown_tokens_resolve_to_nothing() {
        let directory = TokenDirectory::new();
        assert!(directory.resolve("no-such-token").is_none());
    }

    #[test]
    fn couriers_register_unverified() {
        let directory = TokenDirectory::new();

        let (_, actor) = directory.register("Bob", Role::Courier);

        assert!(!actor.verified);
        let pending = directory.unverified_couriers();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, actor.id);
    }

    #[test]
    fn verify_courier_flips_the_flag_once() {
        let directory = TokenDirectory::new();
        let (token, actor) = directory.register("Bob", Role::Courier);

        let updated = directory.verify_courier(actor.id).unwrap();
        assert!(updated.verified);
        assert!(directory.resolve(&token).unwrap().verified);
        assert!(directory.unverified_couriers().is_empty());
    }

    #[test]
    fn verify_courier_ignores_non_couriers_and_unknown_ids() {
        let directory = TokenDirectory::new();
        let (_, customer) = directory.register("Alice", Role::Customer);

        assert!(directory.verify_courier(customer.id).is_none());
        assert!(directory.verify_courier(Uuid::new_v4()).is_none());
    }

    #[test]
    fn unverified_couriers_come_back_sorted_by_name() {
        let directory = TokenDirectory::new();
        directory.register("Zoe", Role::Courier);
        directory.register("Ann", Role::Courier);
        directory.register("Mia", Role::Courier);

        let names: Vec<String> = directory
            .unverified_couriers()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Ann", "Mia", "Zoe"]);
    }

    #[test]
    fn seeded_tokens_are_usable_immediately() {
        let directory = TokenDirectory::new();

        let actor = directory.seed("dev-admin-token", "Ops", Role::Admin);

        let resolved = directory.resolve("dev-admin-token").unwrap();
        assert_eq!(resolved.id, actor.id);
        assert_eq!(resolved.role, Role::Admin);
        assert_eq!(directory.len(), 1);
    }
}
