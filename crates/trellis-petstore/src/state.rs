//! In-memory storage shared by every handler.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::{NewOrder, NewPet, Order, Pet, PetStatus, User};

#[derive(Debug, Default)]
struct Store {
    pets: RwLock<BTreeMap<u64, Pet>>,
    orders: RwLock<BTreeMap<u64, Order>>,
    users: RwLock<BTreeMap<String, User>>,
    next_pet: AtomicU64,
    next_order: AtomicU64,
}

/// Shared application state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    store: Arc<Store>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_pets(&self) -> Vec<Pet> {
        self.store.pets.read().values().cloned().collect()
    }

    pub fn add_pet(&self, input: NewPet) -> Pet {
        let id = self.store.next_pet.fetch_add(1, Ordering::Relaxed) + 1;
        let pet = Pet {
            id,
            name: input.name,
            tag: input.tag,
            status: input.status,
        };
        self.store.pets.write().insert(id, pet.clone());
        pet
    }

    pub fn get_pet(&self, id: u64) -> Option<Pet> {
        self.store.pets.read().get(&id).cloned()
    }

    pub fn update_pet(&self, id: u64, input: NewPet) -> Option<Pet> {
        let mut pets = self.store.pets.write();
        let pet = pets.get_mut(&id)?;
        pet.name = input.name;
        pet.tag = input.tag;
        pet.status = input.status;
        Some(pet.clone())
    }

    pub fn remove_pet(&self, id: u64) -> Option<Pet> {
        self.store.pets.write().remove(&id)
    }

    /// Place an order, marking the pet pending. `None` if the pet does not
    /// exist or is not available.
    pub fn place_order(&self, input: NewOrder) -> Option<Order> {
        let mut pets = self.store.pets.write();
        let pet = pets.get_mut(&input.pet_id)?;
        if pet.status != PetStatus::Available {
            return None;
        }
        pet.status = PetStatus::Pending;

        let id = self.store.next_order.fetch_add(1, Ordering::Relaxed) + 1;
        let order = Order {
            id,
            pet_id: input.pet_id,
            quantity: input.quantity,
            complete: false,
        };
        self.store.orders.write().insert(id, order.clone());
        Some(order)
    }

    pub fn get_order(&self, id: u64) -> Option<Order> {
        self.store.orders.read().get(&id).cloned()
    }

    /// Pet counts by status name.
    pub fn inventory(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for pet in self.store.pets.read().values() {
            let key = match pet.status {
                PetStatus::Available => "available",
                PetStatus::Pending => "pending",
                PetStatus::Sold => "sold",
            };
            *counts.entry(key.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns false if the username is taken.
    pub fn add_user(&self, user: User) -> bool {
        let mut users = self.store.users.write();
        if users.contains_key(&user.username) {
            return false;
        }
        users.insert(user.username.clone(), user);
        true
    }

    pub fn get_user(&self, username: &str) -> Option<User> {
        self.store.users.read().get(username).cloned()
    }

    pub fn pet_count(&self) -> usize {
        self.store.pets.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_pet(name: &str) -> NewPet {
        NewPet {
            name: name.to_string(),
            tag: None,
            status: PetStatus::Available,
        }
    }

    #[test]
    fn ids_are_sequential() {
        let state = AppState::new();
        assert_eq!(state.add_pet(new_pet("rex")).id, 1);
        assert_eq!(state.add_pet(new_pet("tom")).id, 2);
        assert_eq!(state.list_pets().len(), 2);
    }

    #[test]
    fn order_marks_pet_pending() {
        let state = AppState::new();
        let pet = state.add_pet(new_pet("rex"));

        let order = state
            .place_order(NewOrder {
                pet_id: pet.id,
                quantity: 1,
            })
            .unwrap();
        assert_eq!(state.get_order(order.id), Some(order));
        assert_eq!(state.get_pet(pet.id).unwrap().status, PetStatus::Pending);

        // Not available any more.
        assert!(state
            .place_order(NewOrder {
                pet_id: pet.id,
                quantity: 1
            })
            .is_none());
        assert_eq!(state.inventory().get("pending"), Some(&1));
    }

    #[test]
    fn usernames_are_unique() {
        let state = AppState::new();
        let user = User {
            username: "ada".into(),
            email: "ada@example.com".into(),
        };
        assert!(state.add_user(user.clone()));
        assert!(!state.add_user(user));
    }
}
