use crate::models::{NewPet, Pet, PetKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: u64,
    pets: BTreeMap<u64, Pet>,
}

/// In-memory pet registry shared by all handlers.
#[derive(Clone, Default)]
pub struct PetStore {
    inner: Arc<RwLock<Inner>>,
}

impl PetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self, kind: Option<PetKind>, limit: Option<usize>) -> Vec<Pet> {
        let inner = self.inner.read().await;
        inner
            .pets
            .values()
            .filter(|pet| kind.map_or(true, |k| pet.kind == k))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: u64) -> Option<Pet> {
        self.inner.read().await.pets.get(&id).cloned()
    }

    pub async fn create(&self, new: NewPet) -> Pet {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let pet = Pet {
            id: inner.next_id,
            name: new.name,
            kind: new.kind,
        };
        inner.pets.insert(pet.id, pet.clone());
        pet
    }

    pub async fn update(&self, id: u64, new: NewPet) -> Option<Pet> {
        let mut inner = self.inner.write().await;
        let pet = inner.pets.get_mut(&id)?;
        pet.name = new.name;
        pet.kind = new.kind;
        Some(pet.clone())
    }

    pub async fn remove(&self, id: u64) -> Option<Pet> {
        self.inner.write().await.pets.remove(&id)
    }
}
