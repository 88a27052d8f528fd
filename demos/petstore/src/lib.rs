pub mod models;
pub mod routes;
pub mod store;

pub use routes::{app, pet_routes};
pub use store::PetStore;
