// Interview rooms: per-account mock interview configurations.

pub mod handlers;
pub mod models;
pub mod store;

pub use models::RoomUpdate;
pub use store::RoomStore;
