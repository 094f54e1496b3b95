// Account store: registration, login, profile updates, and the current-account slot.

pub mod handlers;
pub mod models;
pub mod password;
pub mod store;

pub use models::Account;
pub use store::AccountStore;
