//! Domain models for shopd.

pub mod cart;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
