//! Aggregates module
pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use address::{Address, AddressPatch, NewAddress};
pub use cart::{Cart, CartChange, CartError, LineItem};
pub use order::{Order, OrderError, OrderStatus, PaymentMethod};
pub use product::{generate_catalog_id, Product};
pub use user::{ProfilePatch, User};
