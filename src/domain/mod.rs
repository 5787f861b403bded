pub mod cart;
pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;

pub use cart::{Cart, CartItem};
pub use entities::{Category, Order, OrderItem, Product};
pub use errors::{DomainError, DomainResult};
pub use events::*;
pub use value_objects::{Money, OrderStatus, OrderStatusFilter};
