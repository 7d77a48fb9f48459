//! Domain models
//!
//! Client-side representations of the backend resources. The authoritative
//! copies live server-side; these are the cached wire shapes.

pub mod cart;
pub mod category;
pub mod contact;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, CartItemAdd, CartItemUpdate, cart_totals};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use contact::ContactMessage;
pub use order::{
    Order, OrderCreate, OrderItem, OrderStatus, OrderStatusUpdate, PaymentStatus, ShippingAddress,
};
pub use product::{Product, ProductCreate, ProductQuery, ProductUpdate};
pub use user::{User, UserRole, UserStatus, UserStatusUpdate};
