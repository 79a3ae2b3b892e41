// core/src/models/mod.rs

//! Records mirrored from the hosted data store, and the local shapes the
//! storefront derives from them.

pub mod order;
pub mod order_item;
pub mod product;
pub mod upload;

pub use order::{NewOrder, Order, OrderStatus, ShippingInfo};
pub use order_item::{NewOrderItem, OrderItem};
pub use product::{NewProduct, Product, ProductRow};
pub use upload::FileUpload;
