//! Type-safe wrappers around [`ResourceClient`](collection_actor::ResourceClient), one
//! per collection.

pub mod cancelled_client;
pub mod cart_client;
pub mod customer_client;
pub mod order_client;
pub mod product_client;

pub use cancelled_client::*;
pub use cart_client::*;
pub use customer_client::*;
pub use order_client::*;
pub use product_client::*;
