//! Plain data types. The ones stored in a collection implement
//! [`ActorEntity`](collection_actor::ActorEntity) in their actor module.

pub mod cancelled;
pub mod cart;
pub mod customer;
pub mod order;
pub mod product;
pub mod status;
pub mod variant;

pub use cancelled::*;
pub use cart::*;
pub use customer::*;
pub use order::*;
pub use product::*;
pub use status::*;
pub use variant::*;
