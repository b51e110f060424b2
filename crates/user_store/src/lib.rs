//! Local user mirror storage for idgate.
//!
//! The remote identity provider owns credentials and the email-verification
//! flag; this crate owns the local mirror record (confirmation token, local
//! enablement). Mutations are staged and only become durable on `commit`,
//! mirroring a unit-of-work boundary.

mod error;
mod memory;
mod postgres;
mod traits;
mod user;

pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use traits::*;
pub use user::*;
