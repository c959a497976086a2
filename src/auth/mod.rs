mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub use claims::Role;
pub use extractors::{AdminAuth, FamilyAuth};
pub use handlers::admin_router;
