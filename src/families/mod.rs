pub mod dto;
pub mod handlers;
pub mod repo;

pub use handlers::{admin_router, family_router};
