pub mod handlers;
pub mod repo;

pub use handlers::{admin_router, public_router};
