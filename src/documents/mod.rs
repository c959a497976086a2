pub mod handlers;
pub mod repo;
pub mod service;

pub use handlers::family_router;
