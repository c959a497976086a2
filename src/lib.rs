pub mod app;
pub mod auth;
pub mod config;
pub mod content;
pub mod documents;
pub mod error;
pub mod families;
pub mod gallery;
pub mod notify;
pub mod state;
pub mod storage;
pub mod tax;
