pub mod events;
pub mod history;
pub mod workers;

use axum::Router;

use crate::state::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .merge(events::admin_router())
        .merge(workers::admin_router())
        .merge(history::admin_router())
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .merge(events::public_router())
        .merge(workers::public_router())
        .merge(history::public_router())
}
