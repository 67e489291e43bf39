use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod memory;
pub mod repo;
pub mod repo_types;
pub mod services;
#[cfg(test)]
pub mod test_support;
pub mod validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::submit_routes())
        .merge(handlers::list_routes())
}
