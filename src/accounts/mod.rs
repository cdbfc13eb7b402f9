use axum::Router;

use crate::db::AppState;

pub mod dto;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::profile_routes())
}
