use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;

pub use repo::{ActivityLevel, UserProfile};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::profile_routes())
}
