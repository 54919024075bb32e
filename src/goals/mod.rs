use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod period;
pub mod repo;

pub use repo::{GoalType, SystemGoal, UserGoals};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::goal_routes())
        .merge(handlers::catalog_routes())
}
