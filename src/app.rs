use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/users/:user_id", get(handlers::profile_page))
        .route("/api/users", post(handlers::create_user))
        .route(
            "/api/users/:user_id",
            get(handlers::get_user).put(handlers::update_profile),
        )
        .route(
            "/api/users/:user_id/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/users/:user_id/categories/:category_id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route(
            "/api/users/:user_id/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/users/:user_id/tasks/:task_id",
            patch(handlers::update_task).delete(handlers::delete_task),
        )
        .route(
            "/api/users/:user_id/tasks/:task_id/toggle",
            post(handlers::toggle_task),
        )
        .route("/api/users/:user_id/stats", get(handlers::get_stats))
        .with_state(state)
}
