use crate::errors::AppError;
use crate::models::{
    Category, CreateCategoryRequest, CreateTaskRequest, CreateUserRequest, Task, TaskStats,
    TaskWithCategory, ToggleRequest, UpdateCategoryRequest, UpdateProfileRequest,
    UpdateTaskRequest, User,
};
use crate::records;
use crate::state::AppState;
use crate::stats::build_stats;
use crate::ui::{render_index, render_profile};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_index(&data.users))
}

pub async fn profile_page(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let data = state.data.lock().await;
    let user = records::get_user(&data, user_id)?;
    let stats = build_stats(&records::task_stat_rows(&data, user_id)?);
    Ok(Html(render_profile(user, &stats)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state
        .update(|data| {
            records::create_user(
                data,
                Utc::now(),
                &payload.email,
                payload.display_name,
                payload.avatar_url,
            )
        })
        .await?;

    info!(user_id = %user.id, "created user");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(records::get_user(&data, user_id)?.clone()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .update(|data| {
            records::update_user_profile(data, user_id, &payload.display_name, payload.avatar_url)
        })
        .await?;
    Ok(Json(user))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Category>>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(records::get_categories(&data, user_id)?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state
        .update(|data| {
            records::create_category(
                data,
                Utc::now(),
                user_id,
                &payload.name,
                payload.color.as_deref(),
            )
        })
        .await?;

    info!(%user_id, category_id = %category.id, "created category");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = state
        .update(|data| {
            records::update_category(data, user_id, category_id, &payload.name, &payload.color)
        })
        .await?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .update(|data| records::delete_category(data, user_id, category_id))
        .await?;

    info!(%user_id, %category_id, "deleted category");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<TaskWithCategory>>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(records::get_tasks(&data, user_id)?))
}

pub async fn create_task(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = state
        .update(|data| {
            records::create_task(
                data,
                Utc::now(),
                user_id,
                &payload.title,
                payload.description,
                payload.category_id,
                payload.due_date,
            )
        })
        .await?;

    info!(%user_id, task_id = %task.id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let task = state
        .update(|data| records::update_task(data, user_id, task_id, payload))
        .await?;
    Ok(Json(task))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<Task>, AppError> {
    let task = state
        .update(|data| records::toggle_task_completion(data, user_id, task_id, payload.is_complete))
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .update(|data| records::delete_task(data, user_id, task_id))
        .await?;

    info!(%user_id, %task_id, "deleted task");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<TaskStats>, AppError> {
    let data = state.data.lock().await;
    let rows = records::task_stat_rows(&data, user_id)?;
    Ok(Json(build_stats(&rows)))
}
