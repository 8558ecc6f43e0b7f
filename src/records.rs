//! User-scoped queries and mutations over the stored records.
//!
//! Every operation checks that the user exists and only ever touches rows
//! owned by that user. Callers pass `now` so creation times are testable.

use crate::errors::AppError;
use crate::models::{
    AppData, Category, CategoryLabel, Task, TaskStatRow, TaskWithCategory, UpdateTaskRequest,
    User,
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub const DEFAULT_CATEGORY_COLOR: &str = "#FF5733";

pub fn create_user(
    data: &mut AppData,
    now: DateTime<Utc>,
    email: &str,
    display_name: Option<String>,
    avatar_url: Option<String>,
) -> Result<User, AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::bad_request("email must not be empty"));
    }
    if data
        .users
        .iter()
        .any(|user| user.email.eq_ignore_ascii_case(email))
    {
        return Err(AppError::conflict("email is already registered"));
    }

    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        display_name: non_blank(display_name),
        avatar_url: non_blank(avatar_url),
        created_at: now,
    };
    data.users.push(user.clone());
    Ok(user)
}

pub fn get_user(data: &AppData, user_id: Uuid) -> Result<&User, AppError> {
    data.users
        .iter()
        .find(|user| user.id == user_id)
        .ok_or_else(|| AppError::not_found("user not found"))
}

pub fn update_user_profile(
    data: &mut AppData,
    user_id: Uuid,
    display_name: &str,
    avatar_url: Option<String>,
) -> Result<User, AppError> {
    let user = data
        .users
        .iter_mut()
        .find(|user| user.id == user_id)
        .ok_or_else(|| AppError::not_found("user not found"))?;
    user.display_name = non_blank(Some(display_name.to_string()));
    user.avatar_url = non_blank(avatar_url);
    Ok(user.clone())
}

pub fn get_categories(data: &AppData, user_id: Uuid) -> Result<Vec<Category>, AppError> {
    get_user(data, user_id)?;
    let mut categories: Vec<_> = data
        .categories
        .iter()
        .filter(|category| category.user_id == user_id)
        .cloned()
        .collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
}

pub fn create_category(
    data: &mut AppData,
    now: DateTime<Utc>,
    user_id: Uuid,
    name: &str,
    color: Option<&str>,
) -> Result<Category, AppError> {
    get_user(data, user_id)?;
    let name = category_name(name)?;
    let color = color
        .map(str::trim)
        .filter(|color| !color.is_empty())
        .unwrap_or(DEFAULT_CATEGORY_COLOR);

    let category = Category {
        id: Uuid::new_v4(),
        user_id,
        name,
        color: color.to_string(),
        created_at: now,
    };
    data.categories.push(category.clone());
    Ok(category)
}

pub fn update_category(
    data: &mut AppData,
    user_id: Uuid,
    category_id: Uuid,
    name: &str,
    color: &str,
) -> Result<Category, AppError> {
    get_user(data, user_id)?;
    let name = category_name(name)?;
    let color = color.trim();
    if color.is_empty() {
        return Err(AppError::bad_request("category color must not be empty"));
    }

    let category = data
        .categories
        .iter_mut()
        .find(|category| category.id == category_id && category.user_id == user_id)
        .ok_or_else(|| AppError::not_found("category not found"))?;
    category.name = name;
    category.color = color.to_string();
    Ok(category.clone())
}

/// Removes a category; tasks filed under it become uncategorized.
pub fn delete_category(data: &mut AppData, user_id: Uuid, category_id: Uuid) -> Result<(), AppError> {
    get_user(data, user_id)?;
    let before = data.categories.len();
    data.categories
        .retain(|category| !(category.id == category_id && category.user_id == user_id));
    if data.categories.len() == before {
        return Err(AppError::not_found("category not found"));
    }

    for task in data.tasks.iter_mut().filter(|task| task.user_id == user_id) {
        if task.category_id == Some(category_id) {
            task.category_id = None;
        }
    }
    Ok(())
}

/// The user's tasks joined with their categories, newest first.
pub fn get_tasks(data: &AppData, user_id: Uuid) -> Result<Vec<TaskWithCategory>, AppError> {
    get_user(data, user_id)?;
    let mut tasks: Vec<_> = data
        .tasks
        .iter()
        .filter(|task| task.user_id == user_id)
        .map(|task| TaskWithCategory {
            task: task.clone(),
            category: task
                .category_id
                .and_then(|id| category_label(data, user_id, id)),
        })
        .collect();
    tasks.sort_by(|a, b| b.task.created_at.cmp(&a.task.created_at));
    Ok(tasks)
}

pub fn create_task(
    data: &mut AppData,
    now: DateTime<Utc>,
    user_id: Uuid,
    title: &str,
    description: Option<String>,
    category_id: Option<Uuid>,
    due_date: Option<NaiveDate>,
) -> Result<Task, AppError> {
    get_user(data, user_id)?;
    let title = task_title(title)?;
    if let Some(id) = category_id {
        ensure_owned_category(data, user_id, id)?;
    }

    let task = Task {
        id: Uuid::new_v4(),
        user_id,
        title,
        description: non_blank(description),
        is_complete: false,
        category_id,
        due_date,
        created_at: now,
    };
    data.tasks.push(task.clone());
    Ok(task)
}

pub fn update_task(
    data: &mut AppData,
    user_id: Uuid,
    task_id: Uuid,
    update: UpdateTaskRequest,
) -> Result<Task, AppError> {
    get_user(data, user_id)?;
    let title = update.title.as_deref().map(task_title).transpose()?;
    if let Some(Some(id)) = update.category_id {
        ensure_owned_category(data, user_id, id)?;
    }

    let task = data
        .tasks
        .iter_mut()
        .find(|task| task.id == task_id && task.user_id == user_id)
        .ok_or_else(|| AppError::not_found("task not found"))?;

    if let Some(title) = title {
        task.title = title;
    }
    if let Some(description) = update.description {
        task.description = non_blank(description);
    }
    if let Some(is_complete) = update.is_complete {
        task.is_complete = is_complete;
    }
    if let Some(category_id) = update.category_id {
        task.category_id = category_id;
    }
    if let Some(due_date) = update.due_date {
        task.due_date = due_date;
    }
    Ok(task.clone())
}

pub fn toggle_task_completion(
    data: &mut AppData,
    user_id: Uuid,
    task_id: Uuid,
    is_complete: bool,
) -> Result<Task, AppError> {
    update_task(
        data,
        user_id,
        task_id,
        UpdateTaskRequest {
            is_complete: Some(is_complete),
            ..Default::default()
        },
    )
}

pub fn delete_task(data: &mut AppData, user_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
    get_user(data, user_id)?;
    let before = data.tasks.len();
    data.tasks
        .retain(|task| !(task.id == task_id && task.user_id == user_id));
    if data.tasks.len() == before {
        return Err(AppError::not_found("task not found"));
    }
    Ok(())
}

/// Input rows for [`crate::stats::build_stats`].
pub fn task_stat_rows(data: &AppData, user_id: Uuid) -> Result<Vec<TaskStatRow>, AppError> {
    get_user(data, user_id)?;
    Ok(data
        .tasks
        .iter()
        .filter(|task| task.user_id == user_id)
        .map(|task| TaskStatRow {
            is_complete: task.is_complete,
            category_id: task.category_id,
            category: task
                .category_id
                .and_then(|id| category_label(data, user_id, id)),
        })
        .collect())
}

fn category_label(data: &AppData, user_id: Uuid, category_id: Uuid) -> Option<CategoryLabel> {
    data.categories
        .iter()
        .find(|category| category.id == category_id && category.user_id == user_id)
        .map(|category| CategoryLabel {
            name: category.name.clone(),
            color: category.color.clone(),
        })
}

fn ensure_owned_category(data: &AppData, user_id: Uuid, category_id: Uuid) -> Result<(), AppError> {
    if category_label(data, user_id, category_id).is_none() {
        return Err(AppError::bad_request("category does not exist"));
    }
    Ok(())
}

fn category_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("category name must not be empty"));
    }
    Ok(name.to_string())
}

fn task_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("task title must not be empty"));
    }
    Ok(title.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::build_stats;
    use axum::http::StatusCode;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
    }

    fn with_user() -> (AppData, Uuid) {
        let mut data = AppData::default();
        let user = create_user(&mut data, start(), "jane@example.com", Some("Jane".into()), None)
            .unwrap();
        (data, user.id)
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (mut data, _) = with_user();
        let err = create_user(&mut data, start(), " JANE@example.com ", None, None).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        let err = create_user(&mut data, start(), "  ", None, None).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn profile_update_replaces_fields() {
        let (mut data, user_id) = with_user();
        let user = update_user_profile(&mut data, user_id, "Jane D", Some("https://a/b.png".into()))
            .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Jane D"));
        assert_eq!(user.avatar_url.as_deref(), Some("https://a/b.png"));
        assert_eq!(get_user(&data, user_id).unwrap(), &user);
    }

    #[test]
    fn categories_are_sorted_by_name_and_default_color() {
        let (mut data, user_id) = with_user();
        create_category(&mut data, start(), user_id, "Work", Some("#3357FF")).unwrap();
        let personal = create_category(&mut data, start(), user_id, " Personal ", None).unwrap();
        assert_eq!(personal.name, "Personal");
        assert_eq!(personal.color, DEFAULT_CATEGORY_COLOR);

        let names: Vec<_> = get_categories(&data, user_id)
            .unwrap()
            .into_iter()
            .map(|category| category.name)
            .collect();
        assert_eq!(names, ["Personal", "Work"]);
    }

    #[test]
    fn renamed_category_shows_in_stats() {
        let (mut data, user_id) = with_user();
        let work = create_category(&mut data, start(), user_id, "Work", None).unwrap();
        create_task(&mut data, start(), user_id, "memo", None, Some(work.id), None).unwrap();

        let renamed = update_category(&mut data, user_id, work.id, " Office ", "#33CCFF").unwrap();
        assert_eq!(renamed.name, "Office");

        let stats = build_stats(&task_stat_rows(&data, user_id).unwrap());
        assert_eq!(stats.category_counts[&work.id].name, "Office");
        assert_eq!(stats.category_counts[&work.id].color, "#33CCFF");
        assert_eq!(get_tasks(&data, user_id).unwrap()[0].category.as_ref().unwrap().name, "Office");
    }

    #[test]
    fn blank_names_are_rejected() {
        let (mut data, user_id) = with_user();
        let err = create_category(&mut data, start(), user_id, "   ", None).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let err = create_task(&mut data, start(), user_id, "", None, None, None).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(data.categories.is_empty());
        assert!(data.tasks.is_empty());
    }

    #[test]
    fn tasks_are_listed_newest_first_with_category() {
        let (mut data, user_id) = with_user();
        let work = create_category(&mut data, start(), user_id, "Work", None).unwrap();
        create_task(&mut data, start(), user_id, "first", None, None, None).unwrap();
        create_task(
            &mut data,
            start() + Duration::minutes(5),
            user_id,
            "second",
            Some("details".into()),
            Some(work.id),
            None,
        )
        .unwrap();

        let tasks = get_tasks(&data, user_id).unwrap();
        assert_eq!(tasks[0].task.title, "second");
        assert_eq!(tasks[0].category.as_ref().unwrap().name, "Work");
        assert_eq!(tasks[1].task.title, "first");
        assert!(tasks[1].category.is_none());
    }

    #[test]
    fn update_task_applies_only_given_fields() {
        let (mut data, user_id) = with_user();
        let work = create_category(&mut data, start(), user_id, "Work", None).unwrap();
        let due = NaiveDate::from_ymd_opt(2026, 2, 1);
        let task = create_task(
            &mut data,
            start(),
            user_id,
            "report",
            Some("draft".into()),
            Some(work.id),
            due,
        )
        .unwrap();

        let updated = update_task(
            &mut data,
            user_id,
            task.id,
            UpdateTaskRequest {
                title: Some("final report".into()),
                category_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.title, "final report");
        assert_eq!(updated.description.as_deref(), Some("draft"));
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.due_date, due);
        assert!(!updated.is_complete);

        let toggled = toggle_task_completion(&mut data, user_id, task.id, true).unwrap();
        assert!(toggled.is_complete);
    }

    #[test]
    fn foreign_category_cannot_be_assigned() {
        let (mut data, user_id) = with_user();
        let other = create_user(&mut data, start(), "bob@example.com", None, None).unwrap();
        let theirs = create_category(&mut data, start(), other.id, "Secret", None).unwrap();

        let err = create_task(&mut data, start(), user_id, "x", None, Some(theirs.id), None)
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn users_cannot_touch_each_others_records() {
        let (mut data, user_id) = with_user();
        let other = create_user(&mut data, start(), "bob@example.com", None, None).unwrap();
        let task = create_task(&mut data, start(), other.id, "private", None, None, None).unwrap();
        let category = create_category(&mut data, start(), other.id, "Mine", None).unwrap();

        assert!(get_tasks(&data, user_id).unwrap().is_empty());
        assert!(get_categories(&data, user_id).unwrap().is_empty());
        let err = delete_task(&mut data, user_id, task.id).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        let err = update_category(&mut data, user_id, category.id, "Hijacked", "#000000")
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        let err = toggle_task_completion(&mut data, user_id, task.id, true).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let data = AppData::default();
        let err = get_tasks(&data, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn deleting_category_uncategorizes_its_tasks() {
        let (mut data, user_id) = with_user();
        let work = create_category(&mut data, start(), user_id, "Work", None).unwrap();
        let task =
            create_task(&mut data, start(), user_id, "memo", None, Some(work.id), None).unwrap();

        delete_category(&mut data, user_id, work.id).unwrap();
        let tasks = get_tasks(&data, user_id).unwrap();
        assert_eq!(tasks[0].task.id, task.id);
        assert_eq!(tasks[0].task.category_id, None);

        let err = delete_category(&mut data, user_id, work.id).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn stat_rows_feed_the_summary() {
        let (mut data, user_id) = with_user();
        let work = create_category(&mut data, start(), user_id, "Work", Some("#A833FF")).unwrap();
        let done = create_task(&mut data, start(), user_id, "a", None, Some(work.id), None).unwrap();
        create_task(&mut data, start(), user_id, "b", None, Some(work.id), None).unwrap();
        create_task(&mut data, start(), user_id, "c", None, None, None).unwrap();
        toggle_task_completion(&mut data, user_id, done.id, true).unwrap();

        let stats = build_stats(&task_stat_rows(&data, user_id).unwrap());
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.category_counts[&work.id].total, 2);
        assert_eq!(stats.category_counts[&work.id].color, "#A833FF");
    }
}
