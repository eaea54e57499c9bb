use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{List, NewTask, Task, TaskUpdate},
    store::Store,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Loads the list only if `user_id` owns it. Every task route goes through
/// here first, so tasks of foreign lists are indistinguishable from missing ones.
async fn owned_list(store: &dyn Store, list_id: Uuid, user_id: Uuid) -> Result<List, AppError> {
    store
        .find_list(list_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Retrieves the tasks of a list owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects, oldest first.
/// - `401 Unauthorized`: Missing or invalid access token.
/// - `404 Not Found`: The list does not exist or is not owned by the caller.
#[get("/{list_id}/tasks")]
pub async fn get_tasks(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    list_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let list = owned_list(store.get_ref(), list_id.into_inner(), user.0).await?;
    let tasks = store.tasks_in_list(list.id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a single task.
///
/// ## Responses:
/// - `200 OK`: The `Task`.
/// - `404 Not Found`: The list or the task does not exist, or the list is not
///   owned by the caller.
#[get("/{list_id}/tasks/{task_id}")]
pub async fn get_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (list_id, task_id) = path.into_inner();
    let list = owned_list(store.get_ref(), list_id, user.0).await?;

    let task = store
        .find_task(task_id, list.id)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Creates a task in a list owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters, trimmed before storing.
///
/// ## Responses:
/// - `200 OK`: The created `Task`, with `completed` set to `false`.
/// - `404 Not Found`: The list does not exist or is not owned by the caller.
/// - `422 Unprocessable Entity`: `title` is blank or too long.
#[post("/{list_id}/tasks")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    list_id: web::Path<Uuid>,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let list = owned_list(store.get_ref(), list_id.into_inner(), user.0).await?;

    let task = store
        .insert_task(&Task::new(task_data.into_inner(), list.id))
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates the title and/or completion flag of a task.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Updated successfully"}`.
/// - `404 Not Found`: The list or the task does not exist, or the list is not
///   owned by the caller.
/// - `422 Unprocessable Entity`: `title` is present but blank or too long.
#[patch("/{list_id}/tasks/{task_id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let (list_id, task_id) = path.into_inner();
    let list = owned_list(store.get_ref(), list_id, user.0).await?;

    let update = task_data.into_inner().normalized();
    store
        .update_task(task_id, list.id, &update)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Updated successfully" })))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: The removed `Task`.
/// - `404 Not Found`: The list or the task does not exist, or the list is not
///   owned by the caller.
#[delete("/{list_id}/tasks/{task_id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (list_id, task_id) = path.into_inner();
    let list = owned_list(store.get_ref(), list_id, user.0).await?;

    let task = store
        .delete_task(task_id, list.id)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(HttpResponse::Ok().json(task))
}

#[cfg(test)]
mod tests {
    use crate::models::{NewTask, TaskUpdate};
    use validator::Validate;

    #[test]
    fn test_task_input_validation() {
        let invalid_input_empty_title = NewTask {
            title: "".to_string(),
        };
        assert!(
            invalid_input_empty_title.validate().is_err(),
            "Validation should fail for empty title."
        );

        let invalid_input_long_title = NewTask {
            title: "a".repeat(201),
        };
        assert!(
            invalid_input_long_title.validate().is_err(),
            "Validation should fail for overly long title."
        );

        let completion_only = TaskUpdate {
            title: None,
            completed: Some(true),
        };
        assert!(
            completion_only.validate().is_ok(),
            "Toggling completion alone should be valid."
        );

        let blank_rename = TaskUpdate {
            title: Some("   ".to_string()),
            completed: None,
        };
        assert!(
            blank_rename.validate().is_err(),
            "Validation should fail for a blank new title."
        );
    }
}
