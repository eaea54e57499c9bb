use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{List, ListUpdate, NewList},
    store::Store,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Retrieves every list owned by the authenticated user, oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `List` objects.
/// - `401 Unauthorized`: Missing or invalid access token.
#[get("")]
pub async fn get_lists(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let lists = store.lists_for_user(user.0).await?;
    Ok(HttpResponse::Ok().json(lists))
}

/// Creates a new list owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters, trimmed before storing.
///
/// ## Responses:
/// - `200 OK`: The created `List`.
/// - `422 Unprocessable Entity`: `title` is blank or too long.
#[post("")]
pub async fn create_list(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    list_data: web::Json<NewList>,
) -> Result<impl Responder, AppError> {
    list_data.validate()?;

    let list = store
        .insert_list(&List::new(list_data.into_inner(), user.0))
        .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Updates a list owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: `{"message": "updated successfully"}`.
/// - `404 Not Found`: The list does not exist or belongs to someone else.
#[patch("/{id}")]
pub async fn update_list(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    list_id: web::Path<Uuid>,
    list_data: web::Json<ListUpdate>,
) -> Result<impl Responder, AppError> {
    list_data.validate()?;
    let update = list_data.into_inner().normalized();

    store
        .update_list(list_id.into_inner(), user.0, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "updated successfully" })))
}

/// Deletes a list owned by the authenticated user along with all its tasks.
///
/// ## Responses:
/// - `200 OK`: The removed `List`.
/// - `404 Not Found`: The list does not exist or belongs to someone else.
#[delete("/{id}")]
pub async fn delete_list(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    list_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let (list, removed_tasks) = store
        .delete_list(list_id.into_inner(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".into()))?;

    log::info!("Tasks from {} were deleted ({})", list.id, removed_tasks);
    Ok(HttpResponse::Ok().json(list))
}
