use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoPort;
use crate::external_connections::ExternalConnectivity;
use crate::persistence::db_todo_driven_ports::{DbTodoReader, DbTodoWriter};
use crate::routing_utils::{ErrorPayload, Json};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(create_todo, list_todos, get_todo, toggle_todo_status, delete_todo))]
/// Defines the OpenAPI documentation for the todo API
pub struct TodoApi;
/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

const STATUS_UPDATED_MESSAGE: &str = "status updated successfully";
const DELETED_MESSAGE: &str = "deleted successfully";

/// The ":id" path segment, kept as a result so a failed extraction can still be answered
/// with the usual error body
type TodoIdPath = Result<Path<String>, PathRejection>;

/// Adds the routes under "/v1/todo" to the application router
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/v1/todo",
            post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = DbTodoWriter {};

                    create_todo(new_todo, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            )
            .get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};
                let todo_reader = DbTodoReader {};

                list_todos(&mut ext_cxn, &todo_service, &todo_reader).await
            }),
        )
        .route(
            "/v1/todo/:id",
            get(|State(app_state): AppState, todo_id: TodoIdPath| async move {
                let raw_id = match received_id(todo_id) {
                    Ok(raw_id) => raw_id,
                    Err(err) => return err.into_response(),
                };
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};
                let todo_reader = DbTodoReader {};

                get_todo(&raw_id, &mut ext_cxn, &todo_service, &todo_reader)
                    .await
                    .into_response()
            })
            .put(|State(app_state): AppState, todo_id: TodoIdPath| async move {
                let raw_id = match received_id(todo_id) {
                    Ok(raw_id) => raw_id,
                    Err(err) => return err.into_response(),
                };
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};
                let todo_reader = DbTodoReader {};
                let todo_writer = DbTodoWriter {};

                toggle_todo_status(
                    &raw_id,
                    &mut ext_cxn,
                    &todo_service,
                    &todo_reader,
                    &todo_writer,
                )
                .await
                .into_response()
            })
            .delete(|State(app_state): AppState, todo_id: TodoIdPath| async move {
                let raw_id = match received_id(todo_id) {
                    Ok(raw_id) => raw_id,
                    Err(err) => return err.into_response(),
                };
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};
                let todo_writer = DbTodoWriter {};

                delete_todo(&raw_id, &mut ext_cxn, &todo_service, &todo_writer)
                    .await
                    .into_response()
            }),
        )
}

fn received_id(todo_id: TodoIdPath) -> Result<String, ErrorPayload> {
    todo_id.map(|Path(raw_id)| raw_id).map_err(ErrorPayload::from)
}

/// IDs arrive as raw path text. Anything that isn't an integer can't match a stored todo.
fn parse_todo_id(raw_id: &str) -> Result<i32, ErrorPayload> {
    raw_id
        .parse::<i32>()
        .map_err(|_| ErrorPayload::new(format!("{raw_id:?} is not a valid todo ID")))
}

#[utoipa::path(
    post,
    path = "/v1/todo",
    tag = TODO_API_GROUP,
    request_body = dto::NewTodo,
    responses(
        (status = 200, description = "The stored todo with its new ID, or an ErrorMessage if it couldn't be saved", body = dto::TodoItem),
    ),
)]
/// Stores a new todo
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<Json<dto::TodoItem>, ErrorPayload> {
    let domain_todo = domain::todo::NewTodo::from(new_todo);
    info!("Creating todo {domain_todo}");

    let created = todo_service
        .create_todo(&domain_todo, &mut *ext_cxn, todo_write)
        .await?;
    Ok(Json(dto::TodoItem::from(created)))
}

#[utoipa::path(
    get,
    path = "/v1/todo",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "Every todo in ID order, or an ErrorMessage if they couldn't be read", body = Vec<dto::TodoItem>),
    ),
)]
/// Retrieves every todo
async fn list_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_read: &impl TodoReader,
) -> Result<Json<Vec<dto::TodoItem>>, ErrorPayload> {
    info!("Listing todos");
    let todos = todo_service.all_todos(&mut *ext_cxn, todo_read).await?;

    Ok(Json(todos.into_iter().map(dto::TodoItem::from).collect()))
}

#[utoipa::path(
    get,
    path = "/v1/todo/{id}",
    tag = TODO_API_GROUP,
    params(("id" = String, Path, description = "ID of the todo")),
    responses(
        (status = 200, description = "The requested todo, or an ErrorMessage if it doesn't exist", body = dto::TodoItem),
    ),
)]
/// Retrieves a single todo
async fn get_todo(
    raw_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_read: &impl TodoReader,
) -> Result<Json<dto::TodoItem>, ErrorPayload> {
    info!("Get todo {raw_id}");
    let todo_id = parse_todo_id(raw_id)?;

    let todo = todo_service
        .todo_by_id(todo_id, &mut *ext_cxn, todo_read)
        .await?;
    Ok(Json(dto::TodoItem::from(todo)))
}

#[utoipa::path(
    put,
    path = "/v1/todo/{id}",
    tag = TODO_API_GROUP,
    params(("id" = String, Path, description = "ID of the todo")),
    responses(
        (status = 200, description = "Confirmation keyed by the ID, or an ErrorMessage if the todo doesn't exist", body = dto::TodoStatusMessage),
    ),
)]
/// Flips a todo between done and not done
async fn toggle_todo_status(
    raw_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_read: &impl TodoReader,
    todo_write: &impl TodoWriter,
) -> Result<Json<dto::TodoStatusMessage>, ErrorPayload> {
    info!("Toggling status of todo {raw_id}");
    let todo_id = parse_todo_id(raw_id)?;

    todo_service
        .toggle_status(todo_id, &mut *ext_cxn, todo_read, todo_write)
        .await?;
    Ok(Json(dto::TodoStatusMessage::new(raw_id, STATUS_UPDATED_MESSAGE)))
}

#[utoipa::path(
    delete,
    path = "/v1/todo/{id}",
    tag = TODO_API_GROUP,
    params(("id" = String, Path, description = "ID of the todo")),
    responses(
        (status = 200, description = "Confirmation keyed by the ID (sent even if nothing was deleted), or an ErrorMessage", body = dto::TodoStatusMessage),
    ),
)]
/// Deletes a todo without checking whether it existed first. An ID that isn't an integer can't
/// match any row, so it gets the same confirmation without a trip to storage.
async fn delete_todo(
    raw_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<Json<dto::TodoStatusMessage>, ErrorPayload> {
    info!("Deleting todo {raw_id}");
    if let Ok(todo_id) = parse_todo_id(raw_id) {
        todo_service
            .delete_todo(todo_id, &mut *ext_cxn, todo_write)
            .await?;
    }
    Ok(Json(dto::TodoStatusMessage::new(raw_id, DELETED_MESSAGE)))
}
