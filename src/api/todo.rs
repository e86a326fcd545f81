use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoPort;
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{Json, Path, TodoErrorResponse, ValidationErrorResponse};
use crate::{AppState, SharedData, domain, dto, persistence, routing_utils};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(
    paths(get_todos, get_todo, create_todo, update_todo, delete_todo),
    components(schemas(dto::Todo, dto::NewTodo, dto::UpdateTodo))
)]
/// Defines the OpenAPI documentation for the todo API
pub struct TodoApi;
/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Builds a router for all the todo routes
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService {};
                let todo_reader = persistence::db_todo_driven_ports::DbTodoReader {};

                get_todos(&mut ext_cxn, &todo_service, &todo_reader).await
            }),
        )
        .route(
            "/todo",
            post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter {};

                    create_todo(new_todo, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
        .route(
            "/todo/:todo_id",
            get(
                |State(app_state): AppState, Path(path): Path<dto::TodoIdPath>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader {};

                    get_todo(path, &mut ext_cxn, &todo_service, &todo_reader).await
                },
            )
            .put(
                |State(app_state): AppState,
                 Path(path): Path<dto::TodoIdPath>,
                 Json(update): Json<dto::UpdateTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter {};

                    update_todo(path, update, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(path): Path<dto::TodoIdPath>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService {};
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter {};

                    delete_todo(path, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
}

#[utoipa::path(
    get,
    path = "/",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "Every stored todo", body = [dto::Todo]),
        (status = 500, description = "The database could not be reached", body = routing_utils::BasicErrorResponse),
    ),
)]
/// Retrieves every todo in the system.
async fn get_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_read: &impl TodoReader,
) -> Result<Json<Vec<dto::Todo>>, ErrorResponse> {
    info!("Requested todos");
    let todos = todo_service
        .all_todos(&mut *ext_cxn, todo_read)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(todos.into_iter().map(dto::Todo::from).collect()))
}

#[utoipa::path(
    get,
    path = "/todo/{todo_id}",
    tag = TODO_API_GROUP,
    params(dto::TodoIdPath),
    responses(
        (status = 200, description = "The requested todo", body = dto::Todo),
        (status = 404, description = "No todo has that ID", body = routing_utils::BasicErrorResponse),
        (status = 422, description = "The todo ID was not positive", body = routing_utils::BasicErrorResponse),
    ),
)]
/// Retrieves a single todo
#[tracing::instrument(skip_all, fields(todo_id = path.todo_id))]
async fn get_todo(
    path: dto::TodoIdPath,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_read: &impl TodoReader,
) -> Result<Json<dto::Todo>, ErrorResponse> {
    info!("Get todo {}", path.todo_id);
    path.validate().map_err(ValidationErrorResponse::from)?;

    let todo = todo_service
        .todo_by_id(path.todo_id, &mut *ext_cxn, todo_read)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(Json(dto::Todo::from(todo)))
}

#[utoipa::path(
    post,
    path = "/todo",
    tag = TODO_API_GROUP,
    request_body = dto::NewTodo,
    responses(
        (status = 201, description = "The todo was created"),
        (status = 400, description = "The body was not valid JSON", body = routing_utils::BasicErrorResponse),
        (status = 422, description = "A todo field was out of bounds", body = routing_utils::BasicErrorResponse),
    ),
)]
/// Creates a todo. The new todo's ID is assigned by the store.
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<StatusCode, ErrorResponse> {
    info!("Attempt to create todo: {}", new_todo);
    new_todo
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let domain_todo = domain::todo::NewTodo::from(new_todo);
    let created_id = todo_service
        .create_todo(&domain_todo, &mut *ext_cxn, todo_write)
        .await
        .map_err(TodoErrorResponse::from)?;
    info!("Created todo {created_id}");

    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    put,
    path = "/todo/{todo_id}",
    tag = TODO_API_GROUP,
    params(dto::TodoIdPath),
    request_body = dto::UpdateTodo,
    responses(
        (status = 204, description = "The todo was overwritten"),
        (status = 404, description = "No todo has that ID", body = routing_utils::BasicErrorResponse),
        (status = 422, description = "The ID or a todo field was out of bounds", body = routing_utils::BasicErrorResponse),
    ),
)]
/// Replaces the content of a todo
#[tracing::instrument(skip_all, fields(todo_id = path.todo_id))]
async fn update_todo(
    path: dto::TodoIdPath,
    update: dto::UpdateTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<StatusCode, ErrorResponse> {
    info!("Updating todo {}", path.todo_id);
    path.validate().map_err(ValidationErrorResponse::from)?;
    update.validate().map_err(ValidationErrorResponse::from)?;

    let domain_update = domain::todo::UpdateTodo::from(update);
    todo_service
        .update_todo(path.todo_id, &domain_update, &mut *ext_cxn, todo_write)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/todo/{todo_id}",
    tag = TODO_API_GROUP,
    params(dto::TodoIdPath),
    responses(
        (status = 204, description = "The todo was deleted"),
        (status = 404, description = "No todo has that ID", body = routing_utils::BasicErrorResponse),
        (status = 422, description = "The todo ID was not positive", body = routing_utils::BasicErrorResponse),
    ),
)]
/// Deletes a todo
#[tracing::instrument(skip_all, fields(todo_id = path.todo_id))]
async fn delete_todo(
    path: dto::TodoIdPath,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_write: &impl TodoWriter,
) -> Result<StatusCode, ErrorResponse> {
    info!("Deleting todo {}", path.todo_id);
    path.validate().map_err(ValidationErrorResponse::from)?;

    todo_service
        .delete_todo(path.todo_id, &mut *ext_cxn, todo_write)
        .await
        .map_err(TodoErrorResponse::from)?;

    Ok(StatusCode::NO_CONTENT)
}
