use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;
use crate::domain;

/// DTO for a returned todo on the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct Todo {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = "2% milk")]
    pub description: String,
    #[schema(example = 3)]
    pub priority: i32,
    #[schema(example = false)]
    pub complete: bool,
}

impl From<domain::todo::Todo> for Todo {
    fn from(value: domain::todo::Todo) -> Self {
        Todo {
            id: value.id,
            title: value.title,
            description: value.description,
            priority: value.priority,
            complete: value.complete,
        }
    }
}

/// DTO for creating a new todo via the API
#[derive(Deserialize, Display, Validate, ToSchema)]
#[display("\"{title}\" (priority {priority})")]
#[cfg_attr(test, derive(Serialize))]
pub struct NewTodo {
    #[validate(length(min = 3))]
    #[schema(example = "Buy milk", min_length = 3)]
    pub title: String,
    #[validate(length(min = 3, max = 100))]
    #[schema(example = "2% milk", min_length = 3, max_length = 100)]
    pub description: String,
    #[validate(range(min = 1, max = 5))]
    #[schema(example = 3, minimum = 1, maximum = 5)]
    pub priority: i32,
    #[schema(example = false)]
    pub complete: bool,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            title: value.title,
            description: value.description,
            priority: value.priority,
            complete: value.complete,
        }
    }
}

/// DTO for replacing a todo's content via the API
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[cfg_attr(test, derive(Serialize, Clone))]
pub struct UpdateTodo {
    #[validate(length(min = 3))]
    #[schema(example = "Buy milk", min_length = 3)]
    pub title: String,
    #[validate(length(min = 3, max = 100))]
    #[schema(example = "2% milk", min_length = 3, max_length = 100)]
    pub description: String,
    #[validate(range(min = 1, max = 5))]
    #[schema(example = 3, minimum = 1, maximum = 5)]
    pub priority: i32,
    #[schema(example = true)]
    pub complete: bool,
}

impl From<UpdateTodo> for domain::todo::UpdateTodo {
    fn from(value: UpdateTodo) -> Self {
        domain::todo::UpdateTodo {
            title: value.title,
            description: value.description,
            priority: value.priority,
            complete: value.complete,
        }
    }
}

/// Path parameters for routes addressing a single todo
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct TodoIdPath {
    /// ID of the todo, must be positive
    #[validate(range(min = 1))]
    #[param(minimum = 1)]
    pub todo_id: i32,
}
