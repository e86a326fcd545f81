use crate::domain::DrivenPortError;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoError;
use crate::external_connections::ExternalConnectivity;
use validator::Validate;

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
}

#[derive(Validate)]
#[cfg_attr(test, derive(Clone, Debug, PartialEq, Eq))]
pub struct NewTodo {
    #[validate(length(min = 3))]
    pub title: String,
    #[validate(length(min = 3, max = 100))]
    pub description: String,
    #[validate(range(min = 1, max = 5))]
    pub priority: i32,
    pub complete: bool,
}

/// Replacement content for an existing todo. Every field is overwritten.
#[derive(Validate)]
#[cfg_attr(test, derive(Clone, Debug, PartialEq, Eq))]
pub struct UpdateTodo {
    #[validate(length(min = 3))]
    pub title: String,
    #[validate(length(min = 3, max = 100))]
    pub description: String,
    #[validate(range(min = 1, max = 5))]
    pub priority: i32,
    pub complete: bool,
}

pub mod driven_ports {
    use super::*;

    pub trait TodoReader {
        async fn all_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Todo>, anyhow::Error>;
        async fn todo_by_id(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;
    }

    pub trait TodoWriter {
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, anyhow::Error>;

        /// Fails with [DrivenPortError::DoesNotExist] if no todo has the given ID
        async fn update_todo(
            &self,
            todo_id: i32,
            update: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;

        /// Fails with [DrivenPortError::DoesNotExist] if no todo has the given ID
        async fn delete_todo(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;
    use validator::ValidationErrors;

    #[derive(Debug, Error)]
    pub enum TodoError {
        #[error("The specified todo did not exist.")]
        NotFound,
        #[error("todo data was invalid: {0}")]
        Invalid(ValidationErrors),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    impl From<ValidationErrors> for TodoError {
        fn from(value: ValidationErrors) -> Self {
            Self::Invalid(value)
        }
    }

    impl From<DrivenPortError> for TodoError {
        fn from(value: DrivenPortError) -> Self {
            match value {
                DrivenPortError::DoesNotExist => TodoError::NotFound,
                DrivenPortError::CommsFailure(err) => TodoError::PortError(err),
            }
        }
    }


    pub trait TodoPort {
        async fn all_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<Todo>, TodoError>;
        async fn todo_by_id(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Todo, TodoError>;
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<i32, TodoError>;
        async fn update_todo(
            &self,
            todo_id: i32,
            update: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<(), TodoError>;
        async fn delete_todo(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<(), TodoError>;
    }
}

pub struct TodoService {}

impl driving_ports::TodoPort for TodoService {
    async fn all_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<Todo>, TodoError> {
        let todos = todo_read.all_todos(&mut *ext_cxn).await?;

        Ok(todos)
    }

    async fn todo_by_id(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Todo, TodoError> {
        todo_read
            .todo_by_id(todo_id, &mut *ext_cxn)
            .await?
            .ok_or(TodoError::NotFound)
    }

    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<i32, TodoError> {
        new_todo.validate()?;
        let created_id = todo_write.create_todo(new_todo, &mut *ext_cxn).await?;

        Ok(created_id)
    }

    async fn update_todo(
        &self,
        todo_id: i32,
        update: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<(), TodoError> {
        update.validate()?;
        todo_write.update_todo(todo_id, update, &mut *ext_cxn).await?;

        Ok(())
    }

    async fn delete_todo(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<(), TodoError> {
        todo_write.delete_todo(todo_id, &mut *ext_cxn).await?;

        Ok(())
    }
}
