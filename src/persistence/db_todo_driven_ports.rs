use crate::domain;
use crate::domain::DrivenPortError;
use crate::domain::todo::{NewTodo, Todo, UpdateTodo};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{query, query_as};

pub struct DbTodoReader;

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i32,
    title: String,
    description: String,
    priority: i32,
    complete: bool,
}

impl From<TodoRow> for domain::todo::Todo {
    fn from(value: TodoRow) -> Self {
        Todo {
            id: value.id,
            title: value.title,
            description: value.description,
            priority: value.priority,
            complete: value.complete,
        }
    }
}

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn all_todos(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos: Vec<Todo> = query_as::<_, TodoRow>(
            "SELECT t.id, t.title, t.description, t.priority, t.complete FROM todos t ORDER BY t.id",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all todos")?
        .into_iter()
        .map(domain::todo::Todo::from)
        .collect();

        Ok(todos)
    }

    async fn todo_by_id(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo: Option<Todo> = query_as::<_, TodoRow>(
            "SELECT t.id, t.title, t.description, t.priority, t.complete FROM todos t WHERE t.id = $1",
        )
        .bind(todo_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to fetch a todo by ID")?
        .map(domain::todo::Todo::from);

        Ok(todo)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, super::NewId>(
            "INSERT INTO todos(title, description, priority, complete) VALUES ($1, $2, $3, $4) RETURNING todos.id",
        )
        .bind(&new_todo.title)
        .bind(&new_todo.description)
        .bind(new_todo.priority)
        .bind(new_todo.complete)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(new_id.id)
    }

    async fn update_todo(
        &self,
        todo_id: i32,
        update: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let result = query(
            "UPDATE todos SET title = $1, description = $2, priority = $3, complete = $4 WHERE id = $5",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.priority)
        .bind(update.complete)
        .bind(todo_id)
        .execute(cxn.borrow_connection())
        .await
        .context("trying to update a todo in the database")?;

        if result.rows_affected() == 0 {
            return Err(DrivenPortError::DoesNotExist);
        }

        Ok(())
    }

    async fn delete_todo(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let result = query("DELETE FROM todos WHERE id = $1")
            .bind(todo_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        if result.rows_affected() == 0 {
            return Err(DrivenPortError::DoesNotExist);
        }

        Ok(())
    }
}
