use crate::domain;
use crate::domain::todo::{NewTodo, Todo};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query, query_as};

pub struct DbTodoReader;

#[derive(FromRow)]
struct TodoRow {
    id: i32,
    title: String,
    status: bool,
}

impl From<TodoRow> for domain::todo::Todo {
    fn from(value: TodoRow) -> Self {
        Todo {
            id: value.id,
            title: value.title,
            status: value.status,
        }
    }
}

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn all_todos(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos: Vec<Todo> =
            query_as::<_, TodoRow>("SELECT id, title, status FROM todo ORDER BY id")
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

        let todo = query_as::<_, TodoRow>("SELECT id, title, status FROM todo WHERE id = $1")
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
    ) -> Result<Todo, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let created = query_as::<_, TodoRow>(
            "INSERT INTO todo(title, status) VALUES ($1, $2) RETURNING id, title, status",
        )
        .bind(&new_todo.title)
        .bind(new_todo.status)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(created.into())
    }

    async fn set_status(
        &self,
        todo_id: i32,
        status: bool,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        query("UPDATE todo SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(todo_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to update a todo's status in the database")?;

        Ok(())
    }

    async fn delete_todo(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        query("DELETE FROM todo WHERE id = $1")
            .bind(todo_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        Ok(())
    }
}
