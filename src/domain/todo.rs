use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::{TodoError, TodoPort};
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use derive_more::Display;
use tracing::{debug, info};

/// A single item on the todo list
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub status: bool,
}

/// Content for a todo which hasn't been stored yet. Storage assigns the ID.
#[derive(Debug, Display)]
#[display("\"{title}\" (done: {status})")]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct NewTodo {
    pub title: String,
    pub status: bool,
}

pub mod driven_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

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
        /// Stores a new todo and returns it with its assigned ID
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Todo, anyhow::Error>;

        /// Overwrites the status of a todo. Does nothing if the todo doesn't exist.
        async fn set_status(
            &self,
            todo_id: i32,
            status: bool,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;

        /// Removes a todo. Does nothing if the todo doesn't exist.
        async fn delete_todo(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TodoError {
        #[error("todo with ID {0} does not exist")]
        NotFound(i32),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait TodoPort {
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, anyhow::Error>;
        async fn all_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<Todo>, anyhow::Error>;
        async fn todo_by_id(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Todo, TodoError>;
        /// Flips the done flag on a todo and returns it as it was stored. The read and
        /// the write are separate statements, so concurrent toggles of one todo can race.
        async fn toggle_status(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, TodoError>;
        async fn delete_todo(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<(), anyhow::Error>;
    }
}

pub struct TodoService {}

impl TodoPort for TodoService {
    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, anyhow::Error> {
        let created = todo_write
            .create_todo(new_todo, &mut *ext_cxn)
            .await
            .context("creating a todo")?;

        info!(todo_id = created.id, "Created todo");
        Ok(created)
    }

    async fn all_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<Todo>, anyhow::Error> {
        todo_read
            .all_todos(&mut *ext_cxn)
            .await
            .context("listing todos")
    }

    async fn todo_by_id(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Todo, TodoError> {
        let todo = todo_read
            .todo_by_id(todo_id, &mut *ext_cxn)
            .await
            .context("fetching a todo by ID")?;

        todo.ok_or(TodoError::NotFound(todo_id))
    }

    async fn toggle_status(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, TodoError> {
        let current = self.todo_by_id(todo_id, &mut *ext_cxn, todo_read).await?;
        let new_status = !current.status;
        debug!(todo_id, new_status, "Flipping todo status");

        todo_write
            .set_status(todo_id, new_status, &mut *ext_cxn)
            .await
            .context("updating a todo's status")?;

        Ok(Todo {
            status: new_status,
            ..current
        })
    }

    async fn delete_todo(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<(), anyhow::Error> {
        todo_write
            .delete_todo(todo_id, &mut *ext_cxn)
            .await
            .context("deleting a todo")?;
        Ok(())
    }
}
