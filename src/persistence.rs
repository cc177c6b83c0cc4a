pub mod db_todo_driven_ports;

use crate::external_connections;
use crate::external_connections::ConnectionHandle;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};

/// Data structure which owns clients for connecting to external systems.
/// Allows business logic to be agnostic of the external systems it communicates with
/// so driven adapters can easily be swapped out for other implementations
#[derive(Clone)]
pub struct ExternalConnectivity {
    db: PgPool,
}

impl ExternalConnectivity {
    /// Wraps an already-connected pool. Clones share the same pool.
    pub fn new(db: PgPool) -> Self {
        ExternalConnectivity { db }
    }

    /// Waits for checked-out connections to be returned, then closes the pool. Any clone
    /// trying to acquire a connection afterwards gets an error.
    pub async fn close(&self) {
        self.db.close().await
    }
}

/// A handle from ExternalConnectivity which holds a pooled connection until dropped
pub struct PoolConnectionHandle {
    active_connection: PoolConnection<Postgres>,
}

impl ConnectionHandle for PoolConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection {
        &mut self.active_connection
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    type DbHandle<'cxn>
        = PoolConnectionHandle
    where
        Self: 'cxn;

    async fn database_cxn(&mut self) -> Result<PoolConnectionHandle, anyhow::Error> {
        let handle = PoolConnectionHandle {
            active_connection: self.db.acquire().await?,
        };

        Ok(handle)
    }
}
