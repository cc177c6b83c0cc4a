use sqlx::PgConnection;

/// Something that can lend out a live PostgreSQL connection for the duration of a query
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Abstraction over the clients the service uses to reach external systems. Driven ports
/// receive one of these instead of reaching for a global handle, so business logic stays
/// agnostic of how (or whether) a real database is attached.
pub trait ExternalConnectivity {
    type DbHandle<'cxn>: ConnectionHandle
    where
        Self: 'cxn;

    /// Acquires a database connection, held until the returned handle is dropped
    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

#[cfg(test)]
pub mod test_util {
    use super::*;
    use anyhow::anyhow;

    /// Stand-in for real connectivity in tests which use in-memory driven ports.
    /// Handing out a connection works, but trying to run a query on it panics.
    pub struct FakeExternalConnectivity {
        pub db_available: bool,
        pub handles_issued: usize,
    }

    impl FakeExternalConnectivity {
        pub fn new() -> Self {
            FakeExternalConnectivity {
                db_available: true,
                handles_issued: 0,
            }
        }
    }

    pub struct FakeDbHandle;

    impl ConnectionHandle for FakeDbHandle {
        fn borrow_connection(&mut self) -> &mut PgConnection {
            panic!("FakeExternalConnectivity cannot run real queries, use an in-memory driven port")
        }
    }

    impl ExternalConnectivity for FakeExternalConnectivity {
        type DbHandle<'cxn>
            = FakeDbHandle
        where
            Self: 'cxn;

        async fn database_cxn(&mut self) -> Result<FakeDbHandle, anyhow::Error> {
            if !self.db_available {
                return Err(anyhow!("database is unavailable"));
            }

            self.handles_issued += 1;
            Ok(FakeDbHandle)
        }
    }

    #[tokio::test]
    async fn tracks_issued_handles() {
        let mut ext_cxn = FakeExternalConnectivity::new();

        assert!(ext_cxn.database_cxn().await.is_ok());
        assert!(ext_cxn.database_cxn().await.is_ok());
        assert_eq!(2, ext_cxn.handles_issued);
    }

    #[tokio::test]
    async fn fails_when_unavailable() {
        let mut ext_cxn = FakeExternalConnectivity::new();
        ext_cxn.db_available = false;

        assert!(ext_cxn.database_cxn().await.is_err());
        assert_eq!(0, ext_cxn.handles_issued);
    }
}
