use futures::FutureExt;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use todolist_rest::config::DbSettings;
use todolist_rest::{app_env, db};
use tokio::runtime::Runtime;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A throwaway database created for a single test
struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let schema_id: u32 = thread_rng().gen_range(10_000..99_999);
        let db_name = format!("test_db_{}", schema_id);

        let mut conn = PgConnection::connect(base_url).await?;
        sqlx::query(format!("CREATE DATABASE {}", db_name).as_str())
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        Ok(Self {
            base_url: String::from(base_url),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }

    async fn drop_db(self) {
        let mut conn = match PgConnection::connect(&self.base_url).await {
            Ok(cxn) => cxn,
            Err(conn_err) => {
                println!(
                    "Failed to reconnect to drop test database {}, please remove it manually. Error: {}",
                    self.db_name, conn_err
                );
                return;
            }
        };

        let drop_statement = format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.db_name);
        let drop_result = sqlx::query(&drop_statement).execute(&mut conn).await;
        if let Err(db_err) = drop_result {
            println!(
                "Failed to drop test database {}, please remove it manually. Error: {}",
                self.db_name, db_err
            );
        }
        let _ = conn.close().await;
    }
}

/// Creates a fresh database with the service's migrations applied, hands a pool for it to
/// [test_fn], then drops the database again even if the test panicked.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()>,
    F: FnOnce(PgPool) -> R,
{
    if dotenv::dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let pg_connection_base_url = env::var(app_env::TEST_DB_URL)
            .expect("You must provide the TEST_DB_URL environment variable as the base postgres connection string");
        let test_db = match TestDatabase::create(&pg_connection_base_url).await {
            Ok(tdb) => tdb,
            Err(db_err) => panic!("Failed to start test database: {}", db_err),
        };

        let settings = DbSettings {
            url: test_db.url(),
            max_connections: 5,
            log_queries: false,
        };
        let pool = db::connect_sqlx(&settings)
            .await
            .expect("could not connect to the test database");
        db::run_migrations(&pool)
            .await
            .expect("could not migrate the test database");

        let outcome = AssertUnwindSafe(test_fn(pool.clone())).catch_unwind().await;

        pool.close().await;
        test_db.drop_db().await;
        if let Err(panic_payload) = outcome {
            panic::resume_unwind(panic_payload);
        }
    });
}
