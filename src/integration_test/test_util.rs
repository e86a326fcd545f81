use crate::app_env::test::TEST_DB_URL;
use crate::{SharedData, db, persistence, routes};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use serde::Serialize;
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use std::panic;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tower::ServiceExt;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A freshly created database which is dropped again once the test finishes
struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let db_id: u32 = thread_rng().gen_range(10_000..99_999);
        let db_name = format!("test_db_{}", db_id);

        let mut conn = PgConnection::connect(base_url).await?;
        sqlx::query(format!("CREATE DATABASE {}", db_name).as_str())
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        Ok(Self {
            base_url: base_url.to_owned(),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }

    async fn drop_db(self) {
        let conn = PgConnection::connect(&self.base_url).await;
        let mut conn = match conn {
            Ok(cxn) => cxn,
            Err(conn_err) => {
                println!(
                    "Failed to reconnect to drop test database {}, please remove it manually. Error: {}",
                    self.db_name, conn_err
                );
                return;
            }
        };

        let drop_result = sqlx::query(format!("DROP DATABASE {} WITH (FORCE)", self.db_name).as_str())
            .execute(&mut conn)
            .await;
        if let Err(db_err) = drop_result {
            println!(
                "Failed to drop test database {}, please remove it manually. Error: {}",
                self.db_name, db_err
            );
        }
    }
}

/// Creates a throwaway database with all migrations applied and hands the test a fully
/// wired application router backed by it. The database is dropped afterwards even if the
/// test panics.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_app_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()> + Send + 'static,
    F: FnOnce(Router) -> R,
{
    prepare_db_and_test(|pool| {
        test_fn(routes::build_router(Arc::new(SharedData {
            ext_cxn: persistence::ExternalConnectivity::new(pool),
        })))
    });
}

/// Like [prepare_app_and_test], but hands the test the migrated database's pool directly
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()> + Send + 'static,
    F: FnOnce(PgPool) -> R,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let test_db = TestDatabase::create(&test_db_base_url())
            .await
            .unwrap_or_else(|db_err| panic!("Failed to create test database: {}", db_err));

        let pool = db::connect_sqlx(&test_db.url())
            .await
            .expect("Could not connect to the test database");
        db::run_migrations(&pool)
            .await
            .expect("Could not migrate the test database");

        let test = test_fn(pool.clone());
        run_then_drop_db(test_db, pool, test).await;
    });
}

fn test_db_base_url() -> String {
    env::var(TEST_DB_URL).unwrap_or_else(|_| {
        panic!("You must provide the {TEST_DB_URL} environment variable as the base postgres connection string")
    })
}

/// Runs the test on its own task so a failed assertion surfaces as a [tokio::task::JoinError]
/// instead of unwinding past the cleanup. The panic is re-raised once the database is gone.
async fn run_then_drop_db<R>(test_db: TestDatabase, pool: PgPool, test: R)
where
    R: Future<Output = ()> + Send + 'static,
{
    let outcome = tokio::spawn(test).await;

    pool.close().await;
    test_db.drop_db().await;

    if let Err(join_err) = outcome {
        match join_err.try_into_panic() {
            Ok(panic_payload) => panic::resume_unwind(panic_payload),
            Err(join_err) => panic!("Test task did not finish: {join_err}"),
        }
    }
}

/// Sends one request through the router with an optional JSON body
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    json_body: Option<&impl Serialize>,
) -> Response {
    let request = Request::builder().method(method).uri(uri);
    let request = match json_body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(body).expect("Could not serialize request body"),
            )),
        None => request.body(Body::empty()),
    }
    .expect("Could not build request");

    router
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed to respond")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    async fn database_exists(base_url: &str, db_name: &str) -> bool {
        let mut conn = PgConnection::connect(base_url)
            .await
            .expect("Could not connect to the test server");
        let row = sqlx::query("SELECT count(*) FROM pg_catalog.pg_database WHERE datname = $1")
            .bind(db_name)
            .fetch_one(&mut conn)
            .await
            .expect("Could not look up the database");

        row.get::<i64, _>(0) > 0
    }

    #[test]
    #[cfg_attr(not(feature = "integration_test"), ignore)]
    fn failing_test_still_drops_its_database() {
        let _ = dotenv();
        let base_url = test_db_base_url();

        TOKIO_RT.block_on(async move {
            let test_db = TestDatabase::create(&base_url)
                .await
                .expect("Failed to create test database");
            let db_name = test_db.db_name.clone();
            let pool = db::connect_sqlx(&test_db.url())
                .await
                .expect("Could not connect to the test database");
            assert!(database_exists(&base_url, &db_name).await);

            let failing_run = tokio::spawn(run_then_drop_db(test_db, pool, async {
                panic!("assertion inside the test body failed");
            }))
            .await;

            assert!(failing_run.is_err_and(|join_err| join_err.is_panic()));
            assert!(!database_exists(&base_url, &db_name).await);
        });
    }
}
