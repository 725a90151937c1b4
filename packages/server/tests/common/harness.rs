//! Test harness with testcontainers for integration testing.
//!
//! Uses a shared Postgres container across all tests for dramatically
//! improved performance. The container and migrations are initialized once
//! on first test, then reused; isolation comes from every test working with
//! freshly generated party and deal ids.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use server_core::kernel::{test_deps, RecordingNotifier, ServerDeps};

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    /// Initialize shared infrastructure (container + migrations).
    async fn init() -> Result<Self> {
        // Initialize tracing subscriber to respect RUST_LOG environment variable.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        pool.close().await;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }
}

/// Per-test harness: a pool on the shared database plus deps wired to a
/// recording notifier.
pub struct TestHarness {
    pub db_pool: PgPool,
    pub deps: ServerDeps,
    pub notifier: Arc<RecordingNotifier>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        let infra = SHARED_INFRA
            .get_or_try_init(SharedTestInfra::init)
            .await
            .expect("Failed to initialize shared test infrastructure");

        let db_pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&infra.db_url)
            .await
            .expect("Failed to connect to test database");

        let (deps, notifier) = test_deps(db_pool.clone());

        Self {
            db_pool,
            deps,
            notifier,
        }
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}
