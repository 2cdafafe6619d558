//! Test harness with testcontainers for PostgreSQL integration testing.
//!
//! The container is started once on first use and shared by every test in the
//! binary. Migrations run once; each test gets its own pool.

use anyhow::{Context, Result};
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use walk_in_core::kernel::PostgresDocumentStore;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --ignored --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        // Migrations run once here; later connects re-run them as no-ops
        PostgresDocumentStore::connect(&db_url, 5).await?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test PostgreSQL document store backed by the shared container.
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(PostgresHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &PostgresHarness) {
///     let store = ctx.store.clone();
/// }
/// ```
pub struct PostgresHarness {
    pub store: PostgresDocumentStore,
}

impl AsyncTestContext for PostgresHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }
}

impl PostgresHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;
        let store = PostgresDocumentStore::connect(&infra.db_url, 5)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { store })
    }
}

/// Collection name no other test uses, so tests sharing the database stay independent
pub fn unique_collection(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}
