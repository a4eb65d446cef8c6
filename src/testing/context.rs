use crate::testing::*;
use crate::*;
use sqlx::{PgPool, Postgres};
use test_context::AsyncTestContext;
pub use test_context::test_context;

pub struct IsolatedIntegrationTest {
    pub pool: PgPool,
    pub database: String,
    pub is_teardown: bool,
}

impl IsolatedIntegrationTest {
    async fn random_database<'c, E: sqlx::Executor<'c, Database = Postgres>>(exec: E) -> String {
        use rand::Rng;
        let db = format!(
            "test_db_{}",
            rand::rng()
                .sample_iter(&rand::distr::Alphanumeric)
                .take(8)
                .map(char::from)
                .collect::<String>()
                .to_lowercase()
        );

        sqlx::query(sqlx::AssertSqlSafe(format!("CREATE DATABASE {db}")))
            .execute(exec)
            .await
            .expect("Failed to create test database");
        db
    }

    /// Create the review schema the gateway's default allow-list points at
    /// and seed a few pull requests, newest last.
    pub async fn seed_review_schema(&self) -> Result {
        sqlx::query("CREATE SCHEMA insightly")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE TABLE insightly.pull_request (
                 id INT PRIMARY KEY,
                 title TEXT NOT NULL,
                 state TEXT,
                 repoid INT,
                 authorid INT,
                 createdon TIMESTAMPTZ NOT NULL,
                 linesadded INT NOT NULL DEFAULT 0,
                 linesremoved INT NOT NULL DEFAULT 0
             )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE insightly.pr_diff (
                 id INT PRIMARY KEY,
                 pull_request_id INT NOT NULL,
                 filename TEXT NOT NULL,
                 file_status TEXT,
                 additions INT NOT NULL DEFAULT 0,
                 deletions INT NOT NULL DEFAULT 0
             )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "INSERT INTO insightly.pull_request
                 (id, title, state, repoid, authorid, createdon)
             VALUES
                 (1, 'Fix pagination edge case', 'merged', 1, 10, now() - interval '3 days'),
                 (2, 'Improve caching in Redis', 'open', 1, 11, now() - interval '2 days'),
                 (3, 'Handle quoted identifiers', 'open', 2, 10, now() - interval '1 day')",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "INSERT INTO insightly.pr_diff
                 (id, pull_request_id, filename, file_status, additions, deletions)
             VALUES
                 (1, 1, 'src/paginate.rs', 'modified', 40, 12),
                 (2, 2, 'src/cache.rs', 'added', 120, 0)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl AsyncTestContext for IsolatedIntegrationTest {
    async fn setup() -> Self {
        crate::testing::common_init();
        let postgres_pool = pool("postgres").await;
        let database = Self::random_database(&postgres_pool).await;

        Self {
            pool: pool(&database).await,
            database,
            is_teardown: true,
        }
    }

    async fn teardown(self) {
        if !self.is_teardown {
            return;
        }

        self.pool.close().await;

        let pool = pool("postgres").await;
        sqlx::query(sqlx::AssertSqlSafe(format!(
            "DROP DATABASE {}",
            self.database
        )))
        .execute(&pool)
        .await
        .expect("Failed to drop test database");
    }
}
