#![cfg(test)]
crate::reexport!(container);
crate::reexport!(context);
pub use rstest::*;

pub(in crate::testing) fn common_init() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Only initialize once for all tests
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env()) // <- reads RUST_LOG
            .with_test_writer() // ensures it integrates with `cargo test` output
            .init();
    });
}

mod isolated_integration_tests {
    use super::{super::*, *};

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn can_connect(ctx: &mut IsolatedIntegrationTest) -> Result {
        sqlx::query("SELECT 1;").fetch_one(&ctx.pool).await?;
        Ok(())
    }

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn can_read(ctx: &mut IsolatedIntegrationTest) -> Result {
        let database: String = sqlx::query_scalar("SELECT current_database();")
            .fetch_one(&ctx.pool)
            .await?;
        assert_eq!(ctx.database, database);
        Ok(())
    }

    #[test_context(IsolatedIntegrationTest)]
    #[tokio::test]
    async fn seeds_the_review_schema(ctx: &mut IsolatedIntegrationTest) -> Result {
        ctx.seed_review_schema().await?;

        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM insightly.pull_request")
            .fetch_one(&ctx.pool)
            .await?;
        assert_eq!(count, 3);

        let newest: String = sqlx::query_scalar(
            "SELECT title FROM insightly.pull_request ORDER BY createdon DESC LIMIT 1",
        )
        .fetch_one(&ctx.pool)
        .await?;
        assert_eq!(newest, "Handle quoted identifiers");
        Ok(())
    }
}
