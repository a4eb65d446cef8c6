//! The SQL safety gateway pipeline.
//!
//! Stages run strictly left to right, each consuming the previous stage's
//! output: raw text → tokens → classified statement → keyword/table
//! validation → rewritten + paginated SQL → executed rows. Everything before
//! the executor is a pure function of the statement text plus the immutable
//! configuration, so invocations are independent, freely concurrent, and
//! safely abandonable mid-pipeline.

crate::reexport!(allow_list);
crate::reexport!(classify);
crate::reexport!(execute);
crate::reexport!(guard);
crate::reexport!(paginate);
crate::reexport!(resolve);
crate::reexport!(rewrite);
crate::reexport!(statement);

use crate::*;
use moka::sync::Cache;
use sqlx::PgPool;

/// Bound on the validated-statement memo. Validation is cheap; the cache
/// only spares re-analysis of the exact same generated text.
const VALIDATED_CACHE_CAPACITY: u64 = 1024;

/// Validates untrusted SQL and executes the safe, bounded form.
///
/// Construction takes the immutable [`GatewayConfig`] and a caller-owned
/// connection pool; the gateway itself holds no other state besides a
/// bounded memo of validated statements, so one instance serves any number
/// of concurrent callers.
pub struct SqlGateway {
    config: GatewayConfig,
    executor: Executor,
    validated: Cache<String, ValidatedStatement>,
}

impl SqlGateway {
    pub fn new(config: GatewayConfig, pool: PgPool) -> Self {
        debug!(
            "gateway ready; default schema `{}`, allow-list: {}",
            config.default_schema, config.allow_list
        );
        Self {
            config,
            executor: Executor::new(pool),
            validated: Cache::new(VALIDATED_CACHE_CAPACITY),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Validation without execution, for tooling that wants to check a
    /// statement's safety without running it.
    pub fn validate(&self, sql: &str) -> Result<ValidatedStatement> {
        if let Some(hit) = self.validated.get(sql) {
            trace!("validation cache hit");
            return Ok(hit);
        }
        let statement = validate_sql(&self.config, sql)?;
        self.validated.insert(sql.to_string(), statement.clone());
        Ok(statement)
    }

    /// The full pipeline: validate, schema-qualify, paginate, execute.
    ///
    /// Failures come back as values carrying the statement actually
    /// attempted; nothing is thrown across this boundary.
    pub async fn validate_and_run(
        &self,
        sql: &str,
        page: i64,
        page_size: i64,
        params: &[Bind],
    ) -> std::result::Result<RowSet, Failure> {
        let statement = match self.validate(sql) {
            Ok(statement) => statement,
            Err(error) => {
                warn!("rejected query: {error}");
                return Err(Failure {
                    error,
                    sql: sql.to_string(),
                });
            }
        };
        let spec = match PaginationSpec::new(page, page_size, self.config.max_page_size) {
            Ok(spec) => spec,
            Err(error) => {
                return Err(Failure {
                    error,
                    sql: sql.to_string(),
                });
            }
        };

        let qualified = qualify(&statement, &self.config.default_schema);
        let bounded = match paginate(&qualified, spec) {
            Ok(bounded) => bounded,
            Err(error) => return Err(Failure { error, sql: qualified }),
        };

        debug!("executing: {bounded}");
        match self.executor.fetch(&bounded, params).await {
            Ok(rows) => Ok(RowSet {
                row_count: rows.len(),
                rows,
                page: spec.page(),
                page_size: spec.page_size(),
            }),
            Err(error) => {
                error!("execution failed: {error}");
                Err(Failure {
                    error,
                    sql: bounded,
                })
            }
        }
    }
}

/// Run tokenize → classify → keyword guard → relation resolution over one
/// statement. This is the pure validation entry point; it never touches the
/// database.
pub fn validate_sql(config: &GatewayConfig, sql: &str) -> Result<ValidatedStatement> {
    let tokens = tokenize(sql)?;
    let classified = classify(&tokens)?;
    scan_keywords(&tokens, &config.forbidden_keywords)?;
    let relations = resolve(&tokens, config)?;
    trace!(
        "validated {} statement with {} relation(s)",
        classified.kind,
        relations.len()
    );
    Ok(ValidatedStatement::new(
        sql.to_string(),
        classified.kind,
        relations,
        classified.limit,
    ))
}
