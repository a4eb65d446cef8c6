use crate::*;
use serde_json::Value;
use sqlx::{AssertSqlSafe, Column as _, PgPool, Row as _, TypeInfo as _, postgres::PgRow};

/// A positional parameter, bound as `$1..$n` in order.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum Bind {
    #[display("NULL")]
    Null,
    #[display("{_0}")]
    Bool(bool),
    #[display("{_0}")]
    Int(i64),
    #[display("{_0}")]
    Float(f64),
    #[display("{_0}")]
    Text(String),
}

/// One result row: `(column name, value)` pairs in declaration order.
pub type ResultRow = Vec<(String, Value)>;

/// Successful execution envelope, echoing the effective window.
#[derive(Debug, Clone)]
pub struct RowSet {
    pub rows: Vec<ResultRow>,
    pub row_count: usize,
    pub page: u64,
    pub page_size: u64,
}

/// A rejected or failed invocation. `sql` is the statement actually
/// attempted at the stage that failed: the caller's text for validation
/// failures, the rewritten/paginated text for execution failures.
#[derive(Debug, thiserror::Error)]
#[error("{error} (sql: {sql})")]
pub struct Failure {
    #[source]
    pub error: Error,
    pub sql: String,
}

/// Thin adapter between the final statement text and the relational backend.
///
/// One pooled connection per call, acquired just before execution; release
/// is by scope, so the success path, every error path, and cancellation all
/// return the connection identically. No retries here: a failed query is
/// reported once and the caller owns any retry policy.
pub struct Executor {
    pool: PgPool,
}

impl Executor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the final statement text and materialize every row.
    pub async fn fetch(&self, sql: &str, params: &[Bind]) -> Result<Vec<ResultRow>> {
        let mut query = sqlx::query(AssertSqlSafe(sql.to_string()));
        for p in params {
            query = match p {
                Bind::Null => query.bind(Option::<String>::None),
                Bind::Bool(b) => query.bind(*b),
                Bind::Int(i) => query.bind(*i),
                Bind::Float(x) => query.bind(*x),
                Bind::Text(s) => query.bind(s.clone()),
            };
        }
        let mut conn = self.pool.acquire().await?;
        let rows = query.fetch_all(&mut *conn).await?;
        trace!("fetched {} rows", rows.len());
        Ok(rows.iter().map(materialize).collect())
    }
}

/// Convert one row into `(column, value)` pairs, preserving declaration
/// order. Values map by column type; anything not covered falls back to a
/// text decode and then to NULL.
fn materialize(row: &PgRow) -> ResultRow {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let value = match col.type_info().name() {
                "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => row
                    .try_get::<String, _>(i)
                    .map(Value::String)
                    .unwrap_or(Value::Null),
                "INT2" => row
                    .try_get::<i16, _>(i)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                "INT4" => row
                    .try_get::<i32, _>(i)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                "INT8" => row
                    .try_get::<i64, _>(i)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                "FLOAT4" => row
                    .try_get::<f32, _>(i)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                "FLOAT8" => row
                    .try_get::<f64, _>(i)
                    .map(Value::from)
                    .unwrap_or(Value::Null),
                "BOOL" => row
                    .try_get::<bool, _>(i)
                    .map(Value::Bool)
                    .unwrap_or(Value::Null),
                _ => row
                    .try_get::<String, _>(i)
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            };
            (col.name().to_string(), value)
        })
        .collect()
}
