use std::marker::PhantomData;
use std::time::Instant;

use sqlx::{
    postgres::{PgArguments, PgRow},
    FromRow, PgConnection, Postgres,
};

use crate::config;
use crate::database::manager::DatabaseError;
use crate::filter::{FilterWhere, FilterWhereInfo, SqlParam, SqlResult};

/// `SELECT * FROM <table> WHERE 1=1 [AND ...] [ORDER BY ...]`, bound and mapped to `T`.
pub struct QueryBuilder<T> {
    table_name: &'static str,
    conditions: Vec<FilterWhereInfo>,
    order_by: Option<&'static str>,
    _phantom: PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str) -> Result<Self, DatabaseError> {
        validate_identifier(table_name)?;
        Ok(Self {
            table_name,
            conditions: vec![],
            order_by: None,
            _phantom: PhantomData,
        })
    }

    /// Append conditions, keeping their order
    pub fn filter(mut self, conditions: Vec<FilterWhereInfo>) -> Result<Self, DatabaseError> {
        for condition in &conditions {
            validate_identifier(condition.column)?;
        }
        self.conditions.extend(conditions);
        Ok(self)
    }

    pub fn where_eq(self, column: &'static str, value: SqlParam) -> Result<Self, DatabaseError> {
        self.filter(vec![FilterWhereInfo::eq(column, value)])
    }

    pub fn order_by(mut self, column: &'static str) -> Result<Self, DatabaseError> {
        validate_identifier(column)?;
        self.order_by = Some(column);
        Ok(self)
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.conditions);
        let mut query = format!("SELECT * FROM \"{}\" WHERE {}", self.table_name, where_clause);
        if let Some(column) = self.order_by {
            query.push_str(&format!(" ORDER BY \"{}\"", column));
        }
        SqlResult { query, params }
    }

    pub async fn select_all(self, conn: &mut PgConnection) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.to_sql();
        let started = Instant::now();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(&mut *conn).await?;
        log_query(&sql_result, started, rows.len());
        Ok(rows)
    }

    pub async fn select_optional(self, conn: &mut PgConnection) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.to_sql();
        let started = Instant::now();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(&mut *conn).await?;
        log_query(&sql_result, started, usize::from(row.is_some()));
        Ok(row)
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Decimal(d) => q.bind(*d),
        SqlParam::Text(s) => q.bind(s.as_str()),
    }
}

fn log_query(sql_result: &SqlResult, started: Instant, rows: usize) {
    let settings = &config::config().database;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if settings.enable_query_logging {
        tracing::debug!(
            sql = %sql_result.query,
            params = sql_result.params.len(),
            rows,
            elapsed_ms,
            "query executed"
        );
    }
    if elapsed_ms >= settings.slow_query_threshold_ms {
        tracing::warn!(sql = %sql_result.query, elapsed_ms, "slow query");
    }
}

fn validate_identifier(name: &str) -> Result<(), DatabaseError> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DatabaseError::QueryError(format!("Invalid identifier: {}", name)));
    }
    Ok(())
}
