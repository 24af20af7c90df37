//! Store access used by the order repository.
//!
//! [`DbContext`] hands out connections and opens transactions on them.
//! [`StatementExecutor`] runs raw statements against anything sea-orm can
//! execute on, a plain connection or an open transaction, with one method per
//! result shape.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, FromQueryResult, Statement,
    TransactionTrait, TryGetable,
};

/// Provider of connections and transactions for one repository call.
#[async_trait]
pub trait DbContext: Send + Sync {
    /// Returns a live connection. The handle is dropped when the calling
    /// operation ends.
    async fn connection(&self) -> Result<Arc<DatabaseConnection>, DbErr>;

    /// Begins a transaction on `conn`. A transaction dropped without an
    /// explicit commit is rolled back.
    async fn begin_transaction(
        &self,
        conn: &DatabaseConnection,
    ) -> Result<DatabaseTransaction, DbErr>;
}

/// [`DbContext`] backed by a sea-orm connection pool.
#[derive(Clone)]
pub struct OrmDbContext {
    conn: Arc<DatabaseConnection>,
}

impl OrmDbContext {
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl DbContext for OrmDbContext {
    async fn connection(&self) -> Result<Arc<DatabaseConnection>, DbErr> {
        Ok(Arc::clone(&self.conn))
    }

    async fn begin_transaction(
        &self,
        conn: &DatabaseConnection,
    ) -> Result<DatabaseTransaction, DbErr> {
        conn.begin().await
    }
}

/// Column boundary between parent and child fields in a joined row.
///
/// `marker` is an integer column that is NULL when the outer join found no
/// child. Child columns are read with `prefix` prepended to their names;
/// parent columns are read unprefixed.
#[derive(Debug, Clone, Copy)]
pub struct SplitOn {
    pub marker: &'static str,
    pub prefix: &'static str,
}

#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Runs a join query and maps every row into a parent and, unless the
    /// split marker is NULL, a child.
    async fn query_pairs<H, I>(
        &self,
        stmt: Statement,
        split: SplitOn,
    ) -> Result<Vec<(H, Option<I>)>, DbErr>
    where
        H: FromQueryResult + Send,
        I: FromQueryResult + Send;

    /// Returns the first column of the first row.
    async fn execute_scalar<T>(&self, stmt: Statement) -> Result<T, DbErr>
    where
        T: TryGetable + Send;

    /// Returns the number of rows the statement affected.
    async fn execute_count(&self, stmt: Statement) -> Result<u64, DbErr>;
}

#[async_trait]
impl<C> StatementExecutor for C
where
    C: ConnectionTrait + Send + Sync,
{
    async fn query_pairs<H, I>(
        &self,
        stmt: Statement,
        split: SplitOn,
    ) -> Result<Vec<(H, Option<I>)>, DbErr>
    where
        H: FromQueryResult + Send,
        I: FromQueryResult + Send,
    {
        let rows = self.query_all(stmt).await?;
        let mut pairs = Vec::with_capacity(rows.len());
        for row in &rows {
            let parent = H::from_query_result(row, "")?;
            let marker: Option<i32> = row.try_get("", split.marker)?;
            let child = match marker {
                Some(_) => Some(I::from_query_result(row, split.prefix)?),
                None => None,
            };
            pairs.push((parent, child));
        }
        Ok(pairs)
    }

    async fn execute_scalar<T>(&self, stmt: Statement) -> Result<T, DbErr>
    where
        T: TryGetable + Send,
    {
        let row = self
            .query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("scalar statement returned no rows".into()))?;
        row.try_get_by_index(0)
    }

    async fn execute_count(&self, stmt: Statement) -> Result<u64, DbErr> {
        let result = self.execute(stmt).await?;
        Ok(result.rows_affected())
    }
}
