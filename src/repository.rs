//! Batch operations over sales orders.
//!
//! Every write runs in one transaction per call: the whole batch commits or
//! nothing does. Updates are guarded by the header's revision number, and a
//! stale revision is reported per order instead of failing the batch.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveEnum, ActiveValue::NotSet, DatabaseTransaction, DbBackend, EntityTrait, QueryTrait, Set,
    Statement, Value,
};

use crate::{
    aggregator::aggregate,
    entity::{
        sales_order_detail::{
            ActiveModel as DetailActive, Entity as SalesOrderDetail, Model as DetailModel,
        },
        sales_order_header::Model as HeaderModel,
    },
    error::{AppError, AppResult},
    models::{SalesOrder, SalesOrderItem},
    store::{DbContext, SplitOn, StatementExecutor},
};

/// Item columns start after the `parent_order_id` marker and carry an `item_` prefix.
pub const ORDER_ITEM_SPLIT: SplitOn = SplitOn {
    marker: "parent_order_id",
    prefix: "item_",
};

const SELECT_ORDERS_SQL: &str = r#"
    SELECT h.sales_order_id, h.revision_number, h.order_date, h.ship_date, h.status,
           h.online_order_flag, h.sales_order_number, h.customer_id, h.bill_to_address_id,
           h.ship_to_address_id, h.ship_method_id, h.sub_total, h.tax_amt, h.total_due,
           h.modified_date,
           d.sales_order_id AS parent_order_id,
           d.sales_order_detail_id AS item_sales_order_detail_id,
           d.sales_order_id AS item_sales_order_id,
           d.order_qty AS item_order_qty,
           d.product_id AS item_product_id,
           d.unit_price AS item_unit_price,
           d.unit_price_discount AS item_unit_price_discount,
           d.line_total AS item_line_total,
           d.modified_date AS item_modified_date
    FROM sales_order_header h
    LEFT JOIN sales_order_detail d ON d.sales_order_id = h.sales_order_id
    WHERE h.sales_order_id = ANY($1)
    ORDER BY h.sales_order_id, d.sales_order_detail_id
"#;

const INSERT_ORDER_SQL: &str = r#"
    INSERT INTO sales_order_header (
        order_date, ship_date, status, online_order_flag, customer_id,
        bill_to_address_id, ship_to_address_id, ship_method_id, sub_total, tax_amt
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    RETURNING sales_order_id
"#;

// Check and increment happen in one statement so two writers holding the
// same revision cannot both succeed.
const UPDATE_ORDER_SQL: &str = r#"
    WITH updated AS (
        UPDATE sales_order_header
        SET ship_date = $1, status = $2, customer_id = $3,
            bill_to_address_id = $4, ship_to_address_id = $5, ship_method_id = $6,
            sub_total = $7, tax_amt = $8, modified_date = NOW(),
            revision_number = revision_number + 1
        WHERE sales_order_id = $9 AND revision_number = $10
        RETURNING 1
    )
    SELECT COUNT(*) AS affected FROM updated
"#;

const DELETE_ITEMS_SQL: &str = "DELETE FROM sales_order_detail WHERE sales_order_id = ANY($1)";
const DELETE_ORDERS_SQL: &str = "DELETE FROM sales_order_header WHERE sales_order_id = ANY($1)";

/// Batch operations on sales orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Loads the orders with the given ids, each with all of its items.
    async fn get_orders(&self, ids: &[i32]) -> AppResult<Vec<SalesOrder>>;

    /// Inserts the orders and their items, returning the new ids in input
    /// order. Items are stamped with their order's new id.
    async fn add_orders(&self, orders: &mut [SalesOrder]) -> AppResult<Vec<i32>>;

    /// Updates order headers whose stored revision matches, returning one
    /// status line per order.
    async fn update_orders(&self, orders: &[SalesOrder]) -> AppResult<Vec<String>>;

    /// Deletes the orders and their items.
    async fn delete_orders(&self, ids: &[i32]) -> AppResult<()>;
}

/// [`OrderRepository`] over a relational store reached through a [`DbContext`].
pub struct DbOrderRepository<C> {
    context: C,
}

impl<C: DbContext> DbOrderRepository<C> {
    pub fn new(context: C) -> Self {
        Self { context }
    }
}

#[async_trait]
impl<C: DbContext> OrderRepository for DbOrderRepository<C> {
    #[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn get_orders(&self, ids: &[i32]) -> AppResult<Vec<SalesOrder>> {
        let conn = self.context.connection().await?;

        let rows = conn
            .query_pairs::<HeaderModel, DetailModel>(
                ids_statement(SELECT_ORDERS_SQL, ids),
                ORDER_ITEM_SPLIT,
            )
            .await?;
        let row_count = rows.len();

        let pairs = rows
            .into_iter()
            .map(|(header, detail)| {
                Ok((
                    order_from_entity(header)?,
                    detail.map(order_item_from_entity),
                ))
            })
            .collect::<AppResult<Vec<_>>>()?;
        let orders = aggregate(pairs);

        tracing::debug!(rows = row_count, orders = orders.len(), "orders loaded");
        Ok(orders)
    }

    #[tracing::instrument(skip(self, orders), fields(batch = orders.len()))]
    async fn add_orders(&self, orders: &mut [SalesOrder]) -> AppResult<Vec<i32>> {
        let conn = self.context.connection().await?;
        let txn = self.context.begin_transaction(&conn).await?;

        let outcome = insert_orders(&txn, orders).await;
        let ids = settle(txn, outcome).await?;

        tracing::info!(inserted = ids.len(), "orders added");
        Ok(ids)
    }

    #[tracing::instrument(skip(self, orders), fields(batch = orders.len()))]
    async fn update_orders(&self, orders: &[SalesOrder]) -> AppResult<Vec<String>> {
        let conn = self.context.connection().await?;
        let txn = self.context.begin_transaction(&conn).await?;

        let outcome = update_headers(&txn, orders).await;
        settle(txn, outcome).await
    }

    #[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn delete_orders(&self, ids: &[i32]) -> AppResult<()> {
        if ids.is_empty() {
            tracing::debug!("no order ids given, nothing to delete");
            return Ok(());
        }

        let conn = self.context.connection().await?;
        let txn = self.context.begin_transaction(&conn).await?;

        let outcome = remove_orders(&txn, ids).await;
        settle(txn, outcome).await
    }
}

/// Commits on success; otherwise rolls back and hands back the original error.
async fn settle<T>(txn: DatabaseTransaction, outcome: AppResult<T>) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(error = %err, "rolling back order batch");
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

async fn insert_orders(
    txn: &DatabaseTransaction,
    orders: &mut [SalesOrder],
) -> AppResult<Vec<i32>> {
    let mut ids = Vec::with_capacity(orders.len());

    for order in orders.iter_mut() {
        let order_id: i32 = txn.execute_scalar(insert_order_statement(order)).await?;
        order.order_id = order_id;
        ids.push(order_id);

        if order.items.is_empty() {
            continue;
        }

        for item in order.items.iter_mut() {
            item.order_id = order_id;
        }
        let inserted = txn.execute_count(insert_items_statement(&order.items)).await?;
        tracing::debug!(order_id, items = inserted, "order items inserted");
    }

    Ok(ids)
}

async fn update_headers(
    txn: &DatabaseTransaction,
    orders: &[SalesOrder],
) -> AppResult<Vec<String>> {
    let mut statuses = Vec::with_capacity(orders.len());

    for order in orders {
        let affected: i64 = txn.execute_scalar(update_order_statement(order)).await?;
        let updated = affected > 0;
        if !updated {
            tracing::debug!(
                order_id = order.order_id,
                revision = order.revision,
                "order not updated: unknown id or stale revision"
            );
        }
        statuses.push(update_status(order.order_id, updated));
    }

    Ok(statuses)
}

async fn remove_orders(txn: &DatabaseTransaction, ids: &[i32]) -> AppResult<()> {
    let items = txn.execute_count(ids_statement(DELETE_ITEMS_SQL, ids)).await?;
    let orders = txn.execute_count(ids_statement(DELETE_ORDERS_SQL, ids)).await?;
    tracing::info!(orders, items, "orders deleted");
    Ok(())
}

/// Status line reported by [`OrderRepository::update_orders`] for one order.
pub fn update_status(order_id: i32, updated: bool) -> String {
    if updated {
        format!("{order_id}: Order was updated")
    } else {
        format!("{order_id}: Order was not updated")
    }
}

fn ids_statement(sql: &str, ids: &[i32]) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, vec![Value::from(ids.to_vec())])
}

fn insert_order_statement(order: &SalesOrder) -> Statement {
    let values: Vec<Value> = vec![
        order.order_date.into(),
        order.ship_date.into(),
        order.status.to_value().into(),
        order.online_order_flag.into(),
        order.customer_id.into(),
        order.bill_to_address_id.into(),
        order.ship_to_address_id.into(),
        order.ship_method_id.into(),
        order.sub_total.into(),
        order.tax_amt.into(),
    ];
    Statement::from_sql_and_values(DbBackend::Postgres, INSERT_ORDER_SQL, values)
}

fn insert_items_statement(items: &[SalesOrderItem]) -> Statement {
    SalesOrderDetail::insert_many(items.iter().map(|item| DetailActive {
        sales_order_detail_id: NotSet,
        sales_order_id: Set(item.order_id),
        order_qty: Set(item.quantity),
        product_id: Set(item.product_id),
        unit_price: Set(item.unit_price),
        unit_price_discount: Set(item.unit_price_discount),
        line_total: NotSet,
        modified_date: NotSet,
    }))
    .build(DbBackend::Postgres)
}

fn update_order_statement(order: &SalesOrder) -> Statement {
    let values: Vec<Value> = vec![
        order.ship_date.into(),
        order.status.to_value().into(),
        order.customer_id.into(),
        order.bill_to_address_id.into(),
        order.ship_to_address_id.into(),
        order.ship_method_id.into(),
        order.sub_total.into(),
        order.tax_amt.into(),
        order.order_id.into(),
        i16::from(order.revision).into(),
    ];
    Statement::from_sql_and_values(DbBackend::Postgres, UPDATE_ORDER_SQL, values)
}

fn order_from_entity(model: HeaderModel) -> AppResult<SalesOrder> {
    let revision = u8::try_from(model.revision_number).map_err(|err| {
        AppError::InvalidData(format!(
            "order {} has revision {}: {err}",
            model.sales_order_id, model.revision_number
        ))
    })?;

    Ok(SalesOrder {
        order_id: model.sales_order_id,
        revision,
        order_date: model.order_date.with_timezone(&Utc),
        ship_date: model.ship_date.map(|dt| dt.with_timezone(&Utc)),
        status: model.status,
        online_order_flag: model.online_order_flag,
        order_number: model.sales_order_number,
        customer_id: model.customer_id,
        bill_to_address_id: model.bill_to_address_id,
        ship_to_address_id: model.ship_to_address_id,
        ship_method_id: model.ship_method_id,
        sub_total: model.sub_total,
        tax_amt: model.tax_amt,
        total_due: model.total_due,
        modified_date: model.modified_date.with_timezone(&Utc),
        items: Vec::new(),
    })
}

fn order_item_from_entity(model: DetailModel) -> SalesOrderItem {
    SalesOrderItem {
        order_id: model.sales_order_id,
        detail_id: model.sales_order_detail_id,
        quantity: model.order_qty,
        product_id: model.product_id,
        unit_price: model.unit_price,
        unit_price_discount: model.unit_price_discount,
        line_total: model.line_total,
        modified_date: model.modified_date.with_timezone(&Utc),
    }
}
