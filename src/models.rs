use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of a sales order, stored as a small integer.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(num_value = 1)]
    InProcess,
    #[sea_orm(num_value = 2)]
    Approved,
    #[sea_orm(num_value = 3)]
    Backordered,
    #[sea_orm(num_value = 4)]
    Rejected,
    #[sea_orm(num_value = 5)]
    Shipped,
    #[sea_orm(num_value = 6)]
    Cancelled,
}

/// Order header together with the line items it owns.
///
/// Server-assigned fields (`orderId`, `orderNumber`, `totalDue`,
/// `modifiedDate`) may be omitted by callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    #[serde(default)]
    pub order_id: i32,
    #[serde(default)]
    pub revision: u8,
    pub order_date: DateTime<Utc>,
    pub ship_date: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub online_order_flag: bool,
    #[serde(default)]
    pub order_number: String,
    pub customer_id: i32,
    pub bill_to_address_id: i32,
    pub ship_to_address_id: i32,
    pub ship_method_id: i32,
    pub sub_total: Decimal,
    pub tax_amt: Decimal,
    #[serde(default)]
    pub total_due: Decimal,
    #[serde(default)]
    pub modified_date: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<SalesOrderItem>,
}

/// A single line of a sales order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderItem {
    /// Owning order. Overwritten by the repository when the item is inserted.
    #[serde(default)]
    pub order_id: i32,
    #[serde(default)]
    pub detail_id: i64,
    pub quantity: i16,
    pub product_id: i32,
    pub unit_price: Decimal,
    pub unit_price_discount: Decimal,
    #[serde(default)]
    pub line_total: Decimal,
    #[serde(default)]
    pub modified_date: DateTime<Utc>,
}
