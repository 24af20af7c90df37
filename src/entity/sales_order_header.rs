use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use crate::models::OrderStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales_order_header")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub sales_order_id: i32,
    pub revision_number: i16,
    pub order_date: DateTimeWithTimeZone,
    pub ship_date: Option<DateTimeWithTimeZone>,
    pub status: OrderStatus,
    pub online_order_flag: bool,
    pub sales_order_number: String,
    pub customer_id: i32,
    pub bill_to_address_id: i32,
    pub ship_to_address_id: i32,
    pub ship_method_id: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub sub_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub tax_amt: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_due: Decimal,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales_order_detail::Entity")]
    SalesOrderDetail,
}

impl Related<super::sales_order_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesOrderDetail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
