use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales_order_detail")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub sales_order_detail_id: i64,
    pub sales_order_id: i32,
    pub order_qty: i16,
    pub product_id: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_price_discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((38, 6)))")]
    pub line_total: Decimal,
    pub modified_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales_order_header::Entity",
        from = "Column::SalesOrderId",
        to = "super::sales_order_header::Column::SalesOrderId"
    )]
    SalesOrderHeader,
}

impl Related<super::sales_order_header::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesOrderHeader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
