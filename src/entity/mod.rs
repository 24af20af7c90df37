pub mod sales_order_detail;
pub mod sales_order_header;

pub use sales_order_detail::Entity as SalesOrderDetail;
pub use sales_order_header::Entity as SalesOrderHeader;
