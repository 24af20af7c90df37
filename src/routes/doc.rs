use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    models::{OrderStatus, SalesOrder, SalesOrderItem},
    response::Meta,
    routes::{health, orders},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::get_orders,
        orders::add_orders,
        orders::update_orders,
        orders::delete_orders
    ),
    components(schemas(SalesOrder, SalesOrderItem, OrderStatus, Meta)),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Sales order batch endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
