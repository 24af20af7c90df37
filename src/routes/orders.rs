use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    error::AppResult,
    models::SalesOrder,
    response::{ApiResponse, Meta},
    routes::params::IdsQuery,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_orders)
            .post(add_orders)
            .put(update_orders)
            .delete(delete_orders),
    )
}

#[utoipa::path(
    get,
    path = "/api/order",
    params(IdsQuery),
    responses(
        (status = 200, description = "Orders with their items", body = ApiResponse<Vec<SalesOrder>>),
        (status = 400, description = "Malformed id list"),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Orders"
)]
pub async fn get_orders(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> AppResult<Json<ApiResponse<Vec<SalesOrder>>>> {
    let ids = query.parse()?;
    let orders = state.orders.get_orders(&ids).await?;
    let meta = Meta::batch(orders.len());
    Ok(Json(ApiResponse::success("Orders", orders, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/order",
    request_body = Vec<SalesOrder>,
    responses(
        (status = 200, description = "Ids of the inserted orders, in request order", body = ApiResponse<Vec<i32>>),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Orders"
)]
pub async fn add_orders(
    State(state): State<AppState>,
    Json(mut orders): Json<Vec<SalesOrder>>,
) -> AppResult<Json<ApiResponse<Vec<i32>>>> {
    let ids = state.orders.add_orders(&mut orders).await?;
    let meta = Meta::batch(ids.len());
    Ok(Json(ApiResponse::success("Orders added", ids, Some(meta))))
}

#[utoipa::path(
    put,
    path = "/api/order",
    request_body = Vec<SalesOrder>,
    responses(
        (status = 200, description = "One status line per order, in request order", body = ApiResponse<Vec<String>>),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Orders"
)]
pub async fn update_orders(
    State(state): State<AppState>,
    Json(orders): Json<Vec<SalesOrder>>,
) -> AppResult<Json<ApiResponse<Vec<String>>>> {
    let statuses = state.orders.update_orders(&orders).await?;
    let meta = Meta::batch(statuses.len());
    Ok(Json(ApiResponse::success("Orders updated", statuses, Some(meta))))
}

#[utoipa::path(
    delete,
    path = "/api/order",
    params(IdsQuery),
    responses(
        (status = 200, description = "Orders deleted"),
        (status = 400, description = "Malformed id list"),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Orders"
)]
pub async fn delete_orders(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    let ids = query.parse()?;
    state.orders.delete_orders(&ids).await?;
    Ok(Json(ApiResponse::message_only("Orders deleted")))
}
