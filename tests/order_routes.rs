use std::sync::{Arc, Mutex};

use adv_works_api::{
    app,
    error::{AppError, AppResult},
    models::{OrderStatus, SalesOrder},
    repository::{OrderRepository, update_status},
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Records what the routes passed in and answers with canned data.
#[derive(Default)]
struct RecordingRepository {
    requested_ids: Mutex<Vec<Vec<i32>>>,
    deleted_ids: Mutex<Vec<Vec<i32>>>,
    added: Mutex<Vec<SalesOrder>>,
    fail: bool,
}

#[async_trait]
impl OrderRepository for RecordingRepository {
    async fn get_orders(&self, ids: &[i32]) -> AppResult<Vec<SalesOrder>> {
        if self.fail {
            return Err(AppError::OrmError(sea_orm::DbErr::Custom("down".into())));
        }
        self.requested_ids.lock().unwrap().push(ids.to_vec());
        Ok(ids
            .iter()
            .map(|&order_id| SalesOrder {
                order_id,
                status: OrderStatus::Approved,
                ..Default::default()
            })
            .collect())
    }

    async fn add_orders(&self, orders: &mut [SalesOrder]) -> AppResult<Vec<i32>> {
        self.added.lock().unwrap().extend(orders.iter().cloned());
        Ok((0..orders.len()).map(|i| 100 + i as i32).collect())
    }

    async fn update_orders(&self, orders: &[SalesOrder]) -> AppResult<Vec<String>> {
        Ok(orders
            .iter()
            .map(|o| update_status(o.order_id, o.revision > 0))
            .collect())
    }

    async fn delete_orders(&self, ids: &[i32]) -> AppResult<()> {
        self.deleted_ids.lock().unwrap().push(ids.to_vec());
        Ok(())
    }
}

async fn send(repo: Arc<RecordingRepository>, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(AppState::new(repo)).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn order_json(revision: u8, order_id: i32) -> Value {
    json!({
        "orderId": order_id,
        "revision": revision,
        "orderDate": "2024-05-01T12:00:00Z",
        "status": "inProcess",
        "onlineOrderFlag": true,
        "customerId": 29825,
        "billToAddressId": 985,
        "shipToAddressId": 985,
        "shipMethodId": 5,
        "subTotal": "100.00",
        "taxAmt": "8.00",
        "items": [
            { "quantity": 1, "productId": 707, "unitPrice": "100.00", "unitPriceDiscount": "0" }
        ]
    })
}

#[tokio::test]
async fn get_parses_id_list() {
    let repo = Arc::new(RecordingRepository::default());

    let (status, body) = send(repo.clone(), empty_request("GET", "/api/order?ids=1,2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*repo.requested_ids.lock().unwrap(), vec![vec![1, 2]]);
    assert_eq!(body["data"][0]["orderId"], 1);
    assert_eq!(body["data"][0]["status"], "approved");
    assert_eq!(body["data"][1]["orderId"], 2);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["message"], "Orders");
}

#[tokio::test]
async fn get_without_ids_asks_for_nothing() {
    let repo = Arc::new(RecordingRepository::default());

    let (status, body) = send(repo.clone(), empty_request("GET", "/api/order")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*repo.requested_ids.lock().unwrap(), vec![Vec::<i32>::new()]);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn get_with_non_numeric_id_is_bad_request() {
    let repo = Arc::new(RecordingRepository::default());

    let (status, body) = send(repo.clone(), empty_request("GET", "/api/order?ids=1,x")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("invalid order id"));
    assert!(repo.requested_ids.lock().unwrap().is_empty());
}

#[tokio::test]
async fn store_failure_is_internal_error() {
    let repo = Arc::new(RecordingRepository {
        fail: true,
        ..Default::default()
    });

    let (status, body) = send(repo, empty_request("GET", "/api/order?ids=1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "ORM error");
}

#[tokio::test]
async fn post_returns_new_ids() {
    let repo = Arc::new(RecordingRepository::default());
    let payload = json!([order_json(0, 0), order_json(0, 0)]);

    let (status, body) = send(repo.clone(), json_request("POST", "/api/order", payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Orders added");
    assert_eq!(body["data"], json!([100, 101]));
    let added = repo.added.lock().unwrap();
    assert_eq!(added.len(), 2);
    assert_eq!(added[0].status, OrderStatus::InProcess);
    assert_eq!(added[0].items.len(), 1);
    assert_eq!(added[0].items[0].product_id, 707);
}

#[tokio::test]
async fn put_returns_status_lines() {
    let repo = Arc::new(RecordingRepository::default());
    let payload = json!([order_json(4, 1), order_json(0, 2)]);

    let (status, body) = send(repo, json_request("PUT", "/api/order", payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Orders updated");
    assert_eq!(
        body["data"],
        json!(["1: Order was updated", "2: Order was not updated"])
    );
}

#[tokio::test]
async fn delete_passes_ids_through() {
    let repo = Arc::new(RecordingRepository::default());

    let (status, body) = send(repo.clone(), empty_request("DELETE", "/api/order?ids=3,4")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Orders deleted");
    assert_eq!(body["data"], Value::Null);
    assert_eq!(*repo.deleted_ids.lock().unwrap(), vec![vec![3, 4]]);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let repo = Arc::new(RecordingRepository::default());

    let (status, body) = send(repo, empty_request("GET", "/api/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/nope");
}
