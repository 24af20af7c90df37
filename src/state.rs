use std::sync::Arc;

use crate::repository::OrderRepository;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
}

impl AppState {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }
}
