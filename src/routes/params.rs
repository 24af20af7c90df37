use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

/// `?ids=1,2,3` query string accepted by the read and delete endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdsQuery {
    /// Comma separated order ids.
    pub ids: Option<String>,
}

impl IdsQuery {
    pub fn parse(&self) -> AppResult<Vec<i32>> {
        parse_ids(self.ids.as_deref().unwrap_or_default())
    }
}

/// Parse a comma separated id list. Empty entries are skipped, so an empty
/// string is an empty list.
pub fn parse_ids(value: &str) -> AppResult<Vec<i32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("invalid order id `{part}`")))
        })
        .collect()
}
