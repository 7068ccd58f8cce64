//! Request and response bodies of the spreadsheet `values` API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sheets::Rows;

/// Body of a `values.get` response.
///
/// The API omits `values` entirely when the range is empty.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub values: Rows,
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "range={}, rows={}", self.range, self.values.len())
    }
}

/// Body of a `values.append` request.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppendRequest {
    pub major_dimension: &'static str,
    pub values: Rows,
}

impl AppendRequest {
    pub fn single_row(row: Vec<serde_json::Value>) -> Self {
        AppendRequest {
            major_dimension: "ROWS",
            values: vec![row],
        }
    }
}

/// The part of a `values.append` response the bot looks at.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    #[serde(default)]
    pub table_range: Option<String>,
}
