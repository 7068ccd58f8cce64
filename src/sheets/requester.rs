//! HTTP client for the spreadsheet `values` API.
//!
//! This module provides the [`SheetsRequester`] struct which reads named ranges
//! and appends rows to them.

use log::{debug, info};
use mockall::automock;
use reqwest::Client;
use serde_json::Value;

use crate::{
    error::CommandError,
    sheets::{
        Rows,
        response_structs::{AppendRequest, AppendResponse, ValueRange},
    },
};

/// How cell values are rendered in a `values.get` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRender {
    /// Values as displayed in the spreadsheet, always strings.
    Formatted,
    /// Raw values: numbers stay numbers, dates become serial numbers.
    Unformatted,
}

impl ValueRender {
    fn as_query(&self) -> &'static str {
        match self {
            ValueRender::Formatted => "FORMATTED_VALUE",
            ValueRender::Unformatted => "UNFORMATTED_VALUE",
        }
    }
}

/// Trait for reading and appending spreadsheet rows.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
pub trait Requester {
    /// Fetches every row of a named range.
    async fn get_values(&self, range: &str, render: ValueRender) -> Result<Rows, CommandError>;
    /// Appends a row after the last row of a named range, without parsing formulae.
    async fn append_row(&self, range: &str, row: Vec<Value>) -> Result<(), CommandError>;
}

/// HTTP client bound to one spreadsheet.
///
/// # Examples
///
/// ```no_run
/// let requester = SheetsRequester::new("https://sheets.googleapis.com", "sheet-id", "token");
/// let rows = requester.get_values("milestones_column", ValueRender::Formatted).await.unwrap();
/// ```
pub struct SheetsRequester {
    /// Base URL of the API, without trailing slash
    url: String,
    /// Identifier of the spreadsheet, as found in its URL
    spreadsheet_id: String,
    /// OAuth bearer token allowed to edit the spreadsheet
    access_token: String,
    /// HTTP client
    client: Client,
}

impl SheetsRequester {
    /// Create a new [SheetsRequester].
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the spreadsheet API.
    /// * `spreadsheet_id` - The spreadsheet to work on.
    /// * `access_token` - The bearer token sent with every request.
    pub fn new(url: &str, spreadsheet_id: &str, access_token: &str) -> Self {
        SheetsRequester {
            url: url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
            client: Client::new(),
        }
    }

    fn range_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            &self.url, &self.spreadsheet_id, range
        )
    }
}

impl Requester for SheetsRequester {
    /// Request `GET /v4/spreadsheets/{id}/values/{range}`.
    ///
    /// The API answers with a value range:
    /// ```text
    /// { "range": "Hours!A2:D40", "majorDimension": "ROWS", "values": [["bob", "party", "...", 2]] }
    /// ```
    /// Only `values` is kept. A missing `values` field means an empty range.
    async fn get_values(&self, range: &str, render: ValueRender) -> Result<Rows, CommandError> {
        let url = self.range_url(range);
        info!("request range {}", range);
        debug!("request {}?valueRenderOption={}", &url, render.as_query());

        let value_range: ValueRange = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("valueRenderOption", render.as_query())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> {}", &url, &value_range);

        Ok(value_range.values)
    }

    /// Request `POST /v4/spreadsheets/{id}/values/{range}:append`.
    ///
    /// Values are written as-is (`RAW`) in newly inserted rows so existing data
    /// below the table is never overwritten.
    async fn append_row(&self, range: &str, row: Vec<Value>) -> Result<(), CommandError> {
        let url = format!("{}:append", self.range_url(range));
        info!("append row to {}", range);
        debug!("append {:?} to {}", &row, &url);

        let response: AppendResponse = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&AppendRequest::single_row(row))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("appended to {:?}", response.table_range);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_get_values() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let body = r#"{"range": "Milestones!A1:A3", "majorDimension": "ROWS", "values": [["100"], ["200"], ["500"]]}"#;

        server
            .mock("GET", "/v4/spreadsheets/sheet1/values/milestones_column")
            .match_query(Matcher::UrlEncoded(
                "valueRenderOption".to_owned(),
                "FORMATTED_VALUE".to_owned(),
            ))
            .match_header("authorization", "Bearer token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let requester = SheetsRequester::new(&url, "sheet1", "token");
        let rows = requester
            .get_values("milestones_column", ValueRender::Formatted)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], json!("100"));
        assert_eq!(rows[2][0], json!("500"));
    }

    #[tokio::test]
    async fn test_get_values_unformatted_empty_range() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/v4/spreadsheets/sheet1/values/date_hours_table")
            .match_query(Matcher::UrlEncoded(
                "valueRenderOption".to_owned(),
                "UNFORMATTED_VALUE".to_owned(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"range": "Hours!B2:D2", "majorDimension": "ROWS"}"#)
            .create_async()
            .await;

        let requester = SheetsRequester::new(&url, "sheet1", "token");
        let rows = requester
            .get_values("date_hours_table", ValueRender::Unformatted)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_get_values_error_status() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/v4/spreadsheets/sheet1/values/paid")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let requester = SheetsRequester::new(&url, "sheet1", "token");
        let result = requester.get_values("paid", ValueRender::Formatted).await;
        assert!(matches!(result, Err(CommandError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_append_row() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/v4/spreadsheets/sheet1/values/hours_table_next:append")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("valueInputOption".to_owned(), "RAW".to_owned()),
                Matcher::UrlEncoded("insertDataOption".to_owned(), "INSERT_ROWS".to_owned()),
            ]))
            .match_header("authorization", "Bearer token")
            .match_body(Matcher::Json(json!({
                "majorDimension": "ROWS",
                "values": [["bob", "party", "2024-03-01T10:00:00.000Z", 2.5]]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"spreadsheetId": "sheet1", "tableRange": "Hours!A1:D10"}"#)
            .create_async()
            .await;

        let requester = SheetsRequester::new(&url, "sheet1", "token");
        requester
            .append_row(
                "hours_table_next",
                vec![
                    json!("bob"),
                    json!("party"),
                    json!("2024-03-01T10:00:00.000Z"),
                    json!(2.5),
                ],
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn test_trailing_slash_is_removed() {
        let requester = SheetsRequester::new("http://sheets.local/", "abc", "token");
        assert_eq!(
            requester.range_url("paid"),
            "http://sheets.local/v4/spreadsheets/abc/values/paid"
        );
    }
}
