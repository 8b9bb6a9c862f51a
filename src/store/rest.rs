//! REST implementation of [`TableStore`] for Airtable-compatible APIs.
//!
//! Every table lives under `{api_url}/{base_id}/{table}`. Listing
//! follows the service's offset pagination until the offset disappears.
//! Requests carry a bearer token; failures map straight onto
//! [`StoreError`] with no retry.

use serde::Deserialize;
use serde_json::json;

use super::{Fields, Result, Row, StoreError, TableStore};

/// Client for a hosted tabular store, scoped to one base.
#[derive(Debug, Clone)]
pub struct RestTableStore {
    client: reqwest::Client,
    api_url: String,
    base_id: String,
    api_token: String,
}

/// One row as the API returns it. `createdTime` is ignored.
#[derive(Debug, Deserialize)]
struct ApiRow {
    id: String,
    #[serde(default)]
    fields: Fields,
}

impl From<ApiRow> for Row {
    fn from(row: ApiRow) -> Self {
        Row {
            id: row.id,
            fields: row.fields,
        }
    }
}

/// Response page for a list request.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<ApiRow>,
    offset: Option<String>,
}

/// Error body shape: `{"error": {"type": …, "message": …}}`, though
/// some endpoints return `{"error": "NOT_FOUND"}`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { message: String },
    Plain(String),
}

impl RestTableStore {
    pub fn new(
        api_url: impl Into<String>,
        base_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            base_id: base_id.into(),
            api_token: api_token.into(),
        }
    }

    /// Builds the URL for a table, with optional row id.
    fn build_url(&self, table: &str, row_id: Option<&str>) -> String {
        let base = self.api_url.trim_end_matches('/');
        let mut url = format!(
            "{}/{}/{}",
            base,
            urlencoding::encode(&self.base_id),
            urlencoding::encode(table)
        );
        if let Some(id) = row_id {
            url.push('/');
            url.push_str(&urlencoding::encode(id));
        }
        url
    }

    /// Turns a non-success response into a [`StoreError`], preferring
    /// the message from the error body when one is present.
    async fn error_from_response(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(ErrorResponse {
                    error: ErrorBody::Detailed { message },
                }) => message,
                Ok(ErrorResponse {
                    error: ErrorBody::Plain(message),
                }) => message,
                Err(_) => body,
            },
            Err(e) => e.to_string(),
        };
        StoreError::Api { status, message }
    }
}

impl TableStore for RestTableStore {
    async fn list_rows(&self, table: &str) -> Result<Vec<Row>> {
        let url = self.build_url(table, None);
        let mut rows = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.api_token));
            if let Some(offset) = &offset {
                request = request.query(&[("offset", offset.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StoreError::Http(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let page: ListResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;

            rows.extend(page.records.into_iter().map(Row::from));

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        tracing::debug!(table, count = rows.len(), "listed rows");
        Ok(rows)
    }

    async fn create_row(&self, table: &str, fields: Fields) -> Result<Row> {
        let url = self.build_url(table, None);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let row: ApiRow = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        tracing::debug!(table, id = %row.id, "created row");
        Ok(row.into())
    }

    async fn delete_row(&self, table: &str, id: &str) -> Result<()> {
        let url = self.build_url(table, Some(id));
        let response = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(StoreError::RowNotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        tracing::debug!(table, id, "deleted row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let store = RestTableStore::new("https://api.airtable.com/v0", "appBase1", "key");
        assert_eq!(
            store.build_url("Tasks", None),
            "https://api.airtable.com/v0/appBase1/Tasks"
        );
        assert_eq!(
            store.build_url("Tasks", Some("rec123")),
            "https://api.airtable.com/v0/appBase1/Tasks/rec123"
        );
    }

    #[test]
    fn test_build_url_trims_trailing_slash_and_encodes() {
        let store = RestTableStore::new("https://api.airtable.com/v0/", "appBase1", "key");
        assert_eq!(
            store.build_url("My Tasks", None),
            "https://api.airtable.com/v0/appBase1/My%20Tasks"
        );
    }

    #[test]
    fn test_error_body_shapes_decode() {
        let detailed: ErrorResponse = serde_json::from_str(
            r#"{"error": {"type": "INVALID_REQUEST", "message": "bad field"}}"#,
        )
        .unwrap();
        match detailed.error {
            ErrorBody::Detailed { message } => assert_eq!(message, "bad field"),
            ErrorBody::Plain(_) => panic!("expected detailed body"),
        }

        let plain: ErrorResponse = serde_json::from_str(r#"{"error": "NOT_FOUND"}"#).unwrap();
        match plain.error {
            ErrorBody::Plain(message) => assert_eq!(message, "NOT_FOUND"),
            ErrorBody::Detailed { .. } => panic!("expected plain body"),
        }
    }
}
