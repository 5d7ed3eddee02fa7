// Row access through the REST table endpoint (`/rest/v1/{table}`).
//
// Filters use the PostgREST dialect: `col=eq.value`, `col=gte.value`,
// `order=col.desc`, `limit=n`.

use std::fmt;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ServiceClient;
use crate::Error;

/// Sort direction for [`Query::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => f.write_str("asc"),
            Self::Descending => f.write_str("desc"),
        }
    }
}

/// Filter, ordering, and limit for a table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<(String, String)>,
    order: Option<(String, Order)>,
    limit: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = value`
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// `column >= value`
    #[must_use]
    pub fn gte(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters
            .push((column.to_owned(), format!("gte.{value}")));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, direction: Order) -> Self {
        self.order = Some((column.to_owned(), direction));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Optional limit; `None` leaves the result unbounded.
    #[must_use]
    pub fn limit_opt(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Render as query-string pairs.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = self.filters.clone();
        if let Some((column, direction)) = &self.order {
            params.push(("order".into(), format!("{column}.{direction}")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".into(), limit.to_string()));
        }
        params
    }
}

/// Read the total from a `Content-Range` header (`0-24/3573` or `*/0`).
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.rsplit_once('/')?;
    total.trim().parse().ok()
}

impl ServiceClient {
    fn table_url(&self, table: &str) -> Result<url::Url, Error> {
        self.endpoint(&format!("rest/v1/{table}"))
    }

    /// `GET /rest/v1/{table}?select=*&...`
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        let params = query.to_params();
        debug!("GET {url} params={params:?}");

        let resp = self
            .request(Method::GET, url)
            .query(&[("select", "*")])
            .query(&params)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// Exact row count for the filter, read from `Content-Range`.
    pub async fn count(&self, table: &str, query: &Query) -> Result<u64, Error> {
        let url = self.table_url(table)?;
        let params = query.to_params();
        debug!("HEAD {url} params={params:?} (count)");

        let resp = self
            .request(Method::HEAD, url)
            .header("Prefer", "count=exact")
            .query(&[("select", "*")])
            .query(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(crate::client::Failure::read(resp).await.into());
        }

        let header = resp
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        parse_content_range_total(&header).ok_or_else(|| Error::Deserialization {
            message: format!("missing or malformed Content-Range: {header:?}"),
            body: header.clone(),
        })
    }

    /// `POST /rest/v1/{table}` returning the inserted rows.
    pub async fn insert<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        table: &str,
        rows: &B,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        debug!("POST {url}");

        let resp = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// `PATCH /rest/v1/{table}?<filters>` returning the updated rows.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        table: &str,
        query: &Query,
        patch: &B,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        let params = query.to_params();
        debug!("PATCH {url} params={params:?}");

        let resp = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .query(&params)
            .json(patch)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// `DELETE /rest/v1/{table}?<filters>`
    pub async fn delete(&self, table: &str, query: &Query) -> Result<(), Error> {
        let url = self.table_url(table)?;
        let params = query.to_params();
        debug!("DELETE {url} params={params:?}");

        let resp = self
            .request(Method::DELETE, url)
            .query(&params)
            .send()
            .await?;
        Self::handle_empty(resp).await
    }
}
