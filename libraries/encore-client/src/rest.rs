//! PostgREST request plumbing shared by the API clients.
//!
//! Tables live under `/rest/v1/<table>`, filters are query parameters of
//! the form `column=op.value`, and stored functions are called with
//! `POST /rest/v1/rpc/<function>`.

use crate::client::EncoreClient;
use crate::error::{ClientError, Result};
use crate::types::Fetched;
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::{self, Display};
use tracing::{debug, warn};

/// Postgres error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Filter, order and paging parameters for a table request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }

    pub(crate) fn select(self, columns: &str) -> Self {
        self.push("select", columns.to_string())
    }

    pub(crate) fn eq(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("eq.{value}"))
    }

    /// `or=(a.eq.x,b.gte.y)`
    pub(crate) fn or(self, filters: &[String]) -> Self {
        self.push("or", format!("({})", filters.join(",")))
    }

    pub(crate) fn order(self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        self.push("order", format!("{column}.{direction}"))
    }

    pub(crate) fn limit(self, limit: usize) -> Self {
        self.push("limit", limit.to_string())
    }

    pub(crate) fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Stable key identifying this read in the offline cache
    pub(crate) fn cache_key(&self, table: &str) -> String {
        format!("{table}?{self}")
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Error body returned by PostgREST
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Turn a non-success response into a typed error.
pub(crate) async fn error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

    let message = match (body.message, body.details) {
        (Some(message), Some(details)) => format!("{message} ({details})"),
        (Some(message), None) => message,
        (None, _) if !text.is_empty() => text,
        (None, _) => format!("HTTP {status}"),
    };

    if body.code.as_deref() == Some(UNIQUE_VIOLATION) || status == 409 {
        return ClientError::Duplicate(message);
    }

    match status {
        401 => ClientError::AuthRequired,
        403 => ClientError::Forbidden(message),
        _ => ClientError::Backend {
            status,
            code: body.code,
            message,
        },
    }
}

async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {what}: {e}")))
}

impl EncoreClient {
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url(), table)
    }

    /// Build a request carrying the API key and bearer token.
    ///
    /// The anon key doubles as the bearer when nobody is signed in.
    async fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self
            .access_token()
            .await
            .unwrap_or_else(|| self.anon_key().to_string());

        self.http()
            .request(method, url)
            .header("apikey", self.anon_key())
            .bearer_auth(bearer)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(ClientError::from_send)?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// `GET /rest/v1/<table>?<query>`
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>> {
        let url = self.table_url(table);
        debug!(table, query = %query, "Selecting rows");

        let builder = self.request(Method::GET, &url).await.query(query.params());
        let response = self.send(builder).await?;
        parse(response, table).await
    }

    /// Select, caching the rows on success and serving the cached copy
    /// when the backend cannot be reached.
    pub(crate) async fn select_cached<T>(&self, table: &str, query: &Query) -> Result<Fetched<Vec<T>>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.select_cached_as(&query.cache_key(table), table, query)
            .await
    }

    /// [`select_cached`](Self::select_cached) under an explicit cache key,
    /// for queries whose parameters change between calls.
    pub(crate) async fn select_cached_as<T>(
        &self,
        key: &str,
        table: &str,
        query: &Query,
    ) -> Result<Fetched<Vec<T>>>
    where
        T: Serialize + DeserializeOwned,
    {
        match self.select(table, query).await {
            Ok(rows) => {
                if let Err(e) = self.cache().put(key, &rows).await {
                    warn!(key = %key, error = %e, "Failed to cache rows");
                }
                Ok(Fetched::remote(rows))
            }
            Err(e) if e.allows_cache_fallback() => match self.cache().get(key).await {
                Some(rows) => {
                    warn!(key = %key, error = %e, "Backend unavailable, serving cached rows");
                    Ok(Fetched::cached(rows))
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    /// `POST /rest/v1/<table>`, returning the stored row.
    pub(crate) async fn insert<B, T>(&self, table: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table);
        debug!(table, "Inserting row");

        let builder = self
            .request(Method::POST, &url)
            .await
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.send(builder).await?;
        let mut rows: Vec<T> = parse(response, table).await?;

        if rows.is_empty() {
            return Err(ClientError::ParseError(format!(
                "Insert into {table} returned no row"
            )));
        }
        Ok(rows.swap_remove(0))
    }

    /// `PATCH /rest/v1/<table>?<query>`, returning the changed rows.
    pub(crate) async fn update<B, T>(&self, table: &str, query: &Query, body: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table);
        debug!(table, query = %query, "Updating rows");

        let builder = self
            .request(Method::PATCH, &url)
            .await
            .query(query.params())
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.send(builder).await?;
        parse(response, table).await
    }

    /// `DELETE /rest/v1/<table>?<query>`, returning the number of rows removed.
    pub(crate) async fn delete(&self, table: &str, query: &Query) -> Result<usize> {
        let url = self.table_url(table);
        debug!(table, query = %query, "Deleting rows");

        let builder = self
            .request(Method::DELETE, &url)
            .await
            .query(query.params())
            .header("Prefer", "return=representation");
        let response = self.send(builder).await?;
        let rows: Vec<serde_json::Value> = parse(response, table).await?;
        Ok(rows.len())
    }

    /// `POST /rest/v1/rpc/<function>`
    pub(crate) async fn rpc<B: Serialize + ?Sized>(&self, function: &str, args: &B) -> Result<()> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url(), function);
        debug!(function, "Calling stored function");

        let builder = self.request(Method::POST, &url).await.json(args);
        self.send(builder).await?;
        Ok(())
    }
}
