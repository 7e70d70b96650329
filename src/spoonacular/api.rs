//! HTTP client for the Spoonacular recipe API.

use crate::spoonacular::errors::UpstreamError;
use crate::spoonacular::json::parse_json_with_context;
use crate::spoonacular::middleware::TransparentMiddleware;
use crate::spoonacular::models::{ComplexSearchResults, Quota, RandomRecipes, UpstreamRecipe};
use crate::spoonacular::{RecipeSource, SearchQuery};
use anyhow::Context;
use http::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

const QUOTA_USED_HEADER: &str = "x-api-quota-used";
const QUOTA_LEFT_HEADER: &str = "x-api-quota-left";

/// Thin typed wrapper over the handful of Spoonacular endpoints the proxy uses.
pub struct SpoonacularApi {
    http: ClientWithMiddleware,
    base_url: Url,
    api_key: String,
}

impl SpoonacularApi {
    pub fn new(base_url: Url, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("recipe-proxy/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;

        let http = ClientBuilder::new(client).with(TransparentMiddleware).build();

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url
            .join(path)
            .map_err(|e| UpstreamError::Unavailable(format!("invalid upstream URL {path}: {e}")))
    }

    /// Issue a GET and return the raw response once the status is known to be 2xx.
    async fn get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = self.url(path)?;
        let response = self
            .http
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let response = self.get(path, params).await?;
        let url = response.url().path().to_owned();
        let body = response.text().await?;
        parse_json_with_context(&body).map_err(|source| UpstreamError::ParseFailed { url, source })
    }
}

#[async_trait::async_trait]
impl RecipeSource for SpoonacularApi {
    async fn random_recipes(&self, count: u32) -> Result<Vec<UpstreamRecipe>, UpstreamError> {
        let params = [
            ("number", count.to_string()),
            ("addRecipeInformation", "true".to_owned()),
            ("limitLicense", "true".to_owned()),
        ];
        let batch: RandomRecipes = self.get_json("recipes/random", &params).await?;
        debug!(count = batch.recipes.len(), "fetched random recipes");
        Ok(batch.recipes)
    }

    async fn recipe_information(&self, id: u64) -> Result<UpstreamRecipe, UpstreamError> {
        match self
            .get_json(&format!("recipes/{id}/information"), &[])
            .await
        {
            Err(UpstreamError::Rejected { status: 404, .. }) => Err(UpstreamError::NotFound(id)),
            other => other,
        }
    }

    async fn complex_search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<UpstreamRecipe>, UpstreamError> {
        let found: ComplexSearchResults = self
            .get_json("recipes/complexSearch", &query.to_params())
            .await?;
        debug!(count = found.results.len(), "complex search returned");
        Ok(found.results)
    }

    async fn quota(&self) -> Result<Quota, UpstreamError> {
        let response = self
            .get("recipes/complexSearch", &[("number", "1".to_owned())])
            .await?;
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        Ok(Quota {
            used: header(QUOTA_USED_HEADER),
            remaining: header(QUOTA_LEFT_HEADER),
        })
    }
}

/// Map a non-2xx upstream status (and body) onto an [`UpstreamError`].
fn classify_failure(status: StatusCode, body: &str) -> UpstreamError {
    if status.is_client_error() {
        UpstreamError::Rejected {
            status: status.as_u16(),
            message: upstream_message(body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_owned()
            }),
        }
    } else {
        UpstreamError::Unavailable(format!("upstream returned {status}"))
    }
}

/// Spoonacular error bodies look like `{"status": "failure", "code": 402, "message": "..."}`.
fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["message"].as_str().map(str::to_owned)
}
