// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use takeoff_app::{Builder, BuilderId, Community, CommunityId, PlanBundle};
use url::Url;

use crate::CatalogSource;

/// Blocking client for the takeoff catalog HTTP service.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("catalog.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("catalog.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "catalog.base_url {base_url:?} must use http or https, got {}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{path}", self.base_url))
            .with_context(|| format!("build catalog URL for {path}"))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        tracing::debug!(%url, "catalog request");
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode {what} from {url}"))
    }
}

impl CatalogSource for Client {
    fn list_builders(&self) -> Result<Vec<Builder>> {
        let url = self.endpoint("builders", &[])?;
        self.get_json(url, "builder list")
    }

    fn list_communities(&self, builder: BuilderId) -> Result<Vec<Community>> {
        let url = self.endpoint("communities", &[("builder_id", builder.to_string())])?;
        self.get_json(url, "community list")
    }

    fn load_plan_bundle(&self, builder: BuilderId, community: CommunityId) -> Result<PlanBundle> {
        let url = self.endpoint(
            "floorplans",
            &[
                ("builder_id", builder.to_string()),
                ("community_id", community.to_string()),
            ],
        )?;
        self.get_json(url, "floor plans and options")
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach catalog service at {} -- check [catalog].base_url or use --catalog-file ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.error.or(parsed.message)
        && !message.is_empty()
    {
        return anyhow!("catalog error ({}): {}", status.as_u16(), message);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("catalog error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("catalog returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}
