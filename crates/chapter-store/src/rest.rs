//! Hosted database REST store
//!
//! Speaks the hosted database's REST dialect: tables and views live under
//! `{url}/rest/v1/{name}`, filters are `column=eq.value` query parameters, and
//! an upsert is a `POST` with `Prefer: resolution=merge-duplicates` plus the
//! conflict column in `on_conflict`.

use crate::error::StoreError;
use crate::store::ChapterStore;
use async_trait::async_trait;
use chapter_core::rows::{self, RawBrotherRow, RawMilestoneRow, RawOverrideRow, RawPledgeProgressRow};
use chapter_core::{
    BrotherRow, CoffeeChatOverride, DatabaseConfig, MilestoneId, Milestones, OverrideMap,
    PledgeProgressRow,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REST_PREFIX: &str = "rest/v1";
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";
const MAX_ERROR_BODY: usize = 512;

/// Store backed by the hosted database's REST interface
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    config: DatabaseConfig,
    api_key: String,
}

impl RestStore {
    /// Create store with an explicit API key
    ///
    /// # Errors
    /// `StoreError::Http` if the HTTP client cannot be built.
    pub fn new(config: DatabaseConfig, api_key: impl Into<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Create store reading the API key from `config.api_key_env`
    ///
    /// # Errors
    /// `StoreError::MissingCredentials` if the variable is unset or empty.
    pub fn from_env(config: DatabaseConfig) -> Result<Self, StoreError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| StoreError::MissingCredentials(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    /// Endpoint for a table or view
    #[must_use]
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PREFIX}/{table}", self.config.url.trim_end_matches('/'))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response
            .text()
            .await
            .unwrap_or_else(|err| format!("<failed to read body: {err}>"));
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table);
        tracing::debug!("GET {} {:?}", url, query);
        let response = self
            .authorized(self.client.get(&url))
            .query(query)
            .send()
            .await?;
        let response = Self::check(response).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|err| StoreError::Decode(format!("{table}: {err}")))
    }
}

#[async_trait]
impl ChapterStore for RestStore {
    async fn milestones(&self) -> Result<Milestones, StoreError> {
        let raw: Vec<RawMilestoneRow> = self
            .select(
                &self.config.milestones_table,
                &[("select", "milestone,cc,cp,due_date".to_string())],
            )
            .await?;
        Ok(rows::milestones(raw)?)
    }

    async fn pledge_progress(&self, milestone: MilestoneId) -> Result<Vec<PledgeProgressRow>, StoreError> {
        let raw: Vec<RawPledgeProgressRow> = self
            .select(
                &self.config.pledge_progress_view,
                &[
                    ("select", "*".to_string()),
                    ("milestone", format!("eq.{milestone}")),
                ],
            )
            .await?;
        Ok(rows::pledge_rows(raw)?)
    }

    async fn brothers(&self) -> Result<Vec<BrotherRow>, StoreError> {
        let raw: Vec<RawBrotherRow> = self
            .select(&self.config.brother_view, &[("select", "*".to_string())])
            .await?;
        Ok(rows::brother_rows(raw)?)
    }

    async fn overrides(&self) -> Result<OverrideMap, StoreError> {
        let raw: Vec<RawOverrideRow> = self
            .select(
                &self.config.overrides_table,
                &[("select", "uniqname,required_offset".to_string())],
            )
            .await?;
        Ok(rows::override_map(raw)?)
    }

    async fn upsert_override(&self, record: &CoffeeChatOverride) -> Result<(), StoreError> {
        let url = self.table_url(&self.config.overrides_table);
        let body = [RawOverrideRow {
            uniqname: Some(record.uniqname.to_string()),
            required_offset: Some(record.required_offset),
        }];
        let sent = self
            .authorized(self.client.post(&url))
            .query(&[("on_conflict", "uniqname")])
            .header("Prefer", UPSERT_PREFER)
            .json(&body)
            .send()
            .await
            .map_err(|err| StoreError::persistence(&record.uniqname, err))?;
        Self::check(sent)
            .await
            .map_err(|err| StoreError::persistence(&record.uniqname, err))?;
        tracing::info!(
            "Upserted coffee-chat override for {} (offset {})",
            record.uniqname,
            record.required_offset
        );
        Ok(())
    }
}
