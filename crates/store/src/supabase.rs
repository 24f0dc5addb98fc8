//! Remote backend: Supabase tables reached through the PostgREST API.
//!
//! Goals live in `health_goals` (keyed by `goal_id`), food entries in
//! `food_logs` (keyed by `food_id`), notes in `notes` (keyed by
//! `note_id`). Identifiers are generated here, not by the database, so
//! both backends hand out the same id format.

use async_trait::async_trait;
use chrono::NaiveDate;
use concierge_config::StoreConfig;
use concierge_core::backend::{BackendKind, StoreBackend};
use concierge_core::error::StoreError;
use concierge_core::health::{
    FoodLogEntry, GoalUpdate, HealthGoal, HealthStore, NewFoodLog, NewHealthGoal,
};
use concierge_core::note::{NewNote, Note, NoteStore, NoteUpdate};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const GOALS_TABLE: &str = "health_goals";
const FOOD_LOGS_TABLE: &str = "food_logs";
const NOTES_TABLE: &str = "notes";

/// A [`HealthStore`] and [`NoteStore`] backed by Supabase (PostgREST).
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    /// Create a store for `base_url` (e.g. `https://abc.supabase.co`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::BackendUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Build the store from config. `Ok(None)` when URL or key is missing.
    pub fn from_config(config: &StoreConfig) -> Result<Option<Self>, StoreError> {
        if !config.is_configured() {
            return Ok(None);
        }
        let (Some(url), Some(key)) = (config.normalized_url(), config.api_key.clone()) else {
            return Ok(None);
        };
        Self::new(url, key, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Round-trip a one-row read to check the tables are reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let request = self
            .request(Method::GET, GOALS_TABLE)
            .query(&[("select", "goal_id"), ("limit", "1")]);
        let _: Vec<serde_json::Value> = self.send(request).await?;
        Ok(())
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::BackendUnavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Remote store returned error");
            return Err(StoreError::Remote {
                status,
                message: body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Insert one row and read back its representation.
    async fn insert<R, T>(&self, table: &str, row: &R) -> Result<T, StoreError>
    where
        R: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(row);
        let rows: Vec<T> = self.send(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode(format!("insert into {table} returned no rows")))
    }

    /// PATCH the rows matching `key = id` and read back the first one.
    async fn patch<U, T>(
        &self,
        table: &str,
        key: &str,
        id: &str,
        update: &U,
    ) -> Result<Option<T>, StoreError>
    where
        U: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let filter = format!("eq.{id}");
        let request = self
            .request(Method::PATCH, table)
            .query(&[(key, filter.as_str())])
            .header("Prefer", "return=representation")
            .json(update);
        let rows: Vec<T> = self.send(request).await?;
        Ok(rows.into_iter().next())
    }

    /// Read the row matching `key = id`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        table: &str,
        key: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let filter = format!("eq.{id}");
        let request = self
            .request(Method::GET, table)
            .query(&[("select", "*"), (key, filter.as_str())]);
        let rows: Vec<T> = self.send(request).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl StoreBackend for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    /// Configured means available; reachability is only checked by [`SupabaseStore::ping`].
    async fn is_available(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }
}

#[async_trait]
impl HealthStore for SupabaseStore {
    async fn add_goal(&self, goal: NewHealthGoal) -> Result<String, StoreError> {
        let row = goal.into_goal(Uuid::new_v4().to_string());
        let stored: HealthGoal = self.insert(GOALS_TABLE, &row).await?;
        debug!(goal_id = %stored.id, goal_type = %stored.goal_type, "Goal stored remotely");
        Ok(stored.id)
    }

    async fn update_goal(
        &self,
        id: &str,
        update: GoalUpdate,
    ) -> Result<Option<HealthGoal>, StoreError> {
        // PostgREST rejects an empty PATCH body; read the row instead.
        if update.is_empty() {
            return self.fetch(GOALS_TABLE, "goal_id", id).await;
        }
        self.patch(GOALS_TABLE, "goal_id", id, &update).await
    }

    async fn active_goals(&self) -> Result<Vec<HealthGoal>, StoreError> {
        let request = self.request(Method::GET, GOALS_TABLE).query(&[
            ("select", "*"),
            ("is_active", "eq.true"),
            ("order", "created_at.asc"),
        ]);
        self.send(request).await
    }

    async fn add_food_log(&self, entry: NewFoodLog) -> Result<String, StoreError> {
        let row = entry.into_entry(Uuid::new_v4().to_string());
        let stored: FoodLogEntry = self.insert(FOOD_LOGS_TABLE, &row).await?;
        debug!(food_id = %stored.id, "Food entry stored remotely");
        Ok(stored.id)
    }

    async fn food_logs_on(&self, date: NaiveDate) -> Result<Vec<FoodLogEntry>, StoreError> {
        let filter = format!("eq.{date}");
        let request = self.request(Method::GET, FOOD_LOGS_TABLE).query(&[
            ("select", "*"),
            ("date", filter.as_str()),
            ("order", "created_at.asc"),
        ]);
        self.send(request).await
    }
}

#[async_trait]
impl NoteStore for SupabaseStore {
    async fn add_note(&self, note: NewNote) -> Result<String, StoreError> {
        let row = note.into_note(Uuid::new_v4().to_string());
        let stored: Note = self.insert(NOTES_TABLE, &row).await?;
        debug!(note_id = %stored.id, "Note stored remotely");
        Ok(stored.id)
    }

    async fn update_note(&self, id: &str, update: NoteUpdate) -> Result<Option<Note>, StoreError> {
        if update.is_empty() {
            return self.fetch(NOTES_TABLE, "note_id", id).await;
        }
        self.patch(NOTES_TABLE, "note_id", id, &update).await
    }

    async fn notes(&self) -> Result<Vec<Note>, StoreError> {
        let request = self
            .request(Method::GET, NOTES_TABLE)
            .query(&[("select", "*"), ("order", "created_at.asc")]);
        self.send(request).await
    }
}
