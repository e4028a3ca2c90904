//! PostgREST-style HTTP backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::RemoteError;
use super::remote::{
    BodyMetricRow, DateRange, ExerciseLogRow, MealRow, NutritionRow, ProfileRow, RemoteBackend,
    WorkoutRow,
};

const PER_DAY_CONFLICT: &str = "user_id,date";

/// Talks to a PostgREST endpoint (`<server_url>/rest/v1/<table>`).
#[derive(Debug, Clone)]
pub struct RestBackend {
    server_url: String,
    api_key: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

impl RestBackend {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: api_key.into(),
            access_token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Authorizes requests as the signed-in user instead of with the API key.
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.server_url.trim_end_matches('/'),
            table
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    async fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body_length = message.len(), "Request failed");
        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, RemoteError> {
        let request = self.client.get(self.table_url(table)).query(query);
        let response = Self::check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn select_range<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<T>, RemoteError> {
        self.select(
            table,
            &[
                ("select", select.to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("date", format!("gte.{}", range.start)),
                ("date", format!("lte.{}", range.end)),
            ],
        )
        .await
    }

    /// Inserts or merges on `on_conflict`, returning the stored rows.
    async fn upsert<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        table: &str,
        body: &T,
    ) -> Result<Vec<R>, RemoteError> {
        let request = self
            .client
            .post(self.table_url(table))
            .query(&[("on_conflict", PER_DAY_CONFLICT)])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(body);
        let response = Self::check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn insert<T: Serialize + ?Sized>(&self, table: &str, body: &T) -> Result<(), RemoteError> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(body);
        Self::check(self.authorize(request).send().await?).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, filters: &[(&str, String)]) -> Result<(), RemoteError> {
        let request = self.client.delete(self.table_url(table)).query(filters);
        Self::check(self.authorize(request).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for RestBackend {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<ProfileRow>, RemoteError> {
        let rows: Vec<ProfileRow> = self
            .select(
                "profiles",
                &[("select", "*".to_string()), ("id", format!("eq.{}", user_id))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_workouts(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<WorkoutRow>, RemoteError> {
        self.select_range("workouts", "*,exercise_logs(*)", user_id, range)
            .await
    }

    async fn fetch_nutrition(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<NutritionRow>, RemoteError> {
        self.select_range("daily_nutrition", "*", user_id, range).await
    }

    async fn fetch_body_metrics(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<BodyMetricRow>, RemoteError> {
        self.select_range("body_metrics", "*", user_id, range).await
    }

    async fn fetch_meals(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<MealRow>, RemoteError> {
        self.select_range("meals", "*", user_id, range).await
    }

    async fn upsert_workout(&self, row: &WorkoutRow) -> Result<WorkoutRow, RemoteError> {
        let rows: Vec<WorkoutRow> = self.upsert("workouts", row).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode("upsert returned no workout".to_string()))
    }

    async fn delete_exercise_logs(&self, workout_id: &str) -> Result<(), RemoteError> {
        self.delete("exercise_logs", &[("workout_id", format!("eq.{}", workout_id))])
            .await
    }

    async fn insert_exercise_logs(&self, rows: &[ExerciseLogRow]) -> Result<(), RemoteError> {
        self.insert("exercise_logs", rows).await
    }

    async fn upsert_nutrition(&self, row: &NutritionRow) -> Result<(), RemoteError> {
        let _: Vec<serde_json::Value> = self.upsert("daily_nutrition", row).await?;
        Ok(())
    }

    async fn delete_meals(&self, user_id: &str, date: NaiveDate) -> Result<(), RemoteError> {
        self.delete(
            "meals",
            &[
                ("user_id", format!("eq.{}", user_id)),
                ("date", format!("eq.{}", date)),
            ],
        )
        .await
    }

    async fn insert_meals(&self, rows: &[MealRow]) -> Result<(), RemoteError> {
        self.insert("meals", rows).await
    }

    async fn upsert_body_metric(&self, row: &BodyMetricRow) -> Result<(), RemoteError> {
        let _: Vec<serde_json::Value> = self.upsert("body_metrics", row).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let backend = RestBackend::new("https://example.supabase.co/", "anon");
        assert_eq!(
            backend.table_url("workouts"),
            "https://example.supabase.co/rest/v1/workouts"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let backend = RestBackend::new("http://127.0.0.1:1", "anon");
        let range = DateRange::trailing(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), 90);

        let err = backend.fetch_nutrition("user-1", range).await.unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
    }
}
