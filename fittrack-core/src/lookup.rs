//! Free-text meal description to macros.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Macros;

pub const CALORIE_NINJAS_URL: &str = "https://api.calorieninjas.com/v1/nutrition";

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Please describe your meal")]
    EmptyQuery,

    #[error("Nutrition API error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Nutrition API returned status {0}")]
    Status(u16),

    #[error("No nutrition data found for '{0}'")]
    NoData(String),
}

/// Estimates the macros of a meal from its description.
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn lookup(&self, description: &str) -> Result<Macros, LookupError>;
}

#[derive(Debug, Deserialize)]
struct NinjaResponse {
    #[serde(default)]
    items: Vec<NinjaItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NinjaItem {
    calories: f64,
    protein_g: f64,
    carbohydrates_total_g: f64,
    fat_total_g: f64,
}

impl NinjaResponse {
    /// Sums every item and rounds each total.
    fn totals(&self) -> Option<Macros> {
        if self.items.is_empty() {
            return None;
        }
        let sum = self.items.iter().fold(Macros::default(), |acc, item| {
            acc + Macros::new(
                item.calories,
                item.protein_g,
                item.carbohydrates_total_g,
                item.fat_total_g,
            )
        });
        Some(Macros::new(
            sum.calories.round(),
            sum.protein.round(),
            sum.carbs.round(),
            sum.fat.round(),
        ))
    }
}

/// CalorieNinjas nutrition API client.
#[derive(Debug, Clone)]
pub struct CalorieNinjasClient {
    api_key: String,
    url: String,
    client: reqwest::Client,
}

impl CalorieNinjasClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: CALORIE_NINJAS_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn request_url(&self, query: &str) -> String {
        format!("{}?query={}", self.url, urlencoding::encode(query))
    }
}

#[async_trait]
impl NutritionLookup for CalorieNinjasClient {
    async fn lookup(&self, description: &str) -> Result<Macros, LookupError> {
        let query = description.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let response = self
            .client
            .get(self.request_url(query))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Nutrition API request failed");
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: NinjaResponse = response.json().await?;
        body.totals()
            .ok_or_else(|| LookupError::NoData(query.to_string()))
    }
}

/// Plausible random macros for offline use.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockNutritionLookup;

#[async_trait]
impl NutritionLookup for MockNutritionLookup {
    async fn lookup(&self, description: &str) -> Result<Macros, LookupError> {
        if description.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        let mut rng = rand::rng();
        Ok(Macros::new(
            f64::from(rng.random_range(250..650u32)),
            f64::from(rng.random_range(20..50u32)),
            f64::from(rng.random_range(30..80u32)),
            f64::from(rng.random_range(10..30u32)),
        ))
    }
}
