//! services/api/src/adapters/taste_graph.rs
//!
//! Adapter for the Qloo-style taste-graph API. Implements the
//! `TasteGraphService` port: every response is coerced into the fixed
//! domain shapes here, so no untyped payload crosses into a vertical
//! service.

use async_trait::async_trait;
use culturo_core::domain::{TasteEntity, TasteInsights, TrendingEntity};
use culturo_core::ports::{PortError, PortResult, TasteGraphService};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// Upstream Wire Shapes
//=========================================================================================

#[derive(Debug, Deserialize)]
struct InsightsBody {
    #[serde(default)]
    results: ResultsBody,
}

#[derive(Debug, Default, Deserialize)]
struct ResultsBody {
    #[serde(default)]
    entities: Vec<EntityBody>,
}

#[derive(Debug, Deserialize)]
struct EntityBody {
    name: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    popularity: Option<f64>,
    #[serde(default)]
    properties: Option<EntityProperties>,
}

#[derive(Debug, Deserialize)]
struct EntityProperties {
    #[serde(default)]
    description: Option<String>,
}

impl EntityBody {
    fn to_domain(self, fallback_category: &str) -> TasteEntity {
        TasteEntity {
            name: self.name,
            category: self
                .subtype
                .unwrap_or_else(|| fallback_category.to_string()),
            affinity: self.popularity.unwrap_or(0.5),
            description: self.properties.and_then(|p| p.description),
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TasteGraphService` against the Qloo insights
/// API.
#[derive(Clone)]
pub struct QlooAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl QlooAdapter {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> PortResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn api_key(&self) -> PortResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PortError::Upstream("taste-graph API key not configured".to_string()))
    }

    /// Runs one insights query. Filter values go through `.query()` so
    /// reserved characters in free-text topics are escaped correctly.
    async fn fetch_entities(&self, query: &[(&str, String)]) -> PortResult<Vec<EntityBody>> {
        let response = self
            .client
            .get(format!("{}/insights/", self.base_url))
            .query(query)
            .header("x-api-key", self.api_key()?)
            .send()
            .await
            .map_err(map_reqwest)?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => {
                return Err(PortError::Upstream(
                    "taste-graph rejected credentials".to_string(),
                ))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(PortError::Upstream("taste-graph rate limit".to_string()))
            }
            status => {
                return Err(PortError::Upstream(format!(
                    "taste-graph returned status {}",
                    status
                )))
            }
        }

        let body: InsightsBody = response.json().await.map_err(map_reqwest)?;
        debug!(entities = body.results.entities.len(), "taste-graph response");
        Ok(body.results.entities)
    }
}

fn map_reqwest(err: reqwest::Error) -> PortError {
    if err.is_timeout() {
        PortError::Timeout("taste-graph call timed out".to_string())
    } else {
        PortError::Upstream(format!("taste-graph request failed: {}", err))
    }
}

//=========================================================================================
// `TasteGraphService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TasteGraphService for QlooAdapter {
    async fn taste_insights(&self, topic: &str) -> PortResult<TasteInsights> {
        let query = [
            ("filter.type", "urn:entity:place".to_string()),
            ("filter.location.query", topic.to_string()),
        ];
        let entities = self.fetch_entities(&query).await?;

        let affinity_score = if entities.is_empty() {
            0.0
        } else {
            entities.iter().filter_map(|e| e.popularity).sum::<f64>()
                / entities.len() as f64
        };
        let related_topics = entities.iter().take(3).map(|e| e.name.clone()).collect();

        Ok(TasteInsights {
            topic: topic.to_string(),
            affinity_score,
            related_topics,
            entities: entities
                .into_iter()
                .take(5)
                .map(|e| e.to_domain("place"))
                .collect(),
        })
    }

    async fn place_recommendations(
        &self,
        destination: &str,
        interests: &[String],
    ) -> PortResult<Vec<TasteEntity>> {
        let mut query = vec![
            ("filter.type", "urn:entity:place".to_string()),
            ("filter.location.query", destination.to_string()),
        ];
        if !interests.is_empty() {
            query.push(("filter.tags", interests.join(",")));
        }
        let entities = self.fetch_entities(&query).await?;
        Ok(entities
            .into_iter()
            .take(10)
            .map(|e| e.to_domain("place"))
            .collect())
    }

    async fn trending(&self, category: &str) -> PortResult<Vec<TrendingEntity>> {
        let query = [
            ("filter.type", format!("urn:entity:{}", category)),
            ("sort_by", "trending".to_string()),
        ];
        let entities = self.fetch_entities(&query).await?;
        Ok(entities
            .into_iter()
            .take(10)
            .map(|e| {
                let score = e.popularity.unwrap_or(0.5);
                TrendingEntity {
                    name: e.name,
                    category: e.subtype.unwrap_or_else(|| category.to_string()),
                    trend_score: score,
                    momentum: if score >= 0.6 { "rising" } else { "stable" }.to_string(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_body_coerces_to_domain() {
        let body: InsightsBody = serde_json::from_str(
            r#"{
                "success": true,
                "results": {
                    "entities": [
                        {"name": "Fado house", "subtype": "urn:entity:place", "popularity": 0.82,
                         "properties": {"description": "Traditional music venue"}},
                        {"name": "Mercado da Ribeira"}
                    ]
                }
            }"#,
        )
        .unwrap();

        let entities: Vec<TasteEntity> = body
            .results
            .entities
            .into_iter()
            .map(|e| e.to_domain("place"))
            .collect();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].name, "Fado house");
        assert_eq!(entities[0].affinity, 0.82);
        assert_eq!(entities[1].category, "place");
        assert_eq!(entities[1].affinity, 0.5);
    }

    #[test]
    fn reserved_characters_in_topics_are_escaped() {
        let request = Client::new()
            .get("http://unused/insights/")
            .query(&[("filter.location.query", "New York & Co 100%")])
            .build()
            .unwrap();
        assert_eq!(
            request.url().query(),
            Some("filter.location.query=New+York+%26+Co+100%25")
        );
    }
}
