//! services/api/src/web/state.rs
//!
//! Defines the application's shared state, created once at startup and
//! handed to every handler.

use crate::config::Config;
use crate::services::analytics::AnalyticsService;
use crate::services::food::FoodService;
use crate::services::recommendations::RecommendationService;
use crate::services::story::StoryService;
use crate::services::travel::TravelService;
use culturo_core::ports::{
    AuthProviderService, DatabaseService, LanguageModelService, TasteGraphService, WeatherService,
};
use std::sync::Arc;

/// The shared application state. Handlers receive it as `Arc<AppState>`.
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseService>,
    pub auth: Arc<dyn AuthProviderService>,
    pub stories: StoryService,
    pub food: FoodService,
    pub travel: TravelService,
    pub recommendations: RecommendationService,
    pub analytics: AnalyticsService,
}

impl AppState {
    /// Wires the vertical services from the shared port implementations.
    /// The weather port is optional; travel plans simply omit the outlook
    /// when it is absent.
    pub fn new(
        config: Arc<Config>,
        db: Arc<dyn DatabaseService>,
        taste: Arc<dyn TasteGraphService>,
        llm: Arc<dyn LanguageModelService>,
        weather: Option<Arc<dyn WeatherService>>,
        auth: Arc<dyn AuthProviderService>,
    ) -> Self {
        let stories = StoryService::new(db.clone(), taste.clone(), llm.clone());
        let food = FoodService::new(db.clone(), taste.clone(), llm.clone());
        let travel = TravelService::new(
            db.clone(),
            taste.clone(),
            llm.clone(),
            weather,
            config.travel_plan_budget,
        );
        let recommendations = RecommendationService::new(db.clone(), taste, llm);
        let analytics = AnalyticsService::new(db.clone());

        Self {
            config,
            db,
            auth,
            stories,
            food,
            travel,
            recommendations,
            analytics,
        }
    }
}
