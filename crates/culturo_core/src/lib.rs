pub mod domain;
pub mod ports;

pub use domain::{
    ActivitySummary, AnalyticsEvent, ArtifactKind, AuthClaims, LlmRequest, NewArtifact,
    PreferenceSet, StoredArtifact, TasteEntity, TasteInsights, TrendingEntity, User,
    WeatherSummary,
};
pub use ports::{
    AuthProviderService, DatabaseService, LanguageModelService, PortError, PortResult,
    TasteGraphService, WeatherService,
};
