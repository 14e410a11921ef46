pub mod clerk;
pub mod db;
pub mod llm;
pub mod taste_graph;
pub mod weather;

pub use clerk::ClerkAdapter;
pub use db::DbAdapter;
pub use llm::OpenAiLlmAdapter;
pub use taste_graph::QlooAdapter;
pub use weather::OpenWeatherAdapter;
