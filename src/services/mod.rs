pub mod analysis_service;
pub mod auth_service;
pub mod event_service;
pub mod llm_service;
pub mod news_service;
pub mod quote_service;
pub mod windowing;
