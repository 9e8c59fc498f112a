pub mod caption_fetcher;
pub mod enumerator;
pub mod orchestrator;
pub mod preferences;
pub mod result_writer;
pub mod search_service;
pub mod youtube_api;
