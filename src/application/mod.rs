// Application layer - Use cases and the ports they depend on
pub mod comparison_service;
pub mod dashboard_api;
pub mod dashboard_service;
pub mod errors;
pub mod insight_service;
pub mod notifications;
pub mod report_service;
pub mod session_service;
pub mod token_store;
pub mod upload_service;

#[cfg(test)]
pub mod test_support;
