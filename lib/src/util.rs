pub mod secret;
pub mod tokio;
