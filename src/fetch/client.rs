use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes HTTP requests for remote trip data.
///
/// Kept behind a trait so tests and alternative transports can stand in for
/// the reqwest client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
