use reqwest::{Client, Response};
use std::time::Duration;

use crate::error::{ProcessingError, Result};

const USER_AGENT: &str = concat!("sima-processor/", env!("CARGO_PKG_VERSION"));

/// Plain client for single-shot requests
pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Client that keeps cookies between requests, for endpoints that need a
/// session established by an earlier page load
pub fn session_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .cookie_store(true)
        .build()?)
}

pub fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProcessingError::HttpStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}
