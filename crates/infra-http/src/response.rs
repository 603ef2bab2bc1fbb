// Shared response handling for upstream provider calls

use reqwest::Response;
use scout_core::port::SourceError;
use serde::de::DeserializeOwned;

pub(crate) fn transport(e: reqwest::Error) -> SourceError {
    SourceError::Transport(e.to_string())
}

/// Non-2xx statuses become `SourceError::Http` carrying the response body
pub(crate) async fn check_status(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Http {
        status: status.as_u16(),
        body,
    })
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    let response = check_status(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| SourceError::Decode(e.to_string()))
}
