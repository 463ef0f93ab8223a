//! Response helpers shared by the vendor clients.

use crate::error::MediaError;

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`MediaError::Api`] containing the status and
/// body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, MediaError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(MediaError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
