//! Request and response helpers shared by the REST clients.

use serde::de::DeserializeOwned;

use crate::error::ProviderError;

/// Return the response unchanged on a 2xx status, or an
/// [`ProviderError::Api`] carrying the status and body text.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let response = ensure_success(provider, response).await?;
    Ok(response.json::<T>().await?)
}

/// MIME type and file extension of an encoded image, sniffed from its
/// magic bytes. Unrecognized data is labelled PNG.
pub(crate) fn sniff_image(bytes: &[u8]) -> (&'static str, &'static str) {
    match image::guess_format(bytes) {
        Ok(format) => (
            format.to_mime_type(),
            format.extensions_str().first().copied().unwrap_or("png"),
        ),
        Err(_) => ("image/png", "png"),
    }
}
