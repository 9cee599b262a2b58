//! Product image retrieval.
//!
//! Failures here are fatal for the request: there is no retry and no
//! placeholder product.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CompositeError;

/// Largest image body accepted from a URL or data URL (20 MiB).
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Download the image at `url`. `data:` URLs with base64 payloads are
/// decoded in place. Bodies over [`MAX_IMAGE_BYTES`] are rejected.
pub async fn fetch_image_bytes(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<u8>, CompositeError> {
    fetch_image_bytes_with_limit(client, url, MAX_IMAGE_BYTES).await
}

/// [`fetch_image_bytes`] with an explicit size limit in bytes. The
/// `Content-Length` header is checked up front and the streamed total is
/// checked per chunk, so an oversized body is never fully buffered.
pub async fn fetch_image_bytes_with_limit(
    client: &reqwest::Client,
    url: &str,
    limit: usize,
) -> Result<Vec<u8>, CompositeError> {
    let too_large = || CompositeError::TooLarge {
        url: truncate_url(url),
        limit,
    };

    if let Some(rest) = url.strip_prefix("data:") {
        let bytes = decode_data_url(rest)?;
        if bytes.len() > limit {
            return Err(too_large());
        }
        return Ok(bytes);
    }

    let fetch_error = |source: reqwest::Error| CompositeError::Fetch {
        url: url.to_string(),
        source,
    };

    let mut response = client.get(url).send().await.map_err(fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(CompositeError::FetchStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(too_large());
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(fetch_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    tracing::debug!(url, size = bytes.len(), "Fetched product image");
    Ok(bytes)
}

/// Data URLs can be megabytes long; keep error messages readable.
fn truncate_url(url: &str) -> String {
    match url.char_indices().nth(64) {
        Some((end, _)) => format!("{}...", &url[..end]),
        None => url.to_string(),
    }
}

/// Decode the part of a data URL after `data:`.
fn decode_data_url(rest: &str) -> Result<Vec<u8>, CompositeError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CompositeError::DataUrl("missing ','".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(CompositeError::DataUrl(
            "only base64 data URLs are supported".to_string(),
        ));
    }
    Ok(STANDARD.decode(payload.trim())?)
}
