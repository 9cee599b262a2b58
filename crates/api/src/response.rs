//! Success envelope for adforge API responses.

use serde::Serialize;

/// `{ "data": T }` wrapper returned by every catalog, brief, ad and quota
/// endpoint. Errors use the `{ "error", "code" }` body from [`crate::error`].
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
