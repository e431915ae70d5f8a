//! Transport trait.

use async_trait::async_trait;

use crate::Result;
use crate::wire::{ApiRequest, ApiResponse};

/// Something that can carry an [`ApiRequest`] to the service.
///
/// Implementations attach whatever ambient credential they hold (a cookie
/// jar for the HTTP transport). Any status code, including 401, is a
/// successful `execute`; `Err` means no response arrived at all.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send one request and return the response as received.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).execute(request).await
    }
}
