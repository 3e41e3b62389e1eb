//! Health check endpoint.

/// Empty 200, used by the platform and load balancers to probe the
/// service.
pub async fn status() {}
