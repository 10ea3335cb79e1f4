use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs method, path and status for every request. Query strings carry
/// access codes and are left out.
pub async fn request_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = std::time::Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "http_request"
    );

    response
}
