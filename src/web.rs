use axum::response::Html;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health() -> &'static str {
    "Pixel Music is alive and ready for streaming!"
}
