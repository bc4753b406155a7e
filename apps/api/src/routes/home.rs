use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// GET /
/// Serves the upload form.
pub async fn home_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
