/// Homepage
///
/// Serves a static single-page client compiled into the binary. The page
/// talks to the JSON API from the browser; nothing is rendered server-side.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// `GET /`
pub async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}
