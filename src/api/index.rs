use axum::response::Html;

/// Serves the single-page front end, which drives the JSON API from the browser
pub async fn index_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
