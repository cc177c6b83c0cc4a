use axum::body;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;

/// Reads the whole response body and parses it as JSON into the requested type. Panics (failing
/// the test) if the body can't be read or doesn't match.
pub async fn deserialize_body<T: DeserializeOwned>(response_body: body::Body) -> T {
    let bytes = body::to_bytes(response_body, usize::MAX)
        .await
        .expect("Could not read data from response body!");

    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!(
            "Could not parse body content into data structure! Error: {}, Received body: {:?}",
            err, bytes
        )
    })
}

/// Turns a handler's return value into a real response, then hands back its status and parsed body
pub async fn status_and_body<T: DeserializeOwned>(
    handler_output: impl IntoResponse,
) -> (StatusCode, T) {
    let response = handler_output.into_response();
    let status = response.status();

    (status, deserialize_body(response.into_body()).await)
}
