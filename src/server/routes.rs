use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::encode::{self, Compression, ContentEncoding};
use crate::feed;
use crate::state::State as AppState;

use super::responses::{FeedFailure, MethodNotAllowed};

pub async fn podcast(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    match method {
        Method::OPTIONS => StatusCode::OK.into_response(),

        Method::GET => match get_podcast(&state, &headers).await {
            Ok(response) => response,

            Err(e) => {
                error!("Could not serve the podcast feed: {e}");

                e.into_response()
            }
        },

        _ => MethodNotAllowed.into_response(),
    }
}

async fn get_podcast(state: &AppState, headers: &HeaderMap) -> Result<Response, FeedFailure> {
    let xml = state.fetcher.fetch().await?;
    let items = feed::parse(&xml, state.cfg.on_malformed_item)?;

    let encoding = ContentEncoding::negotiate(state.cfg.compression, headers);
    let body = encode::encode_items(&items, encoding)?;
    debug!(count = items.len(), ?encoding, "Serving the podcast feed");

    let mut response = ([(header::CONTENT_TYPE, "application/json")], body).into_response();
    let response_headers = response.headers_mut();

    if let Some(coding) = encoding.header_value() {
        response_headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static(coding));
    }

    if state.cfg.compression == Compression::Negotiate {
        response_headers.insert(header::VARY, HeaderValue::from_static("accept-encoding"));
    }

    Ok(response)
}
