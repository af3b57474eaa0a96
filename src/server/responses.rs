use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::encode::EncodeError;
use crate::feed::ExtractError;
use crate::fetch::FetchError;

#[derive(Debug, Clone, Copy)]
pub struct MethodNotAllowed;

impl IntoResponse for MethodNotAllowed {
    fn into_response(self) -> Response {
        IntoResponse::into_response((
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, OPTIONS")],
            "Método não permitido",
        ))
    }
}

/// A failure while producing the feed, reported to the client as a 500.
#[derive(Debug, Error)]
pub enum FeedFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl IntoResponse for FeedFailure {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Fetch(e) => format!("Erro ao buscar o feed do podcast: {e}"),
            Self::Extract(e) => format!("Erro ao analisar os dados do podcast: {e}"),
            Self::Encode(_) => "Erro ao gerar JSON".into(),
        };

        IntoResponse::into_response((StatusCode::INTERNAL_SERVER_ERROR, message))
    }
}
