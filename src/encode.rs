use std::io;

use axum::http::{header, HeaderMap};
use flate2::write::GzEncoder;
use serde::Deserialize;
use thiserror::Error;

use crate::feed::FeedItem;

/// When to gzip the response body.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Compression {
    /// Gzip only if the client lists `gzip` in `Accept-Encoding`.
    #[default]
    Negotiate,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
}

impl ContentEncoding {
    pub fn negotiate(mode: Compression, headers: &HeaderMap) -> Self {
        match mode {
            Compression::Always => Self::Gzip,
            Compression::Never => Self::Identity,

            Compression::Negotiate => {
                let wants_gzip = headers
                    .get_all(header::ACCEPT_ENCODING)
                    .iter()
                    .filter_map(|value| value.to_str().ok())
                    .flat_map(|value| value.split(','))
                    .any(accepts_gzip);

                if wants_gzip {
                    Self::Gzip
                } else {
                    Self::Identity
                }
            }
        }
    }

    pub fn header_value(self) -> Option<&'static str> {
        match self {
            Self::Identity => None,
            Self::Gzip => Some("gzip"),
        }
    }
}

// `gzip;q=0` explicitly refuses the coding.
fn accepts_gzip(coding: &str) -> bool {
    let mut parts = coding.split(';').map(str::trim);

    if !parts
        .next()
        .is_some_and(|name| name.eq_ignore_ascii_case("gzip"))
    {
        return false;
    }

    !parts.any(|param| {
        param
            .split_once('=')
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
            .and_then(|(_, q)| q.trim().parse::<f32>().ok())
            .is_some_and(|q| q == 0.0)
    })
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("could not serialize the feed items: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not compress the response body: {0}")]
    Compress(#[from] io::Error),
}

/// Serializes the items as a compact JSON array, gzipped if requested.
pub fn encode_items(items: &[FeedItem], encoding: ContentEncoding) -> Result<Vec<u8>, EncodeError> {
    match encoding {
        ContentEncoding::Identity => Ok(serde_json::to_vec(items)?),

        ContentEncoding::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            serde_json::to_writer(&mut encoder, items)?;

            Ok(encoder.finish()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use axum::http::HeaderValue;
    use flate2::read::GzDecoder;
    use pretty_assertions::assert_eq;

    use super::*;

    fn headers(accept_encoding: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_ENCODING,
            HeaderValue::from_str(accept_encoding).unwrap(),
        );

        headers
    }

    fn items() -> Vec<FeedItem> {
        vec![FeedItem {
            title: "Ep 1".into(),
            enclosure_url: "http://x/a.mp3".into(),
            image_url: "Imagem indisponível".into(),
        }]
    }

    #[test]
    fn negotiates_gzip_from_accept_encoding() {
        let negotiate = |value| ContentEncoding::negotiate(Compression::Negotiate, &headers(value));

        assert_eq!(negotiate("gzip"), ContentEncoding::Gzip);
        assert_eq!(negotiate("deflate, GZIP;q=0.5, br"), ContentEncoding::Gzip);
        assert_eq!(negotiate("deflate, br"), ContentEncoding::Identity);
        assert_eq!(negotiate("gzip;q=0"), ContentEncoding::Identity);
        assert_eq!(negotiate("x-gzip"), ContentEncoding::Identity);
    }

    #[test]
    fn missing_header_means_identity() {
        assert_eq!(
            ContentEncoding::negotiate(Compression::Negotiate, &HeaderMap::new()),
            ContentEncoding::Identity
        );
    }

    #[test]
    fn fixed_modes_ignore_headers() {
        assert_eq!(
            ContentEncoding::negotiate(Compression::Always, &HeaderMap::new()),
            ContentEncoding::Gzip
        );
        assert_eq!(
            ContentEncoding::negotiate(Compression::Never, &headers("gzip")),
            ContentEncoding::Identity
        );
    }

    #[test]
    fn identity_body_is_compact_json() {
        let body = encode_items(&items(), ContentEncoding::Identity).unwrap();

        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"[{"title":"Ep 1","enclosureUrl":"http://x/a.mp3","imageUrl":"Imagem indisponível"}]"#
        );
    }

    #[test]
    fn gzip_body_decompresses_to_identity_body() {
        let plain = encode_items(&items(), ContentEncoding::Identity).unwrap();
        let compressed = encode_items(&items(), ContentEncoding::Gzip).unwrap();

        let mut decompressed = vec![];
        GzDecoder::new(&compressed[..])
            .read_to_end(&mut decompressed)
            .unwrap();

        assert_eq!(decompressed, plain);
    }

    #[test]
    fn empty_list_is_an_empty_array() {
        let body = encode_items(&[], ContentEncoding::Identity).unwrap();

        assert_eq!(body, b"[]");
    }
}
