//! Extraction of podcast episodes from an RSS document.

use serde::{Deserialize, Serialize};
use sxd_document::dom::{ChildOfElement, Element};
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value};
use thiserror::Error;
use tracing::warn;

/// Substituted for `imageUrl` when an item has no artwork.
pub const IMAGE_UNAVAILABLE: &str = "Imagem indisponível";

const ITUNES_XMLNS_URI: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
const ITEM_XPATH: &str = "//item";

/// One episode of the podcast, serialized as-is into the response.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: String,
    pub enclosure_url: String,
    pub image_url: String,
}

/// What to do with an item that lacks a usable enclosure.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedItemPolicy {
    /// Reject the whole feed.
    #[default]
    Fail,

    /// Drop the item and keep going.
    Skip,
}

#[derive(Debug, Error)]
#[error("the document is not well-formed XML: {0}")]
pub struct ParseError(String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("item #{index} has no {missing}")]
pub struct MalformedItemError {
    /// 1-based position of the item among all `<item>` elements.
    pub index: usize,
    pub missing: &'static str,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("could not select the feed items: {0}")]
    Select(String),

    #[error(transparent)]
    MalformedItem(#[from] MalformedItemError),
}

pub fn parse(xml: &str, policy: MalformedItemPolicy) -> Result<Vec<FeedItem>, ExtractError> {
    let package = sxd_document::parser::parse(xml).map_err(|e| ParseError(e.to_string()))?;
    let document = package.as_document();

    let xpath = Factory::new()
        .build(ITEM_XPATH)
        .map_err(|e| ExtractError::Select(e.to_string()))?
        .ok_or_else(|| ExtractError::Select("no XPath expression was parsed".into()))?;
    let items = match xpath
        .evaluate(&Context::new(), document.root())
        .map_err(|e| ExtractError::Select(e.to_string()))?
    {
        Value::Nodeset(nodes) => nodes,
        _ => return Err(ExtractError::Select("expected a node set".into())),
    };

    let mut result = vec![];

    for (idx, node) in items.document_order().into_iter().enumerate() {
        let Node::Element(element) = node else {
            continue;
        };

        match extract_item(idx + 1, element) {
            Ok(item) => result.push(item),

            Err(e) => match policy {
                MalformedItemPolicy::Fail => return Err(e.into()),

                MalformedItemPolicy::Skip => {
                    warn!("Skipping a malformed feed item: {e}");
                }
            },
        }
    }

    Ok(result)
}

pub fn extract_item(index: usize, item: Element<'_>) -> Result<FeedItem, MalformedItemError> {
    let title = child(item, Namespace::Empty, "title")
        .map(|title| Node::Element(title).string_value())
        .unwrap_or_default();

    let enclosure = child(item, Namespace::Empty, "enclosure").ok_or(MalformedItemError {
        index,
        missing: "enclosure",
    })?;
    let enclosure_url = url_attribute(enclosure, &["url", "href"]).ok_or(MalformedItemError {
        index,
        missing: "enclosure URL",
    })?;

    let image_url = child(item, Namespace::Itunes, "image")
        .and_then(|image| url_attribute(image, &["href", "url"]))
        .unwrap_or_else(|| IMAGE_UNAVAILABLE.into());

    Ok(FeedItem {
        title,
        enclosure_url,
        image_url,
    })
}

#[derive(Debug, Clone, Copy)]
enum Namespace {
    Empty,
    Itunes,
}

impl Namespace {
    fn matches(self, uri: Option<&str>) -> bool {
        match self {
            Self::Empty => uri.is_none(),

            // some feeds declare the iTunes namespace with a differently-cased URI
            Self::Itunes => uri.is_some_and(|uri| uri.eq_ignore_ascii_case(ITUNES_XMLNS_URI)),
        }
    }
}

fn child<'d>(parent: Element<'d>, ns: Namespace, local: &str) -> Option<Element<'d>> {
    parent.children().into_iter().find_map(|child| match child {
        ChildOfElement::Element(element)
            if ns.matches(element.name().namespace_uri()) && element.name().local_part() == local =>
        {
            Some(element)
        }

        _ => None,
    })
}

/// Looks up the first of `names` present on the element.
///
/// Otherwise falls back to the attribute with the smallest name; sxd-document does not keep
/// attributes in document order.
fn url_attribute(element: Element<'_>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|&name| element.attribute_value(name))
        .or_else(|| {
            element
                .attributes()
                .into_iter()
                .min_by_key(|attr| (attr.name().namespace_uri(), attr.name().local_part()))
                .map(|attr| attr.value())
        })
        .map(Into::into)
}
