//! Allowlist sanitizer for user-authored rich text.
//!
//! Every template injects description markup through [`sanitize_rich_text`].
//! Executable content is removed with its children, unknown elements are
//! unwrapped, and only `href` survives as an attribute (on links, and only
//! for http(s), mailto, tel, fragment or relative targets).

use std::collections::{HashMap, HashSet};

use ammonia::{Builder, UrlRelative};
use url::Url;

const ALLOWED_ELEMENTS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i",
    "li", "mark", "ol", "p", "pre", "s", "strike", "strong", "sub", "sup", "u", "ul",
];

/// Removed together with everything inside them.
const FORBIDDEN_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "svg", "math",
    "form", "textarea", "select", "button", "frame", "frameset", "link", "meta", "base",
];

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

const LINK_REL: &str = "noopener noreferrer";

pub fn sanitize_rich_text(input: &str) -> String {
    let mut builder = Builder::empty();
    builder
        .tags(ALLOWED_ELEMENTS.iter().copied().collect())
        .clean_content_tags(FORBIDDEN_ELEMENTS.iter().copied().collect())
        .tag_attributes(HashMap::from([("a", HashSet::from(["href"]))]))
        .url_schemes(SAFE_SCHEMES.iter().copied().collect())
        .url_relative(UrlRelative::PassThrough)
        .link_rel(Some(LINK_REL));
    builder.clean(input).to_string()
}

/// Rejects `javascript:`, `data:`, `vbscript:` and any other scheme outside
/// the allowlist. Tabs and newlines inside the scheme are stripped before
/// it is read, as browsers do.
pub fn is_safe_url(href: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => SAFE_SCHEMES.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
