use crate::domain::model::{CurationResult, LinkRef, ProductSuggestion};
use crate::utils::error::SanitizeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// 長度上限以 Unicode 字元 (char) 計算，不是 UTF-16 code unit 或 byte
pub const MAX_TITLE_CHARS: usize = 120;
pub const MAX_WHY_CHARS: usize = 300;
pub const MAX_PRICE_NOTE_CHARS: usize = 60;
pub const MAX_LABEL_CHARS: usize = 30;
pub const MAX_URL_CHARS: usize = 400;
pub const PERMISSIVE_MAX_LINKS: usize = 4;

const ALLOWED_LINK_PREFIX: &str = "https://";
const DEFAULT_LINK_LABEL: &str = "Shop now";

/// How many generated links each suggestion may keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPolicy {
    /// One retailer link per suggestion.
    #[default]
    Strict,
    /// Up to [`PERMISSIVE_MAX_LINKS`].
    Permissive,
}

impl LinkPolicy {
    pub fn max_links(self) -> usize {
        match self {
            LinkPolicy::Strict => 1,
            LinkPolicy::Permissive => PERMISSIVE_MAX_LINKS,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(LinkPolicy::Strict),
            "permissive" => Some(LinkPolicy::Permissive),
            _ => None,
        }
    }
}

/// Turns untrusted generator text into a bounded [`CurationResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer {
    link_policy: LinkPolicy,
}

impl Sanitizer {
    pub fn new(link_policy: LinkPolicy) -> Self {
        Self { link_policy }
    }

    /// Unwrap, parse, shape-check, then normalize every item.
    ///
    /// Items are never dropped: a malformed item becomes a suggestion with
    /// empty fields so the caller's numbering stays stable.
    pub fn sanitize(&self, raw_output: &str) -> Result<CurationResult, SanitizeError> {
        let unwrapped = unwrap_code_fence(raw_output);

        let parsed: Value =
            serde_json::from_str(unwrapped).map_err(|source| SanitizeError::NotJson {
                source,
                raw: unwrapped.to_string(),
            })?;

        let items = parsed
            .get("products")
            .and_then(Value::as_array)
            .ok_or(SanitizeError::MissingProductsArray)?;

        let products = items.iter().map(|item| self.normalize_item(item)).collect();
        Ok(CurationResult { products })
    }

    fn normalize_item(&self, item: &Value) -> ProductSuggestion {
        ProductSuggestion {
            title: clamp(&coerce_text(item.get("title"), ""), MAX_TITLE_CHARS),
            why: clamp(&coerce_text(item.get("why"), ""), MAX_WHY_CHARS),
            price_note: clamp(&coerce_text(item.get("price_note"), ""), MAX_PRICE_NOTE_CHARS),
            links: self.normalize_links(item.get("links")),
        }
    }

    fn normalize_links(&self, links: Option<&Value>) -> Vec<LinkRef> {
        let Some(entries) = links.and_then(Value::as_array) else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| {
                let url = entry.get("url").and_then(Value::as_str)?;
                if !url.starts_with(ALLOWED_LINK_PREFIX) {
                    return None;
                }
                Some(LinkRef {
                    label: clamp(
                        &coerce_text(entry.get("label"), DEFAULT_LINK_LABEL),
                        MAX_LABEL_CHARS,
                    ),
                    url: clamp(url, MAX_URL_CHARS),
                })
            })
            .take(self.link_policy.max_links())
            .collect()
    }
}

/// Strips surrounding ```` ``` ```` / ```` ```json ```` fences and whitespace,
/// layer by layer until none is left. Text without a fence comes back trimmed.
pub fn unwrap_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    loop {
        let inner = strip_fence_layer(body);
        if inner.len() == body.len() {
            return body;
        }
        body = inner;
    }
}

fn strip_fence_layer(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Scalar values become text; null, false, compound values and absent
/// fields fall back to `default`, as does an empty string.
fn coerce_text(value: Option<&Value>, default: &str) -> String {
    let text = match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    };
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

fn clamp(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
