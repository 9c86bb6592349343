//! Canned "AI" responder for marketing copy and launch strategies.
//!
//! There is no model behind this: [`generate`] is a lookup into a fixed
//! template registry with context substitution. It backs the `/wave-ai`
//! HTTP endpoint and the `wave ai` command.
//!
//! - `copy` requests pick a template by [`CopyType`] (unknown types fall back
//!   to the headline) and fill in the product context.
//! - `strategy` requests return one of three plans chosen uniformly at random.

pub mod client;
pub mod templates;

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use templates::{ADS, CHECKOUT, EMAIL, HEADLINE, LANDING, STRATEGIES, VSL};

const DEFAULT_NAME: &str = "Seu Produto";
const DEFAULT_DESCRIPTION: &str = "um produto de alta qualidade";
const DEFAULT_PRICE: &str = "R$ 497";
const DEFAULT_TARGET: &str = "empreendedores digitais";
const DEFAULT_PRICE_VALUE: f64 = 497.0;
const INSTALLMENTS: f64 = 12.0;

// ---------------------------------------------------------------------------
// Request / response wire types
// ---------------------------------------------------------------------------

/// Body of `POST /wave-ai`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRequest {
    /// Free-form question. Accepted for compatibility, not used by templates.
    #[serde(default)]
    pub prompt: String,
    /// `"copy"` or `"strategy"`; anything else is treated as strategy.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ProductContext>,
}

impl AiRequest {
    pub fn category(&self) -> AiCategory {
        AiCategory::from_wire(&self.kind)
    }
}

/// Product fields substituted into copy templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Body returned by `POST /wave-ai`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AiResponse {
    pub fn ok(response: String) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiCategory {
    Copy,
    Strategy,
}

impl AiCategory {
    /// Only an exact `"copy"` selects copy; every other value is strategy.
    pub fn from_wire(value: &str) -> Self {
        if value == "copy" {
            Self::Copy
        } else {
            Self::Strategy
        }
    }
}

impl std::fmt::Display for AiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Strategy => write!(f, "strategy"),
        }
    }
}

/// Kinds of marketing copy with a dedicated template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyType {
    Headline,
    Email,
    Vsl,
    Landing,
    Ads,
    Checkout,
}

impl CopyType {
    pub const ALL: [CopyType; 6] = [
        Self::Headline,
        Self::Email,
        Self::Vsl,
        Self::Landing,
        Self::Ads,
        Self::Checkout,
    ];

    /// Parse a copy type name; unknown or missing names give [`CopyType::Headline`].
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("email") => Self::Email,
            Some("vsl") => Self::Vsl,
            Some("landing") => Self::Landing,
            Some("ads") => Self::Ads,
            Some("checkout") => Self::Checkout,
            _ => Self::Headline,
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Headline => HEADLINE,
            Self::Email => EMAIL,
            Self::Vsl => VSL,
            Self::Landing => LANDING,
            Self::Ads => ADS,
            Self::Checkout => CHECKOUT,
        }
    }
}

impl std::fmt::Display for CopyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Headline => write!(f, "headline"),
            Self::Email => write!(f, "email"),
            Self::Vsl => write!(f, "vsl"),
            Self::Landing => write!(f, "landing"),
            Self::Ads => write!(f, "ads"),
            Self::Checkout => write!(f, "checkout"),
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Answer a request. Total: every input yields a non-empty string.
pub fn respond<R: Rng + ?Sized>(request: &AiRequest, rng: &mut R) -> String {
    generate(
        request.category(),
        request.copy_type.as_deref(),
        request.context.as_ref(),
        rng,
    )
}

/// `(category, copy type, context) -> text`. The RNG is only drawn from for
/// strategy requests.
pub fn generate<R: Rng + ?Sized>(
    category: AiCategory,
    copy_type: Option<&str>,
    context: Option<&ProductContext>,
    rng: &mut R,
) -> String {
    match category {
        AiCategory::Copy => generate_copy(CopyType::parse(copy_type), context),
        AiCategory::Strategy => generate_strategy(rng),
    }
}

/// Fill the template for `copy_type` with the product context.
pub fn generate_copy(copy_type: CopyType, context: Option<&ProductContext>) -> String {
    let name = field_or(context.and_then(|c| c.name.as_ref()), DEFAULT_NAME);
    let description = field_or(context.and_then(|c| c.description.as_ref()), DEFAULT_DESCRIPTION);
    let price = field_or(context.and_then(|c| c.price.as_ref()), DEFAULT_PRICE);
    let target = field_or(context.and_then(|c| c.target.as_ref()), DEFAULT_TARGET);

    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("installment", installment(&price));
    values.insert("target_capitalized", capitalize_first(&target));
    values.insert("name", name);
    values.insert("description", description);
    values.insert("price", price);
    values.insert("target", target);

    templates::render(copy_type.template(), &values)
}

/// Pick one of the strategy plans uniformly at random.
pub fn generate_strategy<R: Rng + ?Sized>(rng: &mut R) -> String {
    STRATEGIES[rng.gen_range(0..STRATEGIES.len())].render()
}

/// Monthly value of a 12x installment plan for a free-text price.
///
/// Every digit in the price is kept (so `R$ 1.997,00` reads as 199700),
/// however many there are; a price without digits, with only zeros, or too
/// long to be finite counts as 497.
fn installment(price: &str) -> String {
    let digits: String = price.chars().filter(char::is_ascii_digit).collect();
    let value = digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(DEFAULT_PRICE_VALUE);
    format!("{:.0}", (value / INSTALLMENTS).round())
}

/// A supplied, non-empty field or its default.
fn field_or(value: Option<&String>, default: &str) -> String {
    value
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
