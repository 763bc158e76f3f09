//! Products

use std::{cmp::Ordering, fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Image shown for products the backend sent without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/100x100?text=Pas+d'image";

/// Shown in place of a price the backend did not send.
pub const MISSING_PRICE: &str = "—";

/// Product identifier as sent by the backend.
///
/// The backend may send the identifier as a JSON number or a string. The raw
/// text is kept for display; the numeric value, when there is one, drives
/// ordering. A missing or null identifier is empty and sorts last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductId {
    raw: String,
    numeric: Option<Decimal>,
}

impl ProductId {
    /// Creates an identifier from its textual form.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let numeric = Decimal::from_str(raw.trim()).ok();

        Self { raw, numeric }
    }

    /// Numeric value of the identifier, if it has one.
    pub fn numeric(&self) -> Option<Decimal> {
        self.numeric
    }

    /// Orders identifiers newest first: numerically descending, with
    /// non-numeric identifiers after every numeric one.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        match (self.numeric, other.numeric) {
            (Some(left), Some(right)) => right.cmp(&left),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self {
            raw: value.to_string(),
            numeric: Some(Decimal::from(value)),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => Ok(Self::new(number.to_string())),
            Value::String(text) => Ok(Self::new(text)),
            Value::Null => Ok(Self::default()),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or string product id, found {other}"
            ))),
        }
    }
}

/// Product, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Product identifier
    #[serde(default)]
    pub id: ProductId,

    /// Product title
    #[serde(rename = "titre", default)]
    pub title: Option<String>,

    /// Product description
    #[serde(rename = "contenu", default)]
    pub description: Option<String>,

    /// Product price
    #[serde(rename = "prix", default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,

    /// Product category, free text owned by the backend
    #[serde(rename = "categorie", default)]
    pub category: Option<String>,

    /// Product image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Stock balance, managed by the backend
    #[serde(rename = "solde", default, deserialize_with = "lenient_decimal")]
    pub balance: Option<Decimal>,
}

impl Product {
    /// Creates a product with only an identifier and a title.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: ProductId::from(id),
            title: Some(title.into()),
            description: None,
            price: None,
            category: None,
            image: None,
            balance: None,
        }
    }

    /// Product title, empty when absent.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Product description, empty when absent.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Product category, empty when absent.
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    /// Image URL to render, falling back to the placeholder.
    pub fn image_url(&self) -> &str {
        self.image
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    /// Price rendered with two decimals, or [`MISSING_PRICE`].
    pub fn display_price(&self) -> String {
        self.price
            .map_or_else(|| MISSING_PRICE.to_string(), format_price)
    }

    /// Whether `needle` occurs in the title, category or description.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.title, &self.category, &self.description]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Format a price with two decimals and the euro sign.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    format!("{rounded:.2} €")
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::Number(number)) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .ok(),
        Some(Value::String(text)) => Decimal::from_str(text.trim()).ok(),
        _ => None,
    })
}

/// Categories offered when creating a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Fitness equipment
    Fitness,

    /// Running gear
    Running,

    /// Sport bags
    SportBag,
}

impl Category {
    /// Every category, in the order the form offers them.
    pub const ALL: [Category; 3] = [Category::Fitness, Category::Running, Category::SportBag];

    /// Value sent to the backend.
    pub fn wire_value(self) -> &'static str {
        match self {
            Category::Fitness => "Fitness",
            Category::Running => "Running",
            Category::SportBag => "Sport",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Fitness => "Fitness",
            Category::Running => "Running",
            Category::SportBag => "Sac de sport",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when text names no known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}' (expected Fitness, Running or Sport)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        Category::ALL
            .into_iter()
            .find(|category| {
                category.wire_value().eq_ignore_ascii_case(value)
                    || category.label().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}
