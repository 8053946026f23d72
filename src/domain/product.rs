use serde::{Deserialize, Serialize};

/// One selectable value inside an option group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub id: String,
    pub value: String,
}

/// A configurable option group of a product (e.g. "Skin type").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionValue>,
}

impl ProductOption {
    /// First selectable value, shown as the default choice.
    pub fn first_value(&self) -> Option<&str> {
        self.options.first().map(|o| o.value.as_str())
    }
}

/// A catalog entry. Prices are denominated in the currency the catalog was
/// queried with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    #[serde(default)]
    pub product_options: Vec<ProductOption>,
}

impl Product {
    /// Products with more than one option group go through personalization
    /// before they are added to the cart.
    pub fn requires_personalization(&self) -> bool {
        self.product_options.len() > 1
    }
}

/// Format an amount for display, e.g. `USD 2,500.00`.
pub fn format_price(amount: f64, currency: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{} {}{}.{:02}", currency, sign, grouped, fraction)
}
