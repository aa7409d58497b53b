//! Catalog variant normalization
//!
//! Admin consoles submit variant/option structures in whatever shape their
//! forms produce, so the numeric fields arrive as numbers, strings, nulls or
//! nothing at all. Normalization trims every string, coerces the numbers and
//! derives the two aggregate fields stored on the product:
//!
//! - `priceUSD`: the minimum finite, non-negative option price across all
//!   variants. A product's advertised price is its cheapest purchasable
//!   option, not an average or the first-listed one. Undefined when no
//!   option has a usable price.
//! - `stockTotal`: the sum of all option stocks, counting unusable stock
//!   values as 0. Always defined.
//!
//! Coercion is lenient and never fails the request: a junk price is
//! excluded from the minimum rather than counted as 0, while a null price
//! and a bad stock both count as 0.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Variant as submitted. Numeric fields accept any JSON value, and the two
/// fields parse independently: a junk `label` or a non-array `options`
/// reads as the default for that field alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantInput {
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: Option<VariantLabelInput>,
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Vec<VariantOptionInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantLabelInput {
    #[serde(default)]
    pub es: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantOptionInput {
    #[serde(default)]
    pub value: Option<String>,
    /// `None` only when the field is absent; a submitted `null` arrives as
    /// `Some(Value::Null)` and coerces to 0.
    #[serde(default, rename = "priceUSD", deserialize_with = "present_value")]
    pub price_usd: Option<Value>,
    #[serde(default)]
    pub stock: Option<Value>,
}

/// Keeps a submitted `null` distinguishable from an absent field: absence
/// hits the field default, any present value lands as `Some`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A label that does not parse reads as absent; the options still parse.
fn lenient_label<'de, D>(deserializer: D) -> Result<Option<VariantLabelInput>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// Anything but an array reads as no options, and an element that is not
/// an option object reads as an empty option. The label still parses.
fn lenient_options<'de, D>(deserializer: D) -> Result<Vec<VariantOptionInput>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let Value::Array(items) = raw else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Canonical variant written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub label: VariantLabel,
    pub options: Vec<VariantOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantLabel {
    pub es: String,
    pub en: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantOption {
    pub value: String,
    /// Omitted entirely when the submitted price does not coerce to a
    /// finite number; JSON has no NaN to carry it.
    #[serde(default, rename = "priceUSD", skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    pub stock: i64,
}

/// Result of [`normalize_variants`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVariants {
    pub variants: Vec<Variant>,
    /// Minimum finite non-negative option price, if any option has one.
    pub price_usd: Option<f64>,
    /// Sum of all option stocks, 0 when there are none.
    pub stock_total: i64,
}

/// Coerce a submitted price to a number the way loosely-typed clients
/// expect: numbers pass through, numeric strings parse, null and the empty
/// string are 0, booleans are 0/1, anything else (including absence) is NaN.
fn coerce_price(raw: Option<&Value>) -> f64 {
    match raw {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(_) => f64::NAN,
    }
}

/// Stock is stricter than price: only an actual finite JSON number counts,
/// everything else defaults to 0. Clamped to a non-negative integer.
fn coerce_stock(raw: Option<&Value>) -> i64 {
    match raw {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() => (v as i64).max(0),
            _ => 0,
        },
        _ => 0,
    }
}

fn trimmed(raw: Option<&String>) -> String {
    raw.map(|s| s.trim()).unwrap_or("").to_string()
}

pub fn normalize_variants(raw: Vec<VariantInput>) -> NormalizedVariants {
    let variants: Vec<Variant> = raw
        .into_iter()
        .map(|variant| {
            let label = variant.label.unwrap_or_default();
            Variant {
                label: VariantLabel {
                    es: trimmed(label.es.as_ref()),
                    en: trimmed(label.en.as_ref()),
                },
                options: variant
                    .options
                    .into_iter()
                    .map(|option| {
                        let price = coerce_price(option.price_usd.as_ref());
                        VariantOption {
                            value: trimmed(option.value.as_ref()),
                            price_usd: price.is_finite().then_some(price),
                            stock: coerce_stock(option.stock.as_ref()),
                        }
                    })
                    .collect(),
            }
        })
        .collect();

    let price_usd = variants
        .iter()
        .flat_map(|variant| variant.options.iter())
        .filter_map(|option| option.price_usd)
        .filter(|price| *price >= 0.0)
        .fold(None::<f64>, |min, price| {
            Some(min.map_or(price, |m| m.min(price)))
        });

    let stock_total = variants
        .iter()
        .flat_map(|variant| variant.options.iter())
        .map(|option| option.stock)
        .sum();

    NormalizedVariants {
        variants,
        price_usd,
        stock_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Vec<VariantInput> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_min_price_and_stock_total() {
        let result = normalize_variants(parse(json!([
            {
                "label": {"es": "Talla"},
                "options": [
                    {"value": "S", "priceUSD": 10, "stock": 2},
                    {"value": "M", "priceUSD": 5, "stock": 3}
                ]
            }
        ])));
        assert_eq!(result.price_usd, Some(5.0));
        assert_eq!(result.stock_total, 5);
        assert_eq!(result.variants[0].label.en, "");
        assert_eq!(result.variants[0].options[0].value, "S");
    }

    #[test]
    fn test_empty_variant_list() {
        let result = normalize_variants(Vec::new());
        assert_eq!(result.price_usd, None);
        assert_eq!(result.stock_total, 0);
        assert!(result.variants.is_empty());
    }

    #[test]
    fn test_negative_price_excluded_but_stock_counts() {
        let result = normalize_variants(parse(json!([
            {"label": {}, "options": [{"value": "X", "priceUSD": -5, "stock": 10}]}
        ])));
        assert_eq!(result.price_usd, None);
        assert_eq!(result.stock_total, 10);
        // the negative price is still persisted on the option itself
        assert_eq!(result.variants[0].options[0].price_usd, Some(-5.0));
    }

    #[test]
    fn test_bad_price_excluded_not_treated_as_zero() {
        let result = normalize_variants(parse(json!([
            {
                "options": [
                    {"value": "A", "priceUSD": "abc", "stock": 1},
                    {"value": "B", "priceUSD": 7, "stock": 1}
                ]
            }
        ])));
        // if NaN collapsed to 0 the minimum would be 0, not 7
        assert_eq!(result.price_usd, Some(7.0));
        assert_eq!(result.variants[0].options[0].price_usd, None);
    }

    #[test]
    fn test_missing_price_excluded() {
        let result = normalize_variants(parse(json!([
            {"options": [{"value": "A", "stock": 4}]}
        ])));
        assert_eq!(result.price_usd, None);
        assert_eq!(result.stock_total, 4);
    }

    #[test]
    fn test_null_price_coerces_to_zero() {
        let result = normalize_variants(parse(json!([
            {"options": [{"value": "A", "priceUSD": null, "stock": 1},
                         {"value": "B", "priceUSD": 9, "stock": 1}]}
        ])));
        // the null undercuts the real price, it is not dropped as unusable
        assert_eq!(result.price_usd, Some(0.0));
        assert_eq!(result.variants[0].options[0].price_usd, Some(0.0));
        assert_eq!(result.variants[0].options[1].price_usd, Some(9.0));
    }

    #[test]
    fn test_null_options_keeps_the_label() {
        let result = normalize_variants(parse(json!([
            {"label": {"es": "Talla", "en": "Size"}, "options": null}
        ])));
        assert_eq!(result.variants[0].label.es, "Talla");
        assert_eq!(result.variants[0].label.en, "Size");
        assert!(result.variants[0].options.is_empty());
        assert_eq!(result.price_usd, None);
        assert_eq!(result.stock_total, 0);
    }

    #[test]
    fn test_junk_label_keeps_the_options() {
        let result = normalize_variants(parse(json!([
            {"label": "Talla", "options": [{"value": "S", "priceUSD": 5, "stock": 2}]}
        ])));
        assert_eq!(result.variants[0].label.es, "");
        assert_eq!(result.variants[0].options[0].value, "S");
        assert_eq!(result.price_usd, Some(5.0));
        assert_eq!(result.stock_total, 2);
    }

    #[test]
    fn test_non_object_option_element_reads_as_empty_option() {
        let result = normalize_variants(parse(json!([
            {"options": [7, {"value": "S", "priceUSD": 5, "stock": 2}]}
        ])));
        let options = &result.variants[0].options;
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "");
        assert_eq!(options[0].price_usd, None);
        assert_eq!(options[0].stock, 0);
        assert_eq!(result.price_usd, Some(5.0));
        assert_eq!(result.stock_total, 2);
    }

    #[test]
    fn test_numeric_string_price_parses() {
        let result = normalize_variants(parse(json!([
            {"options": [{"value": "A", "priceUSD": " 12.5 ", "stock": 0}]}
        ])));
        assert_eq!(result.price_usd, Some(12.5));
    }

    #[test]
    fn test_zero_price_is_a_valid_minimum() {
        let result = normalize_variants(parse(json!([
            {"options": [{"value": "A", "priceUSD": 0, "stock": 1},
                         {"value": "B", "priceUSD": 3, "stock": 1}]}
        ])));
        assert_eq!(result.price_usd, Some(0.0));
    }

    #[test]
    fn test_stock_must_be_an_actual_number() {
        let result = normalize_variants(parse(json!([
            {"options": [{"value": "A", "priceUSD": 1, "stock": "7"}]}
        ])));
        assert_eq!(result.stock_total, 0);
    }

    #[test]
    fn test_stock_clamped_to_non_negative_integer() {
        let result = normalize_variants(parse(json!([
            {"options": [
                {"value": "A", "priceUSD": 1, "stock": 2.9},
                {"value": "B", "priceUSD": 1, "stock": -4}
            ]}
        ])));
        assert_eq!(result.variants[0].options[0].stock, 2);
        assert_eq!(result.variants[0].options[1].stock, 0);
        assert_eq!(result.stock_total, 2);
    }

    #[test]
    fn test_trims_labels_and_values() {
        let result = normalize_variants(parse(json!([
            {
                "label": {"es": "  Talla  ", "en": "  Size "},
                "options": [{"value": "  S ", "priceUSD": 1, "stock": 1}]
            },
            {"options": [{"stock": 1}]}
        ])));
        assert_eq!(result.variants[0].label.es, "Talla");
        assert_eq!(result.variants[0].label.en, "Size");
        assert_eq!(result.variants[0].options[0].value, "S");
        assert_eq!(result.variants[1].label.es, "");
        assert_eq!(result.variants[1].options[0].value, "");
    }

    #[test]
    fn test_variant_with_no_options_contributes_nothing() {
        let result = normalize_variants(parse(json!([
            {"label": {"es": "Color"}, "options": []},
            {"label": {"es": "Talla"}, "options": [{"value": "S", "priceUSD": 8, "stock": 2}]}
        ])));
        assert_eq!(result.price_usd, Some(8.0));
        assert_eq!(result.stock_total, 2);
    }

    #[test]
    fn test_unusable_price_omitted_from_serialized_option() {
        let result = normalize_variants(parse(json!([
            {"options": [{"value": "A", "priceUSD": "abc", "stock": 1},
                         {"value": "B", "priceUSD": 2, "stock": 1}]}
        ])));
        let encoded = serde_json::to_value(&result.variants).unwrap();
        assert!(encoded[0]["options"][0].get("priceUSD").is_none());
        assert_eq!(encoded[0]["options"][1]["priceUSD"], json!(2.0));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize_variants(parse(json!([
            {
                "label": {"es": " Talla "},
                "options": [
                    {"value": " S ", "priceUSD": "10", "stock": 2},
                    {"value": "M", "priceUSD": "abc", "stock": 3},
                    {"value": "L", "priceUSD": -1, "stock": 1}
                ]
            }
        ])));
        let reencoded = serde_json::to_value(&first.variants).unwrap();
        let second = normalize_variants(parse(reencoded));
        assert_eq!(second.price_usd, first.price_usd);
        assert_eq!(second.stock_total, first.stock_total);
        assert_eq!(second.variants, first.variants);
    }
}
