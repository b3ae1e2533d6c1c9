//! # Receipt Computation
//!
//! Building and rendering receipts from selected records.
//!
//! ## The Money Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Receipt Arithmetic                             │
//! │                                                                 │
//! │  selections (record × quantity, quantity floored at 1)          │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  line_total = unit_amount × quantity                            │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  subtotal = Σ line_total                                        │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  discount = clamp(input, 0 ..= subtotal)                        │
//! │       │         negative input → 0, excess → cancels subtotal   │
//! │       ▼                                                         │
//! │  tax = (subtotal − discount) × rate / 100                       │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  total = (subtotal − discount) + tax                            │
//! │                                                                 │
//! │  Every total is recomputed from its inputs at build time and    │
//! │  never stored independently of them. Once archived, a receipt   │
//! │  is immutable history.                                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductRecord;
use crate::validation::normalize_quantity;
use crate::{DEFAULT_BUSINESS_NAME, DEFAULT_CUSTOMER_NAME, RECEIPT_NUMBER_PREFIX};

// =============================================================================
// Receipt Types
// =============================================================================

/// One itemized line on a receipt.
///
/// Snapshot pattern: name, barcode, and unit amount are frozen at generation
/// time, so later record edits never rewrite archived history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub barcode: String,
    pub unit_amount: Money,
    pub quantity: i64,
    /// `unit_amount × quantity`.
    pub line_total: Money,
}

/// A computed, archived summary of selected records with tax and discount
/// math applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// `"RCP-"` + millisecond timestamp. Unique per generation.
    pub receipt_number: String,
    pub date: NaiveDate,
    pub customer_name: String,
    pub business_name: String,
    pub business_address: String,
    pub items: Vec<ReceiptItem>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub tax_rate_percent: Decimal,
    pub tax_amount: Money,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Receipt Request
// =============================================================================

/// A record picked for a receipt, with its quantity.
#[derive(Debug, Clone)]
pub struct LineSelection {
    pub record: ProductRecord,
    /// Floored at 1 during the build.
    pub quantity: i64,
}

/// Everything the calculator needs to produce a [`Receipt`].
///
/// `discount_amount` and `tax_rate_percent` arrive already parsed; negative
/// values are coerced to zero during the build (string coercion lives in
/// [`crate::validation`]).
#[derive(Debug, Clone, Default)]
pub struct ReceiptRequest {
    pub selections: Vec<LineSelection>,
    pub customer_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub discount_amount: Money,
    pub tax_rate_percent: Decimal,
}

// =============================================================================
// Builder
// =============================================================================

/// Computes a full receipt from a request.
///
/// ## Edge Cases
/// - Zero selections is a validation error, never an empty receipt
/// - Quantities below 1 are floored at 1
/// - Negative discount or tax rate coerces to 0
/// - Discount above the subtotal clamps to exactly cancel it; tax is then
///   computed on a zero base
///
/// ## Example
/// ```rust,ignore
/// let receipt = build_receipt(request, Utc::now())?;
/// assert_eq!(receipt.total, receipt.subtotal - receipt.discount_amount + receipt.tax_amount);
/// ```
pub fn build_receipt(request: ReceiptRequest, now: DateTime<Utc>) -> CoreResult<Receipt> {
    if request.selections.is_empty() {
        return Err(CoreError::EmptyReceipt);
    }

    let items: Vec<ReceiptItem> = request
        .selections
        .iter()
        .map(|selection| {
            let quantity = normalize_quantity(selection.quantity);
            ReceiptItem {
                name: selection.record.name.clone(),
                barcode: selection.record.barcode.clone(),
                unit_amount: selection.record.amount,
                quantity,
                line_total: selection.record.amount.times(quantity),
            }
        })
        .collect();

    let subtotal = items
        .iter()
        .fold(Money::zero(), |acc, item| acc + item.line_total);

    // Negative inputs coerce to zero; a discount larger than the subtotal
    // clamps to exactly cancel it.
    let discount_amount = request.discount_amount.max(Money::zero()).min(subtotal);
    let tax_rate_percent = request.tax_rate_percent.max(Decimal::ZERO);

    let base = subtotal - discount_amount;
    let tax_amount = base.percent(tax_rate_percent);
    let total = base + tax_amount;

    Ok(Receipt {
        receipt_number: format!("{}{}", RECEIPT_NUMBER_PREFIX, now.timestamp_millis()),
        date: request.date.unwrap_or_else(|| now.date_naive()),
        customer_name: request
            .customer_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
        business_name: request
            .business_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string()),
        business_address: request.business_address.unwrap_or_default(),
        items,
        subtotal,
        discount_amount,
        tax_rate_percent,
        tax_amount,
        total,
        created_at: now,
    })
}

// =============================================================================
// Plain-Text Export
// =============================================================================

/// Renders a receipt as plain text, suitable for clipboard copy.
///
/// Field order is fixed: header, itemized lines, subtotal, discount (only
/// when one applies), tax, total.
pub fn render_text(receipt: &Receipt) -> String {
    let mut out = String::new();

    out.push_str(&format!("Receipt #: {}\n", receipt.receipt_number));
    out.push_str(&format!("Date: {}\n", receipt.date));
    out.push_str(&format!("Customer: {}\n", receipt.customer_name));
    out.push_str(&format!("Business: {}\n", receipt.business_name));
    if !receipt.business_address.is_empty() {
        out.push_str(&format!("Address: {}\n", receipt.business_address));
    }

    out.push_str("\nItems:\n");
    for item in &receipt.items {
        out.push_str(&format!(
            "{} - Qty: {} x {} = {}\n",
            item.name, item.quantity, item.unit_amount, item.line_total
        ));
    }

    out.push_str(&format!("\nSubtotal: {}\n", receipt.subtotal));
    if receipt.discount_amount.is_positive() {
        out.push_str(&format!("Discount: -{}\n", receipt.discount_amount));
    }
    out.push_str(&format!(
        "Tax ({}%): {}\n",
        receipt.tax_rate_percent.normalize(),
        receipt.tax_amount
    ));
    out.push_str(&format!("Total: {}\n", receipt.total));

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BarcodeType;
    use crate::LOCAL_OWNER_ID;
    use chrono::TimeZone;

    fn record(name: &str, barcode: &str, major: i64, minor: i64) -> ProductRecord {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ProductRecord {
            id: barcode.to_string(),
            barcode: barcode.to_string(),
            name: name.to_string(),
            description: None,
            serial_number: None,
            barcode_type: BarcodeType::Code128,
            amount: Money::from_major_minor(major, minor),
            shipping_address: None,
            shipping_company: None,
            created_at: created,
            updated_at: created,
            owner_id: LOCAL_OWNER_ID.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 3, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_receipt_math() {
        // Two records, $10.00 × 2 and $5.00 × 1, discount $2.00, tax 10%
        let request = ReceiptRequest {
            selections: vec![
                LineSelection {
                    record: record("Widget", "111", 10, 0),
                    quantity: 2,
                },
                LineSelection {
                    record: record("Gadget", "222", 5, 0),
                    quantity: 1,
                },
            ],
            discount_amount: Money::from_major_minor(2, 0),
            tax_rate_percent: Decimal::from(10),
            ..Default::default()
        };

        let receipt = build_receipt(request, now()).unwrap();

        assert_eq!(receipt.subtotal, Money::from_major_minor(25, 0));
        assert_eq!(receipt.discount_amount, Money::from_major_minor(2, 0));
        assert_eq!(receipt.tax_amount, Money::from_major_minor(2, 30));
        assert_eq!(receipt.total, Money::from_major_minor(25, 30));
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[0].line_total, Money::from_major_minor(20, 0));
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let err = build_receipt(ReceiptRequest::default(), now()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyReceipt));
    }

    #[test]
    fn test_discount_exceeding_subtotal_clamps_to_zero_base() {
        let request = ReceiptRequest {
            selections: vec![LineSelection {
                record: record("Widget", "111", 10, 0),
                quantity: 1,
            }],
            discount_amount: Money::from_major_minor(50, 0),
            tax_rate_percent: Decimal::from(10),
            ..Default::default()
        };

        let receipt = build_receipt(request, now()).unwrap();

        assert_eq!(receipt.discount_amount, Money::from_major_minor(10, 0));
        assert_eq!(receipt.tax_amount, Money::zero());
        assert_eq!(receipt.total, Money::zero());
    }

    #[test]
    fn test_negative_inputs_coerce_to_zero() {
        let request = ReceiptRequest {
            selections: vec![LineSelection {
                record: record("Widget", "111", 10, 0),
                quantity: 1,
            }],
            discount_amount: Money::from_major_minor(-3, 0),
            tax_rate_percent: Decimal::from(-5),
            ..Default::default()
        };

        let receipt = build_receipt(request, now()).unwrap();

        assert_eq!(receipt.discount_amount, Money::zero());
        assert_eq!(receipt.tax_amount, Money::zero());
        assert_eq!(receipt.total, Money::from_major_minor(10, 0));
    }

    #[test]
    fn test_quantity_floors_at_one() {
        let request = ReceiptRequest {
            selections: vec![LineSelection {
                record: record("Widget", "111", 4, 50),
                quantity: 0,
            }],
            ..Default::default()
        };

        let receipt = build_receipt(request, now()).unwrap();

        assert_eq!(receipt.items[0].quantity, 1);
        assert_eq!(receipt.subtotal, Money::from_major_minor(4, 50));
    }

    #[test]
    fn test_defaults() {
        let request = ReceiptRequest {
            selections: vec![LineSelection {
                record: record("Widget", "111", 1, 0),
                quantity: 1,
            }],
            customer_name: Some("   ".to_string()),
            ..Default::default()
        };

        let receipt = build_receipt(request, now()).unwrap();

        assert_eq!(receipt.customer_name, DEFAULT_CUSTOMER_NAME);
        assert_eq!(receipt.business_name, DEFAULT_BUSINESS_NAME);
        assert_eq!(receipt.date, now().date_naive());
        assert!(receipt.receipt_number.starts_with(RECEIPT_NUMBER_PREFIX));
    }

    #[test]
    fn test_render_text_field_order() {
        let request = ReceiptRequest {
            selections: vec![
                LineSelection {
                    record: record("Widget", "111", 10, 0),
                    quantity: 2,
                },
                LineSelection {
                    record: record("Gadget", "222", 5, 0),
                    quantity: 1,
                },
            ],
            customer_name: Some("Ada".to_string()),
            discount_amount: Money::from_major_minor(2, 0),
            tax_rate_percent: Decimal::from(10),
            ..Default::default()
        };

        let receipt = build_receipt(request, now()).unwrap();
        let text = render_text(&receipt);

        let expected_tail = "\nItems:\n\
             Widget - Qty: 2 x $10.00 = $20.00\n\
             Gadget - Qty: 1 x $5.00 = $5.00\n\
             \nSubtotal: $25.00\n\
             Discount: -$2.00\n\
             Tax (10%): $2.30\n\
             Total: $25.30\n";
        assert!(text.starts_with(&format!("Receipt #: {}\n", receipt.receipt_number)));
        assert!(text.contains("Customer: Ada\n"));
        assert!(text.ends_with(expected_tail));
    }

    #[test]
    fn test_render_text_omits_zero_discount() {
        let request = ReceiptRequest {
            selections: vec![LineSelection {
                record: record("Widget", "111", 10, 0),
                quantity: 1,
            }],
            ..Default::default()
        };

        let receipt = build_receipt(request, now()).unwrap();
        let text = render_text(&receipt);

        assert!(!text.contains("Discount:"));
        assert!(text.contains("Tax (0%): $0.00"));
    }
}
