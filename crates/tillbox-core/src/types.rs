//! # Domain Types
//!
//! Core domain types used throughout tillbox.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │ ProductRecord  │   │  RecordDraft   │   │  RecordPatch   │      │
//! │  │ ────────────── │   │ ────────────── │   │ ────────────── │      │
//! │  │ id             │   │ fields only,   │   │ partial edit,  │      │
//! │  │ barcode, name  │   │ no identity,   │   │ None = leave   │      │
//! │  │ amount (Money) │   │ no timestamps  │   │ unchanged      │      │
//! │  │ owner_id       │   └────────────────┘   └────────────────┘      │
//! │  └────────────────┘                                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │  StorageMode   │   │  BarcodeType   │   │ Severity/Notice│      │
//! │  │ ────────────── │   │ ────────────── │   │ ────────────── │      │
//! │  │ Authenticated  │   │ CODE128 (dflt) │   │ success, error │      │
//! │  │   { owner_id } │   │ EAN13, EAN8,   │   │ warning, info  │      │
//! │  │ Offline        │   │ CODE39, UPC    │   │ + message      │      │
//! │  └────────────────┘   └────────────────┘   └────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual Identity Pattern
//! A record's `id` is scope-local: a millisecond-timestamp string in the
//! local store, a UUID v4 in the remote store. The reconciler strips local
//! ids on migration; ids never cross scopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::LOCAL_OWNER_ID;

// =============================================================================
// Storage Mode
// =============================================================================

/// Which backing store the active session routes to.
///
/// ## Why a tagged enum?
/// The two code paths (remote vs local) are made exhaustive: every record
/// operation matches on this value, so the compiler proves no operation
/// silently mixes scopes. The mode is passed explicitly to every routing
/// call; there is no hidden session global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// A signed-in session; all record operations go to the remote gateway,
    /// scoped to this owner.
    Authenticated { owner_id: String },

    /// No session; all record operations go to the local store.
    Offline,
}

impl StorageMode {
    /// Builds an authenticated mode for the given owner.
    pub fn authenticated(owner_id: impl Into<String>) -> Self {
        StorageMode::Authenticated {
            owner_id: owner_id.into(),
        }
    }

    /// Returns true when a signed-in identity is present.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, StorageMode::Authenticated { .. })
    }

    /// The owner identity records are scoped to in this mode.
    ///
    /// Offline records carry the [`LOCAL_OWNER_ID`] sentinel so the record
    /// shape is identical in both scopes.
    pub fn owner_id(&self) -> &str {
        match self {
            StorageMode::Authenticated { owner_id } => owner_id,
            StorageMode::Offline => LOCAL_OWNER_ID,
        }
    }

    /// Short human label for user-facing messages ("cloud" / "local").
    pub fn label(&self) -> &'static str {
        match self {
            StorageMode::Authenticated { .. } => "cloud",
            StorageMode::Offline => "local",
        }
    }
}

// =============================================================================
// Barcode Type
// =============================================================================

/// Barcode symbology attached to a record.
///
/// Carried as metadata for the rendering layer; the core never draws
/// barcodes. Unknown labels fall back to CODE128, matching the form default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarcodeType {
    #[default]
    #[serde(rename = "CODE128")]
    Code128,
    #[serde(rename = "EAN13")]
    Ean13,
    #[serde(rename = "EAN8")]
    Ean8,
    #[serde(rename = "CODE39")]
    Code39,
    #[serde(rename = "UPC")]
    UpcA,
}

impl BarcodeType {
    /// The wire/display label for this symbology.
    pub fn label(&self) -> &'static str {
        match self {
            BarcodeType::Code128 => "CODE128",
            BarcodeType::Ean13 => "EAN13",
            BarcodeType::Ean8 => "EAN8",
            BarcodeType::Code39 => "CODE39",
            BarcodeType::UpcA => "UPC",
        }
    }

    /// Parses a label, returning `None` for unknown symbologies.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "CODE128" => Some(BarcodeType::Code128),
            "EAN13" => Some(BarcodeType::Ean13),
            "EAN8" => Some(BarcodeType::Ean8),
            "CODE39" => Some(BarcodeType::Code39),
            "UPC" | "UPCA" | "UPC-A" => Some(BarcodeType::UpcA),
            _ => None,
        }
    }

    /// Parses a label, falling back to the CODE128 default.
    pub fn parse_or_default(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }
}

impl std::fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// A single product entry (barcode + metadata).
///
/// Identical shape in both storage scopes; only `id` generation and the
/// `owner_id` value differ (see module docs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Scope-local identifier (millisecond timestamp locally, UUID remotely).
    pub id: String,

    /// Barcode value. Required, but not unique.
    pub barcode: String,

    /// Display name. Required.
    pub name: String,

    pub description: Option<String>,
    pub serial_number: Option<String>,

    /// Symbology metadata for the rendering layer.
    #[serde(default)]
    pub barcode_type: BarcodeType,

    /// Unit price. Defaults to zero.
    #[serde(default)]
    pub amount: Money,

    pub shipping_address: Option<String>,
    pub shipping_company: Option<String>,

    /// Local mode: client clock. Remote mode: gateway-assigned.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Owner identity, or the `"local"` sentinel for offline scope.
    pub owner_id: String,
}

// =============================================================================
// Record Draft
// =============================================================================

/// Field values for a record that does not exist yet.
///
/// No identity, owner, or timestamps: those are assigned by whichever store
/// the draft lands in. A missing barcode is filled by
/// [`crate::validation::generate_barcode`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    pub barcode: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    #[serde(default)]
    pub barcode_type: BarcodeType,
    #[serde(default)]
    pub amount: Money,
    pub shipping_address: Option<String>,
    pub shipping_company: Option<String>,
}

/// The reconciler rebuilds drafts from local records, stripping the local
/// id so the remote store assigns a fresh one.
impl From<ProductRecord> for RecordDraft {
    fn from(record: ProductRecord) -> Self {
        RecordDraft {
            barcode: Some(record.barcode),
            name: record.name,
            description: record.description,
            serial_number: record.serial_number,
            barcode_type: record.barcode_type,
            amount: record.amount,
            shipping_address: record.shipping_address,
            shipping_company: record.shipping_company,
        }
    }
}

// =============================================================================
// Record Patch
// =============================================================================

/// A partial edit: `None` fields are left unchanged.
///
/// For the optional string fields, `Some("")` clears the field (the edit
/// form submits empty inputs for fields the user blanked out).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub barcode_type: Option<BarcodeType>,
    pub amount: Option<Money>,
    pub shipping_address: Option<String>,
    pub shipping_company: Option<String>,
}

impl RecordPatch {
    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.serial_number.is_none()
            && self.barcode_type.is_none()
            && self.amount.is_none()
            && self.shipping_address.is_none()
            && self.shipping_company.is_none()
    }

    /// Applies the patch in place and stamps `updated_at`.
    pub fn apply(&self, record: &mut ProductRecord, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(description) = &self.description {
            record.description = non_empty(description);
        }
        if let Some(serial) = &self.serial_number {
            record.serial_number = non_empty(serial);
        }
        if let Some(barcode_type) = self.barcode_type {
            record.barcode_type = barcode_type;
        }
        if let Some(amount) = self.amount {
            record.amount = amount;
        }
        if let Some(address) = &self.shipping_address {
            record.shipping_address = non_empty(address);
        }
        if let Some(company) = &self.shipping_company {
            record.shipping_company = non_empty(company);
        }
        record.updated_at = now;
    }
}

/// Empty or whitespace-only input clears an optional field.
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// User Feedback
// =============================================================================

/// Severity tag carried by every user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(tag)
    }
}

/// A short-lived user-facing message.
///
/// Every operation outcome (success, validation failure, backend error) is
/// surfaced through this channel. The library layers build notices; only the
/// application layer displays them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            severity: Severity::Info,
            message: message.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ProductRecord {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ProductRecord {
            id: "1714564800000".to_string(),
            barcode: "123".to_string(),
            name: "Widget".to_string(),
            description: Some("A widget".to_string()),
            serial_number: None,
            barcode_type: BarcodeType::Code128,
            amount: Money::from_major_minor(9, 99),
            shipping_address: None,
            shipping_company: None,
            created_at: created,
            updated_at: created,
            owner_id: LOCAL_OWNER_ID.to_string(),
        }
    }

    #[test]
    fn test_storage_mode_owner_id() {
        let cloud = StorageMode::authenticated("user-1");
        assert!(cloud.is_authenticated());
        assert_eq!(cloud.owner_id(), "user-1");
        assert_eq!(cloud.label(), "cloud");

        assert!(!StorageMode::Offline.is_authenticated());
        assert_eq!(StorageMode::Offline.owner_id(), LOCAL_OWNER_ID);
        assert_eq!(StorageMode::Offline.label(), "local");
    }

    #[test]
    fn test_barcode_type_labels() {
        assert_eq!(BarcodeType::default(), BarcodeType::Code128);
        assert_eq!(BarcodeType::from_label("ean13"), Some(BarcodeType::Ean13));
        assert_eq!(BarcodeType::from_label("UPC-A"), Some(BarcodeType::UpcA));
        assert_eq!(BarcodeType::parse_or_default("nonsense"), BarcodeType::Code128);
        assert_eq!(BarcodeType::Code39.to_string(), "CODE39");
    }

    #[test]
    fn test_draft_from_record_strips_identity() {
        let draft = RecordDraft::from(record());
        assert_eq!(draft.barcode.as_deref(), Some("123"));
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.amount, Money::from_major_minor(9, 99));
    }

    #[test]
    fn test_patch_apply() {
        let mut rec = record();
        let later = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        let patch = RecordPatch {
            name: Some("Gadget".to_string()),
            description: Some("".to_string()), // blanked out in the form
            amount: Some(Money::from_major_minor(12, 50)),
            ..Default::default()
        };

        assert!(!patch.is_empty());
        patch.apply(&mut rec, later);

        assert_eq!(rec.name, "Gadget");
        assert_eq!(rec.description, None);
        assert_eq!(rec.amount, Money::from_major_minor(12, 50));
        assert_eq!(rec.updated_at, later);
        // Untouched fields survive
        assert_eq!(rec.barcode, "123");
    }

    #[test]
    fn test_empty_patch() {
        assert!(RecordPatch::default().is_empty());
    }

    #[test]
    fn test_notice_constructors() {
        assert_eq!(Notice::success("ok").severity, Severity::Success);
        assert_eq!(Notice::warning("hm").severity, Severity::Warning);
        assert_eq!(Severity::Error.to_string(), "error");
    }

    #[test]
    fn test_record_blob_shape_is_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("serialNumber").is_some());
        assert!(json.get("ownerId").is_some());
        assert_eq!(json["barcodeType"], "CODE128");
    }
}
