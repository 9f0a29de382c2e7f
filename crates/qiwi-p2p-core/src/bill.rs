//! Bill metadata types.
//!
//! The API speaks one JSON object for bills, but not every field is the
//! caller's to set. [`Bill`] is what the API returns and is decoded leniently
//! (unknown fields are ignored). [`CreateBillRequest`] is what a merchant may
//! submit, so server-populated fields (`siteId`, `billId`, `payUrl`, `status`,
//! `creationDateTime`) cannot end up in a create request.

use chrono::{DateTime, FixedOffset, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::datetime::{format_datetime, parse_datetime};
use crate::error::{AmountError, DateTimeError};
use crate::ids::{BillId, SiteId};

// ============================================================================
// Custom fields
// ============================================================================

/// Custom field restricting which payment sources the form offers.
///
/// Value is a comma-separated list of [`PaySource`] codes.
pub const CUSTOM_FIELD_PAY_SOURCES_FILTER: &str = "paySourcesFilter";

/// Custom field selecting a personalised form theme (up to 255 characters).
pub const CUSTOM_FIELD_THEME_CODE: &str = "themeCode";

/// Free-form string parameters attached to a bill.
pub type CustomFields = BTreeMap<String, String>;

/// A payment source accepted by the hosted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaySource {
    /// QIWI Wallet.
    Qiwi,
    /// Bank card.
    Card,
}

impl PaySource {
    /// Wire code of the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qiwi => "qw",
            Self::Card => "card",
        }
    }

    /// Build a `paySourcesFilter` value, e.g. `qw,card`.
    #[must_use]
    pub fn filter(sources: &[PaySource]) -> String {
        sources
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Display for PaySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Wire helpers
// ============================================================================

/// Whether an optional string-like field carries nothing worth sending.
fn is_blank<T: AsRef<str>>(value: &Option<T>) -> bool {
    value.as_ref().map_or(true, |v| v.as_ref().is_empty())
}

/// Whether every custom field is empty.
fn custom_fields_are_blank(fields: &CustomFields) -> bool {
    fields.values().all(String::is_empty)
}

/// Serialize custom fields without the empty ones.
fn serialize_custom_fields<S>(fields: &CustomFields, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(fields.iter().filter(|(_, v)| !v.is_empty()))
}

/// Accept a missing, `null` or partially `null` custom field object.
fn deserialize_custom_fields<'de, D>(deserializer: D) -> Result<CustomFields, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(fields
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

fn customer_is_blank(customer: &Option<Customer>) -> bool {
    customer.as_ref().map_or(true, Customer::is_empty)
}

// ============================================================================
// Customer & amount
// ============================================================================

/// Identifies the paying customer.
///
/// All fields are optional; the API expects at least one in practice.
/// Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Phone number in international format.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub phone: Option<String>,
    /// E-mail address.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub email: Option<String>,
    /// Customer identifier in the merchant's system.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub account: Option<String>,
}

impl Customer {
    /// Whether no identifier is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_blank(&self.phone) && is_blank(&self.email) && is_blank(&self.account)
    }
}

/// Bill currency (ISO 4217 alpha-3).
///
/// Codes other than the supported ones decode into [`Currency::Other`] so a
/// response is never rejected over its currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    /// Russian rouble.
    Rub,
    /// Kazakhstani tenge.
    Kzt,
    /// A code this crate does not know, as received. Empty when absent.
    Other(String),
}

impl Currency {
    /// ISO 4217 code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Rub => "RUB",
            Self::Kzt => "KZT",
            Self::Other(code) => code,
        }
    }

    /// Whether no currency was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code().is_empty()
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        match code.as_str() {
            "RUB" => Self::Rub,
            "KZT" => Self::Kzt,
            _ => Self::Other(code),
        }
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        match currency {
            Currency::Other(code) => code,
            known => known.code().to_string(),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Bill amount.
///
/// The value travels as a decimal string with at most two fraction digits,
/// rounded toward zero. Missing parts decode as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Decimal value, e.g. `"123456.78"`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Currency of the value.
    #[serde(default, skip_serializing_if = "Currency::is_empty")]
    pub currency: Currency,
}

impl Amount {
    /// Wrap an already formatted value.
    #[must_use]
    pub fn new(value: impl Into<String>, currency: Currency) -> Self {
        Self {
            value: value.into(),
            currency,
        }
    }

    /// Format a decimal the way the API expects: truncated to two places,
    /// always two fraction digits.
    #[must_use]
    pub fn from_decimal(value: Decimal, currency: Currency) -> Self {
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::ToZero);
        rounded.rescale(2);
        Self {
            value: rounded.to_string(),
            currency,
        }
    }

    /// Parse the value back into a decimal.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError`] if the value is not a decimal number.
    pub fn to_decimal(&self) -> Result<Decimal, AmountError> {
        Decimal::from_str(&self.value).map_err(|source| AmountError {
            value: self.value.clone(),
            source,
        })
    }
}

// ============================================================================
// Status
// ============================================================================

/// Payment status of a bill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillStatusValue {
    /// Issued, awaiting payment.
    Waiting,
    /// Paid.
    Paid,
    /// Lifetime elapsed without payment.
    Expired,
    /// Cancelled by the merchant.
    Rejected,
    /// A status this crate does not know, as received.
    Other(String),
}

impl BillStatusValue {
    /// Wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "WAITING",
            Self::Paid => "PAID",
            Self::Expired => "EXPIRED",
            Self::Rejected => "REJECTED",
            Self::Other(value) => value,
        }
    }

    /// Whether the bill can no longer change state.
    ///
    /// Unknown statuses are not assumed final.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Paid | Self::Expired | Self::Rejected)
    }
}

impl From<String> for BillStatusValue {
    fn from(value: String) -> Self {
        match value.as_str() {
            "WAITING" => Self::Waiting,
            "PAID" => Self::Paid,
            "EXPIRED" => Self::Expired,
            "REJECTED" => Self::Rejected,
            _ => Self::Other(value),
        }
    }
}

impl From<BillStatusValue> for String {
    fn from(status: BillStatusValue) -> Self {
        match status {
            BillStatusValue::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

/// Status of a bill together with when it last changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillStatus {
    /// Current status, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<BillStatusValue>,
    /// Last status change, metadata timestamp format.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub changed_date_time: Option<String>,
}

impl BillStatus {
    /// Decode `changed_date_time`.
    ///
    /// # Errors
    ///
    /// Returns [`DateTimeError`] if the field is present but malformed.
    pub fn changed_time(&self) -> Result<Option<DateTime<FixedOffset>>, DateTimeError> {
        self.changed_date_time
            .as_deref()
            .map(parse_datetime)
            .transpose()
    }
}

// ============================================================================
// Bill
// ============================================================================

/// A bill as reported by the API.
///
/// Decoding is lenient: every field is optional, `null` is accepted where an
/// object is expected, and unknown fields or enum values do not fail the
/// whole bill. Unset and empty fields are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Merchant identifier in the P2P service.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub site_id: Option<SiteId>,
    /// Merchant-side bill identifier.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub bill_id: Option<BillId>,
    /// Hosted payment form for this bill. Redirect the customer here.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub pay_url: Option<String>,
    /// Customer identifiers.
    #[serde(default, skip_serializing_if = "customer_is_blank")]
    pub customer: Option<Customer>,
    /// Comment shown to the customer.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub comment: Option<String>,
    /// Bill amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// Payment status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BillStatus>,
    /// Extra string parameters, see [`CUSTOM_FIELD_PAY_SOURCES_FILTER`] and
    /// [`CUSTOM_FIELD_THEME_CODE`].
    #[serde(
        default,
        deserialize_with = "deserialize_custom_fields",
        serialize_with = "serialize_custom_fields",
        skip_serializing_if = "custom_fields_are_blank"
    )]
    pub custom_fields: CustomFields,
    /// When the bill was created, metadata timestamp format.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub creation_date_time: Option<String>,
    /// When the bill expires, metadata timestamp format.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub expiration_date_time: Option<String>,
}

impl Bill {
    /// Current status value, if reported.
    #[must_use]
    pub fn status_value(&self) -> Option<BillStatusValue> {
        self.status.as_ref().and_then(|s| s.value.clone())
    }

    /// Whether the bill has reached a final status.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.value.as_ref())
            .is_some_and(BillStatusValue::is_final)
    }

    /// Decode `creation_date_time`.
    ///
    /// # Errors
    ///
    /// Returns [`DateTimeError`] if the field is present but malformed.
    pub fn creation_time(&self) -> Result<Option<DateTime<FixedOffset>>, DateTimeError> {
        self.creation_date_time
            .as_deref()
            .map(parse_datetime)
            .transpose()
    }

    /// Decode `expiration_date_time`.
    ///
    /// # Errors
    ///
    /// Returns [`DateTimeError`] if the field is present but malformed.
    pub fn expiration_time(&self) -> Result<Option<DateTime<FixedOffset>>, DateTimeError> {
        self.expiration_date_time
            .as_deref()
            .map(parse_datetime)
            .transpose()
    }
}

/// Body of a create-bill request.
///
/// Only carries the fields a merchant is allowed to set. Empty strings are
/// left off the wire like unset fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    /// Amount to bill.
    pub amount: Amount,
    /// Customer identifiers.
    #[serde(skip_serializing_if = "customer_is_blank")]
    pub customer: Option<Customer>,
    /// Comment shown to the customer (up to 255 characters).
    #[serde(skip_serializing_if = "is_blank")]
    pub comment: Option<String>,
    /// Extra string parameters.
    #[serde(
        serialize_with = "serialize_custom_fields",
        skip_serializing_if = "custom_fields_are_blank"
    )]
    pub custom_fields: CustomFields,
    /// Expiration of the payment form, metadata timestamp format.
    #[serde(skip_serializing_if = "is_blank")]
    pub expiration_date_time: Option<String>,
}

impl CreateBillRequest {
    /// Start a request for `amount`.
    #[must_use]
    pub fn new(amount: Amount) -> Self {
        Self {
            amount,
            customer: None,
            comment: None,
            custom_fields: CustomFields::new(),
            expiration_date_time: None,
        }
    }

    /// Set the customer identifiers. An empty customer is dropped.
    #[must_use]
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = (!customer.is_empty()).then_some(customer);
        self
    }

    /// Set the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set an arbitrary custom field.
    #[must_use]
    pub fn with_custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    /// Restrict the payment sources offered by the form.
    #[must_use]
    pub fn with_pay_sources(self, sources: &[PaySource]) -> Self {
        self.with_custom_field(CUSTOM_FIELD_PAY_SOURCES_FILTER, PaySource::filter(sources))
    }

    /// Select a personalised form theme.
    #[must_use]
    pub fn with_theme_code(self, code: impl Into<String>) -> Self {
        self.with_custom_field(CUSTOM_FIELD_THEME_CODE, code)
    }

    /// Set the expiration instant.
    #[must_use]
    pub fn with_expiration<Tz>(mut self, expires_at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.expiration_date_time = Some(format_datetime(expires_at));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn empty_bill_serializes_to_empty_object() {
        let bill = Bill::default();
        assert_eq!(serde_json::to_value(&bill).unwrap(), json!({}));
    }

    #[test]
    fn bill_serializes_only_populated_fields() {
        let bill = Bill {
            bill_id: Some(BillId::new("b1")),
            comment: Some("coffee".into()),
            ..Bill::default()
        };

        assert_eq!(
            serde_json::to_value(&bill).unwrap(),
            json!({ "billId": "b1", "comment": "coffee" })
        );
    }

    #[test]
    fn bill_decodes_vendor_response() {
        let body = json!({
            "siteId": "9hh4jb-00",
            "billId": "cc961e8d-d4d6-4f02-b737-2297e51fb48e",
            "amount": { "value": "42.24", "currency": "RUB" },
            "status": { "value": "WAITING", "changedDateTime": "2019-08-28T16:26:36.835+03:00" },
            "customer": { "phone": "78710009999", "email": "test@example.com" },
            "customFields": { "paySourcesFilter": "qw", "themeCode": "Yvan-YKaSh" },
            "comment": "Text comment",
            "creationDateTime": "2019-08-28T16:26:36.835+03:00",
            "expirationDateTime": "2019-09-13T14:30:00+03:00",
            "payUrl": "https://oplata.qiwi.com/form/?invoice_uid=d875277b",
            "recipientPhoneNumber": "79000000000"
        });

        let bill: Bill = serde_json::from_value(body).unwrap();

        assert_eq!(bill.site_id, Some(SiteId::new("9hh4jb-00")));
        assert_eq!(bill.amount, Some(Amount::new("42.24", Currency::Rub)));
        assert_eq!(bill.status_value(), Some(BillStatusValue::Waiting));
        assert!(!bill.is_final());
        assert_eq!(bill.custom_fields[CUSTOM_FIELD_THEME_CODE], "Yvan-YKaSh");
        assert_eq!(
            bill.customer.as_ref().and_then(|c| c.email.as_deref()),
            Some("test@example.com")
        );
        assert!(bill.creation_time().unwrap().is_some());
        assert!(bill.expiration_time().unwrap().is_some());
        assert!(bill.status.unwrap().changed_time().unwrap().is_some());
    }

    #[test]
    fn malformed_timestamp_surfaces_on_access() {
        let bill = Bill {
            creation_date_time: Some("yesterday".into()),
            ..Bill::default()
        };
        assert!(bill.creation_time().is_err());
        assert_eq!(bill.expiration_time().unwrap(), None);
    }

    #[test]
    fn final_statuses() {
        assert!(!BillStatusValue::Waiting.is_final());
        assert!(BillStatusValue::Paid.is_final());
        assert!(BillStatusValue::Expired.is_final());
        assert!(BillStatusValue::Rejected.is_final());
    }

    #[test]
    fn amount_from_decimal_truncates_to_two_places() {
        let amount = Amount::from_decimal(Decimal::new(123_456_789, 3), Currency::Kzt);
        assert_eq!(amount.value, "123456.78");

        let whole = Amount::from_decimal(Decimal::from(10), Currency::Rub);
        assert_eq!(whole.value, "10.00");
        assert_eq!(whole.to_decimal().unwrap(), Decimal::from(10));
    }

    #[test]
    fn amount_to_decimal_rejects_garbage() {
        let amount = Amount::new("ten", Currency::Rub);
        assert!(amount.to_decimal().is_err());
    }

    #[test]
    fn create_request_never_carries_server_fields() {
        let expires = Utc::now();
        let request = CreateBillRequest::new(Amount::new("1.00", Currency::Rub))
            .with_customer(Customer {
                account: Some("acc-1".into()),
                ..Customer::default()
            })
            .with_comment("hi")
            .with_pay_sources(&[PaySource::Qiwi, PaySource::Card])
            .with_theme_code("dark")
            .with_expiration(&expires);

        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();

        for key in ["siteId", "billId", "payUrl", "status", "creationDateTime"] {
            assert!(!object.contains_key(key), "{key} leaked into request");
        }
        assert_eq!(value["customFields"]["paySourcesFilter"], "qw,card");
        assert_eq!(value["customer"], json!({ "account": "acc-1" }));
        assert_eq!(
            value["expirationDateTime"].as_str().unwrap(),
            format_datetime(&expires)
        );
    }

    #[test]
    fn minimal_create_request() {
        let request = CreateBillRequest::new(Amount::new("5.50", Currency::Rub))
            .with_customer(Customer::default());

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "amount": { "value": "5.50", "currency": "RUB" } })
        );
    }

    #[test]
    fn empty_strings_stay_off_the_wire() {
        let request = CreateBillRequest::new(Amount::new("1.00", Currency::Rub))
            .with_customer(Customer {
                phone: Some(String::new()),
                ..Customer::default()
            })
            .with_comment("")
            .with_theme_code("")
            .with_custom_field("note", "");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "amount": { "value": "1.00", "currency": "RUB" } })
        );

        let bill = Bill {
            bill_id: Some(BillId::new("")),
            comment: Some(String::new()),
            customer: Some(Customer {
                email: Some(String::new()),
                ..Customer::default()
            }),
            ..Bill::default()
        };
        assert_eq!(serde_json::to_value(&bill).unwrap(), json!({}));
    }

    #[test]
    fn empty_custom_fields_are_dropped_individually() {
        let request = CreateBillRequest::new(Amount::new("1.00", Currency::Rub))
            .with_theme_code("")
            .with_pay_sources(&[PaySource::Card]);

        assert_eq!(
            serde_json::to_value(&request).unwrap()["customFields"],
            json!({ "paySourcesFilter": "card" })
        );
    }

    #[test]
    fn null_custom_fields_decode_as_empty() {
        let bill: Bill =
            serde_json::from_value(json!({ "billId": "b", "customFields": null })).unwrap();
        assert!(bill.custom_fields.is_empty());

        let bill: Bill = serde_json::from_value(json!({
            "customFields": { "themeCode": null, "paySourcesFilter": "qw" }
        }))
        .unwrap();
        assert_eq!(bill.custom_fields[CUSTOM_FIELD_THEME_CODE], "");
        assert_eq!(bill.custom_fields[CUSTOM_FIELD_PAY_SOURCES_FILTER], "qw");
    }

    #[test]
    fn status_without_value_decodes() {
        let bill: Bill = serde_json::from_value(json!({
            "status": { "changedDateTime": "2019-08-28T16:26:36.835+03:00" }
        }))
        .unwrap();

        assert_eq!(bill.status_value(), None);
        assert!(!bill.is_final());
        assert!(bill.status.unwrap().changed_time().unwrap().is_some());
    }

    #[test]
    fn unknown_status_is_kept_and_not_final() {
        let bill: Bill =
            serde_json::from_value(json!({ "status": { "value": "PARTIAL" } })).unwrap();

        assert_eq!(
            bill.status_value(),
            Some(BillStatusValue::Other("PARTIAL".into()))
        );
        assert!(!bill.is_final());
        assert_eq!(
            serde_json::to_value(&bill).unwrap(),
            json!({ "status": { "value": "PARTIAL" } })
        );
    }

    #[test]
    fn unknown_currency_is_kept() {
        let bill: Bill = serde_json::from_value(json!({
            "amount": { "value": "5.00", "currency": "USD" }
        }))
        .unwrap();

        let amount = bill.amount.unwrap();
        assert_eq!(amount.currency, Currency::Other("USD".into()));
        assert_eq!(amount.currency.code(), "USD");
        assert_eq!(
            serde_json::to_value(&amount).unwrap(),
            json!({ "value": "5.00", "currency": "USD" })
        );
    }

    #[test]
    fn partial_amount_decodes() {
        let bill: Bill =
            serde_json::from_value(json!({ "amount": { "value": "5.00" } })).unwrap();

        let amount = bill.amount.unwrap();
        assert!(amount.currency.is_empty());
        assert_eq!(
            serde_json::to_value(&amount).unwrap(),
            json!({ "value": "5.00" })
        );
    }

    #[test]
    fn known_codes_map_to_variants() {
        assert_eq!(Currency::from("KZT".to_string()), Currency::Kzt);
        assert_eq!(String::from(Currency::Rub), "RUB");
        assert_eq!(BillStatusValue::from("PAID".to_string()), BillStatusValue::Paid);
    }
}
