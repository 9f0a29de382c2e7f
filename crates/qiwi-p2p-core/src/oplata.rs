//! Parameters of the hosted payment form.
//!
//! Instead of creating a bill over the API, a merchant can redirect the
//! customer to `oplata.qiwi.com/create` with the bill described in the query
//! string. The API cannot vouch that such bills were issued by the merchant.

use chrono::{DateTime, TimeZone};

use crate::bill::{
    CustomFields, PaySource, CUSTOM_FIELD_PAY_SOURCES_FILTER, CUSTOM_FIELD_THEME_CODE,
};
use crate::datetime::format_lifetime;
use crate::ids::BillId;

/// Optional parameters of a hosted-form bill.
///
/// Unset and empty values are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OplataOptions {
    /// Merchant-side bill identifier.
    pub bill_id: Option<BillId>,
    /// Amount, at most 6 integer and 2 fraction digits, e.g. `"123456.78"`.
    pub amount: Option<String>,
    /// Customer phone in international format.
    pub phone: Option<String>,
    /// Customer e-mail.
    pub email: Option<String>,
    /// Customer identifier in the merchant's system.
    pub account: Option<String>,
    /// Comment, up to 255 characters.
    pub comment: Option<String>,
    /// Extra parameters, up to 255 characters in total.
    pub custom_fields: CustomFields,
    /// Moscow-time expiry in `YYYY-MM-DDTHHMMSS`, see [`format_lifetime`].
    ///
    /// Bills are expired by the service after 45 days regardless.
    pub lifetime: Option<String>,
    /// Where to send the customer after a successful payment.
    pub success_url: Option<String>,
}

impl OplataOptions {
    /// Set the bill identifier.
    #[must_use]
    pub fn with_bill_id(mut self, bill_id: impl Into<BillId>) -> Self {
        self.bill_id = Some(bill_id.into());
        self
    }

    /// Set the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Set the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the expiry from an instant.
    #[must_use]
    pub fn with_lifetime<Tz: TimeZone>(mut self, expires_at: &DateTime<Tz>) -> Self {
        self.lifetime = Some(format_lifetime(expires_at));
        self
    }

    /// Set the success redirect.
    #[must_use]
    pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = Some(url.into());
        self
    }

    /// Restrict the payment sources offered by the form.
    #[must_use]
    pub fn with_pay_sources(mut self, sources: &[PaySource]) -> Self {
        self.custom_fields.insert(
            CUSTOM_FIELD_PAY_SOURCES_FILTER.to_string(),
            PaySource::filter(sources),
        );
        self
    }

    /// Select a personalised form theme.
    #[must_use]
    pub fn with_theme_code(mut self, code: impl Into<String>) -> Self {
        self.custom_fields
            .insert(CUSTOM_FIELD_THEME_CODE.to_string(), code.into());
        self
    }

    /// Query parameters for the set fields, in field order.
    ///
    /// Custom fields flatten to `customFields[<key>]`.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let scalar = [
            ("billId", self.bill_id.as_ref().map(BillId::as_str)),
            ("amount", self.amount.as_deref()),
            ("phone", self.phone.as_deref()),
            ("email", self.email.as_deref()),
            ("account", self.account.as_deref()),
            ("comment", self.comment.as_deref()),
            ("lifetime", self.lifetime.as_deref()),
            ("successUrl", self.success_url.as_deref()),
        ];

        let mut pairs: Vec<(String, String)> = scalar
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .filter(|v| !v.is_empty())
                    .map(|v| (key.to_string(), v.to_string()))
            })
            .collect();

        pairs.extend(
            self.custom_fields
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (format!("customFields[{k}]"), v.clone())),
        );

        pairs
    }
}
