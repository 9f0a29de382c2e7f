//! Core types and codecs for the QIWI P2P bills API.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Identifiers**: `BillId`, `SiteId`
//! - **Bills**: `Bill` (as returned by the API), `CreateBillRequest` (what a
//!   merchant may submit), `Customer`, `Amount`, `BillStatus`
//! - **Hosted form**: `OplataOptions` for the `oplata.qiwi.com/create` redirect
//! - **Timestamps**: the metadata codec (`format_datetime` / `parse_datetime`)
//!   and the lifetime codec (`format_lifetime` / `parse_lifetime`)
//!
//! # Two timestamp formats
//!
//! Bill metadata carries RFC 3339 timestamps with an explicit offset, e.g.
//! `2024-03-01T12:30:00.5+03:00`. The hosted form's `lifetime` parameter uses
//! a compact `YYYY-MM-DDTHHMMSS` wall clock in Moscow time (UTC+3).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bill;
pub mod datetime;
pub mod error;
pub mod ids;
pub mod oplata;

pub use bill::{
    Amount, Bill, BillStatus, BillStatusValue, CreateBillRequest, Currency, Customer,
    CustomFields, PaySource, CUSTOM_FIELD_PAY_SOURCES_FILTER, CUSTOM_FIELD_THEME_CODE,
};
pub use datetime::{
    format_datetime, format_lifetime, moscow_offset, parse_datetime, parse_lifetime,
    LIFETIME_FORMAT,
};
pub use error::{AmountError, DateTimeError};
pub use ids::{BillId, SiteId};
pub use oplata::OplataOptions;
