//! QIWI P2P Client SDK.
//!
//! This crate provides a client library for the QIWI P2P bills API
//! (<https://developer.qiwi.com/ru/p2p-payments/>): issue, fetch and cancel
//! bills, and build hosted payment form links.
//!
//! # Example
//!
//! ```no_run
//! use qiwi_p2p_client::{Amount, BillId, CreateBillRequest, Currency, QiwiP2pClient};
//!
//! # async fn example() -> Result<(), qiwi_p2p_client::ClientError> {
//! let client = QiwiP2pClient::new("your-public-key", "your-secret-key")?;
//!
//! let bill = client
//!     .create_bill(
//!         &BillId::new("order-42"),
//!         &CreateBillRequest::new(Amount::new("199.00", Currency::Rub))
//!             .with_comment("Order #42"),
//!     )
//!     .await?;
//!
//! println!("Redirect the customer to {:?}", bill.pay_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Transports
//!
//! HTTP goes through the [`Transport`] trait. [`ReqwestTransport`] is used by
//! default; [`QiwiP2pClient::with_transport`] accepts any other
//! implementation, including a plain function.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;
mod oplata;
mod transport;

pub use client::QiwiP2pClient;
pub use config::{ClientConfig, ClientOptions, DEFAULT_API_BASE_URL, DEFAULT_OPLATA_URL};
pub use error::ClientError;
pub use qiwi_p2p_core::{
    bill, datetime, format_datetime, format_lifetime, ids, moscow_offset, parse_datetime,
    parse_lifetime, Amount, AmountError, Bill, BillId, BillStatus, BillStatusValue,
    CreateBillRequest, Currency, CustomFields, Customer, DateTimeError, OplataOptions, PaySource,
    SiteId, CUSTOM_FIELD_PAY_SOURCES_FILTER, CUSTOM_FIELD_THEME_CODE, LIFETIME_FORMAT,
};
pub use reqwest::Method;
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
