//! Common test utilities for QIWI P2P client tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::{Arc, Mutex};

use qiwi_p2p_client::{
    ClientOptions, QiwiP2pClient, TransportError, TransportRequest, TransportResponse,
};
use serde_json::{json, Value};

pub const PUBLIC_KEY: &str = "pk_test";
pub const SECRET_KEY: &str = "sk_test";

/// Requests seen by a recording transport.
pub type Recorded = Arc<Mutex<Vec<TransportRequest>>>;

/// Install a tracing subscriber honouring `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A bill as the API returns it.
pub fn sample_bill_json(bill_id: &str, status: &str) -> Value {
    json!({
        "siteId": "23044",
        "billId": bill_id,
        "amount": { "value": "100.00", "currency": "RUB" },
        "status": { "value": status, "changedDateTime": "2018-03-05T11:27:41.000+03:00" },
        "comment": "Text comment",
        "customFields": {},
        "creationDateTime": "2018-03-05T11:27:41.000+03:00",
        "expirationDateTime": "2018-04-13T14:30:00.000+03:00",
        "payUrl": format!("https://oplata.qiwi.com/form/?invoice_uid={bill_id}")
    })
}

/// Client whose transport records every request and answers with `status`/`body`.
pub fn recording_client(status: u16, body: impl Into<Vec<u8>>) -> (QiwiP2pClient, Recorded) {
    let recorded: Recorded = Arc::default();
    let body = body.into();

    let sink = Arc::clone(&recorded);
    let transport = move |request: TransportRequest| -> Result<TransportResponse, TransportError> {
        sink.lock().unwrap().push(request);
        Ok(TransportResponse::new(status, body.clone()))
    };

    let client =
        QiwiP2pClient::with_transport(PUBLIC_KEY, SECRET_KEY, ClientOptions::default(), transport);
    (client, recorded)
}
