//! Hosted payment form URL encoding.

use qiwi_p2p_core::OplataOptions;
use url::form_urlencoded;

/// Encode `options` plus the public key onto `endpoint`.
///
/// Parameters are sorted by name and form-urlencoded.
pub(crate) fn build_url(endpoint: &str, public_key: &str, options: &OplataOptions) -> String {
    let mut pairs = options.query_pairs();
    pairs.push(("publicKey".to_string(), public_key.to_string()));
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();

    format!("{endpoint}?{query}")
}
