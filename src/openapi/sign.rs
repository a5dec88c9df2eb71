//! RPC-style request signing for Alibaba Cloud OpenAPI.
//!
//! The provider signs GET requests by percent-encoding every query
//! parameter, joining them in byte order, wrapping the result in a
//! `StringToSign`, and attaching a base64 HMAC-SHA1 over it as the
//! `Signature` parameter. The HMAC key is the AccessKey secret with a
//! trailing `&`.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;

// RFC 3986 unreserved characters stay literal, everything else is escaped.
const ESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, ESCAPED).to_string()
}

/// Parameters joined as `k=v` pairs in byte order of the keys. `BTreeMap`
/// already iterates in that order, which is exactly the order the
/// signature scheme requires.
pub fn canonical_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn string_to_sign(method: &str, canonical_query: &str) -> String {
    format!(
        "{}&{}&{}",
        method,
        percent_encode("/"),
        percent_encode(canonical_query)
    )
}

pub fn signature(method: &str, canonical_query: &str, access_key_secret: &str) -> String {
    let payload = string_to_sign(method, canonical_query);

    let mut mac = Hmac::<Sha1>::new_from_slice(format!("{access_key_secret}&").as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());

    STANDARD.encode(mac.finalize().into_bytes())
}
