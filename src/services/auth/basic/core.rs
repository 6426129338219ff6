//! `Authorization: Basic` header parsing.
//!
//! This module only knows about headers. It never decides anything: a missing or
//! malformed header is reported as `None` and the gate decides what that means.

use axum::http::{HeaderMap, header};
use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use super::Credentials;

// Clients disagree on padding, so accept it either way.
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const BASIC_B64: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
// some clients send `-` and `_` in place of `+` and `/`
const BASIC_B64_URL: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Extract Basic credentials from request headers.
///
/// Accepted shape: optional spaces, the scheme `Basic` (any case), one or more
/// spaces, a base64 token (standard or URL-safe alphabet), optional trailing
/// spaces. The decoded bytes are read as UTF-8, with invalid sequences
/// replaced by U+FFFD, and split on the first `:`, so passwords may contain
/// colons.
pub fn parse(headers: &HeaderMap) -> Option<Credentials> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, token) = value.trim_start_matches(' ').split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let token = token.trim_matches(' ');
    if token.is_empty() {
        return None;
    }

    let decoded = BASIC_B64
        .decode(token)
        .or_else(|_| BASIC_B64_URL.decode(token))
        .ok()?;
    let decoded = String::from_utf8_lossy(&decoded);
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials::new(username, password))
}
