// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Form encoding of the OID protocol.
//!
//! Reads and writes both use `&`-joined `OID{id}={value}` pairs. A write
//! must end with the literal `&submit=Submit` token expected by the
//! device's web form handler.

use crate::error::ParseError;
use crate::oid::{Field, OidRegistry};

/// Prefix of every OID key on the wire.
pub const OID_PREFIX: &str = "OID";

/// Trailing token appended to every write.
pub const SUBMIT_SUFFIX: &str = "&submit=Submit";

/// Parses a bulk read response into `(field, raw value)` pairs.
///
/// A single trailing line break is dropped. Empty segments, keys without
/// the `OID` prefix and OIDs missing from the registry are ignored. Values
/// are returned exactly as received.
///
/// # Errors
///
/// Returns `ParseError::MalformedSegment` if any non-empty segment lacks
/// an `=`; nothing is returned in that case.
///
/// # Examples
///
/// ```
/// use proliphix_lib::oid::Field;
/// use proliphix_lib::protocol::parse_read_response;
///
/// let pairs = parse_read_response("OID4.1.13=715&OID9.9=x&").unwrap();
/// assert_eq!(pairs, vec![(Field::AverageTemp, "715".to_string())]);
/// ```
pub fn parse_read_response(body: &str) -> Result<Vec<(Field, String)>, ParseError> {
    let body = body
        .strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body);
    let mut pairs = Vec::new();
    for segment in body.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| ParseError::MalformedSegment(segment.to_string()))?;
        let Some(oid) = key.strip_prefix(OID_PREFIX) else {
            tracing::trace!(key = %key, "Ignoring key without OID prefix");
            continue;
        };
        match Field::from_oid(oid) {
            Some(field) => pairs.push((field, value.to_string())),
            None => tracing::trace!(oid = %oid, "Ignoring unregistered OID"),
        }
    }
    Ok(pairs)
}

/// Builds the body of a write request.
///
/// Names the registry does not know are dropped. Keys and values are
/// form-encoded.
///
/// # Examples
///
/// ```
/// use proliphix_lib::protocol::encode_write_form;
///
/// let body = encode_write_form([("SetbackHeat", "691"), ("Bogus", "1")]);
/// assert_eq!(body, "OID4.1.5=691&submit=Submit");
/// ```
pub fn encode_write_form<'a, I, V>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: AsRef<str>,
{
    let mut body = fields
        .into_iter()
        .filter_map(|(name, value)| {
            let Some(oid) = OidRegistry::name_to_oid(name) else {
                tracing::trace!(name = %name, "Dropping unregistered field from write");
                return None;
            };
            let key = format!("{OID_PREFIX}{oid}");
            Some(format!(
                "{}={}",
                urlencoding::encode(&key),
                urlencoding::encode(value.as_ref())
            ))
        })
        .collect::<Vec<_>>()
        .join("&");
    body.push_str(SUBMIT_SUFFIX);
    body
}
