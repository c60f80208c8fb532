// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementation for communicating with Proliphix thermostats.
//!
//! The thermostat speaks form-encoded OID pairs over two HTTP endpoints:
//!
//! - `POST /get` reads a batch of OIDs
//! - `POST /pdp` writes one or more OIDs
//!
//! [`Protocol`] abstracts the transport so the client can be driven by
//! [`HttpClient`] or by any other implementation.

mod form;
#[cfg(feature = "http")]
mod http;

pub use form::{OID_PREFIX, SUBMIT_SUFFIX, encode_write_form, parse_read_response};
#[cfg(feature = "http")]
pub use http::{Credentials, HttpClient, HttpConfig};

use crate::error::ProtocolError;

/// Path of the bulk read endpoint.
pub const READ_PATH: &str = "/get";

/// Path of the write endpoint.
pub const WRITE_PATH: &str = "/pdp";

/// Trait for transports that carry OID requests to a thermostat.
///
/// Each call is one independent request; implementations hold no session
/// state between calls.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Posts a bulk read query and returns the raw response body.
    ///
    /// # Arguments
    ///
    /// * `query` - Form body listing the OIDs to read
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails.
    async fn read(&self, query: &str) -> Result<String, ProtocolError>;

    /// Posts a write form. The response body is not inspected.
    ///
    /// # Arguments
    ///
    /// * `form` - Form body including the trailing submit token
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails.
    async fn write(&self, form: &str) -> Result<(), ProtocolError>;
}
