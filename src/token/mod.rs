// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! ACS token decoding.
//!
//! The DC/OS frontend exposes the token as a base64 encoded JSON document
//! assigned to a variable of an inline script. The token itself is not
//! verified, it is handed to the caller as is.

use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

pub mod error;

pub use crate::token::error::TokenError;

/// Pattern of the assignment carrying the payload, e.g.
/// `var value = atob("eyJ...");`.
pub const TOKEN_PATTERN: &str = r#"var value [^"]+"([^"]+)"[^;]*;"#;

static TOKEN_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN));

#[derive(Debug, Deserialize)]
struct TokenPayload {
    id_token: String,
}

/// Locate the encoded payload within the script text.
pub fn extract_payload(script: &str) -> Result<String, TokenError> {
    let re = TOKEN_RE.as_ref().map_err(Clone::clone)?;
    re.captures(script)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(TokenError::TokenExtraction)
}

/// Decode the standard base64 payload and return its `id_token`.
pub fn decode_id_token(payload: &str) -> Result<String, TokenError> {
    let raw = STANDARD.decode(payload)?;
    trace!("decoded token payload of {} bytes", raw.len());
    // Only an object may carry the token, sequences are rejected upfront
    let object: Map<String, Value> = serde_json::from_slice(&raw)?;
    let token: TokenPayload = serde_json::from_value(Value::Object(object))?;
    Ok(token.id_token)
}
