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

use reqwest::StatusCode;
use thiserror::Error;

/// Session client error.
#[derive(Error, Debug)]
pub enum HttpClientError {
    /// Network or TLS level failure.
    #[error("transport error: {}", source)]
    Transport {
        /// The source of the error.
        #[from]
        source: reqwest::Error,
    },

    /// The final response status is outside of `200..=206`.
    #[error("expected status 200 <= code <= 206, got {status}{}", dump.as_ref().map(|d| format!("\n{d}")).unwrap_or_default())]
    Status {
        /// Status code of the final response.
        status: StatusCode,
        /// Raw response, only captured with tracing enabled.
        dump: Option<String>,
    },

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    #[error("error parsing the url")]
    UrlParse {
        /// The source of the error.
        #[from]
        source: url::ParseError,
    },
}

impl HttpClientError {
    /// Status code carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source } => source.status(),
            _ => None,
        }
    }
}
