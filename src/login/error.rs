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

use std::time::Duration;

use thiserror::Error;

use crate::http::HttpClientError;
use crate::login::types::LoginStep;
use crate::markup::MarkupError;
use crate::token::TokenError;

/// Login flow error.
#[derive(Error, Debug)]
pub enum LoginError {
    /// Request of one of the flow steps failed.
    #[error("{step} failed: {source}")]
    Http {
        step: LoginStep,
        /// The source of the error.
        source: HttpClientError,
    },

    /// Cluster login redirect lacks one of the identifiers.
    #[error("login redirect `{url}` does not carry the `{parameter}` query parameter")]
    MissingIdentity { parameter: &'static str, url: String },

    #[error("unable to extract CSRF token from response")]
    CsrfExtraction,

    /// GitHub returned neither the login redirect nor the authorize form.
    #[error("unexpected GitHub response{}", dump.as_ref().map(|d| format!("\n{d}")).unwrap_or_default())]
    UnexpectedResponse {
        /// Raw response, only captured with tracing enabled.
        dump: Option<String>,
    },

    #[error(transparent)]
    Markup {
        /// The source of the error.
        #[from]
        source: MarkupError,
    },

    #[error(transparent)]
    Token {
        /// The source of the error.
        #[from]
        source: TokenError,
    },

    #[error("login did not complete within {0:?}")]
    Timeout(Duration),

    #[error("error parsing the url")]
    UrlParse {
        /// The source of the error.
        #[from]
        source: url::ParseError,
    },

    #[error("http client can not be built: {}", source)]
    ClientBuild {
        /// The source of the error.
        source: HttpClientError,
    },
}

impl LoginError {
    /// Wrap the request error with the step it happened in.
    pub fn http(step: LoginStep) -> impl FnOnce(HttpClientError) -> Self {
        move |source| Self::Http { step, source }
    }
}
