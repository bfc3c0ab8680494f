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
//! Cookie aware HTTP session.
//!
//! A single [`SessionClient`] is used for all requests of one login attempt so
//! that the cookies collected on the way (cluster, Auth0, GitHub) are sent back
//! exactly as a browser would do it.

use reqwest::redirect::Policy;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

pub mod error;
pub mod types;

pub use crate::http::error::HttpClientError;
pub use crate::http::types::{HttpResponse, MAX_REDIRECTS, SessionOptions};

/// HTTP client bound to one login attempt.
#[derive(Clone, Debug)]
pub struct SessionClient {
    client: reqwest::Client,
    trace: bool,
    cancel: CancellationToken,
}

impl SessionClient {
    /// Build a new session with an empty cookie store.
    pub fn new(
        options: &SessionOptions,
        cancel: CancellationToken,
    ) -> Result<Self, HttpClientError> {
        let trace = options.trace;
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(options.allow_insecure_tls)
            .redirect(Policy::custom(move |attempt| {
                if attempt.previous().len() >= MAX_REDIRECTS {
                    return attempt.error("stopped after 10 redirects");
                }
                if trace {
                    debug!(status = %attempt.status(), url = %attempt.url(), "following redirect");
                }
                attempt.follow()
            }));
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            trace,
            cancel,
        })
    }

    /// Whether raw exchanges are being traced.
    pub fn is_tracing(&self) -> bool {
        self.trace
    }

    /// GET the endpoint with the query parameters appended.
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpClientError> {
        let mut url = Url::parse(endpoint)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        if self.trace {
            debug!(method = "GET", %url, "sending request");
        }
        self.execute(self.client.get(url)).await
    }

    /// POST the fields as an urlencoded form.
    pub async fn post_form<F: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        fields: &F,
    ) -> Result<HttpResponse, HttpClientError> {
        let url = Url::parse(endpoint)?;
        if self.trace {
            debug!(method = "POST", %url, "sending request");
        }
        self.execute(self.client.post(url).form(fields)).await
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<HttpResponse, HttpClientError> {
        let exchange = async {
            let res = request.send().await?;
            HttpResponse::read(res).await
        };
        let res = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(HttpClientError::Cancelled),
            res = exchange => res?,
        };
        self.check_status(res)
    }

    fn check_status(&self, res: HttpResponse) -> Result<HttpResponse, HttpClientError> {
        if !(200..=206).contains(&res.status.as_u16()) {
            return Err(HttpClientError::Status {
                status: res.status,
                dump: self.trace.then(|| res.dump()),
            });
        }
        Ok(res)
    }
}
