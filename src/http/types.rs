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

use std::fmt::Write as _;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Version};
use url::Url;

use crate::http::error::HttpClientError;

/// Maximal number of redirects followed for a single request.
pub const MAX_REDIRECTS: usize = 10;

/// Session client options.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Skip TLS certificate validation (self-signed cluster endpoints).
    pub allow_insecure_tls: bool,

    /// Log every request and redirect and attach raw responses to errors.
    ///
    /// Raw responses may contain credentials and session cookies.
    pub trace: bool,

    /// Timeout of a single request including its redirects.
    pub request_timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            allow_insecure_tls: false,
            trace: false,
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// Final URL after following redirects.
    pub url: Url,
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub(super) async fn read(res: reqwest::Response) -> Result<Self, HttpClientError> {
        let url = res.url().clone();
        let status = res.status();
        let version = res.version();
        let headers = res.headers().clone();
        let body = res.text().await?;
        Ok(Self {
            url,
            status,
            version,
            headers,
            body,
        })
    }

    /// Query parameter of the final URL.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Raw wire-like representation of the response for troubleshooting.
    pub fn dump(&self) -> String {
        let mut out = format!("{:?} {}\r\n", self.version, self.status);
        for (name, value) in &self.headers {
            let _ = write!(
                out,
                "{}: {}\r\n",
                name,
                String::from_utf8_lossy(value.as_bytes())
            );
        }
        out.push_str("\r\n");
        out.push_str(&self.body);
        out
    }
}
