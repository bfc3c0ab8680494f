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

use config::{File, FileFormat};
use eyre::Report;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::login::types::{DEFAULT_AUTH0_URL, DEFAULT_GITHUB_URL, Endpoints};

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Target cluster
    #[serde(default)]
    pub cluster: ClusterSection,

    /// Auth0 tenant
    #[serde(default)]
    pub auth0: ProviderSection,

    /// GitHub
    #[serde(default)]
    pub github: ProviderSection,

    /// HTTP client
    #[serde(default)]
    pub http: HttpSection,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ClusterSection {
    pub url: Option<String>,

    #[serde(default)]
    pub insecure: bool,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ProviderSection {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpSection {
    /// Single request timeout in seconds, `0` disables it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Whole login timeout in seconds, `0` disables it.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            timeout: default_timeout(),
        }
    }
}

impl HttpSection {
    pub fn request_timeout(&self) -> Option<Duration> {
        seconds(self.request_timeout)
    }

    pub fn timeout(&self) -> Option<Duration> {
        seconds(self.timeout)
    }
}

fn seconds(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_timeout() -> u64 {
    120
}

impl Config {
    pub fn new(path: Option<PathBuf>) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        builder = builder
            .set_default("auth0.url", DEFAULT_AUTH0_URL)?
            .set_default("github.url", DEFAULT_GITHUB_URL)?;
        if let Some(path) = path {
            if path.is_file() {
                builder = builder.add_source(File::from(path).format(FileFormat::Ini));
            } else {
                return Err(eyre::eyre!("config file {} does not exist", path.display()));
            }
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn endpoints(&self) -> Endpoints {
        let defaults = Endpoints::default();
        Endpoints {
            auth0_url: self.auth0.url.clone().unwrap_or(defaults.auth0_url),
            github_url: self.github.url.clone().unwrap_or(defaults.github_url),
        }
    }
}
