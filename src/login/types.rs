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

use std::fmt;
use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::http::SessionOptions;

/// Default Auth0 tenant used by DC/OS.
pub const DEFAULT_AUTH0_URL: &str = "https://dcos.auth0.com";

/// Default GitHub location.
pub const DEFAULT_GITHUB_URL: &str = "https://github.com";

/// GitHub credentials.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Base URLs of the identity providers.
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoints {
    pub auth0_url: String,
    pub github_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth0_url: DEFAULT_AUTH0_URL.into(),
            github_url: DEFAULT_GITHUB_URL.into(),
        }
    }
}

impl Endpoints {
    pub fn auth0_authorize(&self) -> String {
        format!("{}/authorize", self.auth0_url.trim_end_matches('/'))
    }

    pub fn github_session(&self) -> String {
        format!("{}/session", self.github_url.trim_end_matches('/'))
    }

    pub fn github_oauth_authorize(&self) -> String {
        format!("{}/login/oauth/authorize", self.github_url.trim_end_matches('/'))
    }
}

/// Parameters of a single login attempt.
#[derive(Builder, Clone, Debug)]
#[builder(setter(into))]
pub struct LoginOptions {
    /// URL of the DC/OS master(s)
    pub cluster_url: String,

    /// GitHub credentials
    pub credentials: Credentials,

    /// Accept self-signed cluster certificates
    #[builder(default)]
    pub allow_insecure_tls: bool,

    /// Trace requests and attach raw responses to errors. This *will* expose
    /// credentials in the output.
    #[builder(default)]
    pub trace: bool,

    #[builder(default)]
    pub endpoints: Endpoints,

    /// Timeout of every single request
    #[builder(default = "Some(Duration::from_secs(30))")]
    pub request_timeout: Option<Duration>,

    /// Timeout of the whole flow
    #[builder(default = "Some(Duration::from_secs(120))")]
    pub timeout: Option<Duration>,
}

impl LoginOptions {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            allow_insecure_tls: self.allow_insecure_tls,
            trace: self.trace,
            request_timeout: self.request_timeout,
        }
    }
}

/// Step of the login flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoginStep {
    /// Cluster login redirect
    Initiate,
    /// Auth0 authorize session
    AuthorizeSession,
    /// GitHub credential submission
    SubmitCredentials,
    /// GitHub application re-authorization
    ConfirmAuthorization,
    /// Cluster page carrying the token
    FetchToken,
}

impl fmt::Display for LoginStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initiate => "cluster login",
            Self::AuthorizeSession => "auth0 session initiation",
            Self::SubmitCredentials => "github authentication",
            Self::ConfirmAuthorization => "github re-authorization",
            Self::FetchToken => "login redirect",
        })
    }
}

/// Identifiers the cluster passes to Auth0.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterIdentity {
    pub cluster_id: String,
    pub client_id: String,
}

/// Shape of the GitHub response to the credential submission.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthorizationDecision {
    /// The application is authorized already, the page links back to the
    /// cluster.
    Granted { redirect: Url },

    /// GitHub asks to authorize the application again. Fields of the form in
    /// document order.
    NeedsConfirmation { fields: Vec<(String, String)> },
}
