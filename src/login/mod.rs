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
//! DC/OS login flow.
//!
//! 1. The cluster `/login` endpoint redirects to Auth0, the final URL carries
//!    the `cluster_id` and `client` identifiers.
//! 2. Auth0 `/authorize` (GitHub connection) renders the GitHub login form with
//!    the CSRF token.
//! 3. Credentials are posted to GitHub. When the OAuth application was
//!    authorized before GitHub links back to the cluster, otherwise the
//!    authorize form is confirmed.
//! 4. The cluster page exposes the ACS token in its last inline script.

use tokio_util::sync::CancellationToken;
use tracing::debug;

pub mod error;
pub mod types;

use crate::http::{HttpResponse, SessionClient};
use crate::markup::{Document, Occurrence};
use crate::token;

pub use crate::login::error::LoginError;
pub use crate::login::types::*;

const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
const CSRF_INPUT: &str = r#"input[name="authenticity_token"]"#;
const LOGIN_REDIRECT_LINK: &str = ".container div p a";
const AUTHORIZE_FORM: &str = r#"form[action="/login/oauth/authorize"]"#;
const TOKEN_SCRIPT: &str = r#"script[type="text/javascript"]"#;

/// Single login attempt.
///
/// Owns the session (and therefore the cookies) of the attempt; concurrent
/// attempts must use separate flows.
#[derive(Debug)]
pub struct LoginFlow {
    client: SessionClient,
    endpoints: Endpoints,
}

impl LoginFlow {
    pub fn new(options: &LoginOptions, cancel: CancellationToken) -> Result<Self, LoginError> {
        let client = SessionClient::new(&options.session_options(), cancel)
            .map_err(|source| LoginError::ClientBuild { source })?;
        Ok(Self {
            client,
            endpoints: options.endpoints.clone(),
        })
    }

    /// Run through the whole flow and return the ACS token.
    pub async fn run(
        &self,
        cluster_url: &str,
        credentials: &Credentials,
    ) -> Result<String, LoginError> {
        let identity = self.initiate_login(cluster_url).await?;
        let csrf_token = self.initiate_auth0(identity).await?;
        self.github_authenticate(csrf_token, credentials).await
    }

    /// Hit the cluster login endpoint to retrieve the cluster and client IDs.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn initiate_login(&self, cluster_url: &str) -> Result<ClusterIdentity, LoginError> {
        let res = self
            .client
            .get(
                &format!("{}/login", cluster_url.trim_end_matches('/')),
                &[("redirect_uri", OOB_REDIRECT_URI)],
            )
            .await
            .map_err(LoginError::http(LoginStep::Initiate))?;

        let identity = parse_cluster_identity(&res)?;
        debug!(
            cluster_id = %identity.cluster_id,
            client_id = %identity.client_id,
            "cluster identified"
        );
        Ok(identity)
    }

    /// Initiate the Auth0 session to get the GitHub CSRF token.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn initiate_auth0(&self, identity: ClusterIdentity) -> Result<String, LoginError> {
        let res = self
            .client
            .get(
                &self.endpoints.auth0_authorize(),
                &[
                    ("scope", "openid email"),
                    ("response_type", "token"),
                    ("connection", "github"),
                    ("cluster_id", identity.cluster_id.as_str()),
                    ("client_id", identity.client_id.as_str()),
                    ("owp", "true"),
                ],
            )
            .await
            .map_err(LoginError::http(LoginStep::AuthorizeSession))?;

        extract_csrf_token(&res.body)
    }

    /// Authenticate with GitHub and get the ACS token back.
    #[tracing::instrument(level = "debug", skip_all)]
    async fn github_authenticate(
        &self,
        csrf_token: String,
        credentials: &Credentials,
    ) -> Result<String, LoginError> {
        let res = self
            .client
            .post_form(
                &self.endpoints.github_session(),
                &[
                    ("login", credentials.username.as_str()),
                    ("password", credentials.password.as_str()),
                    ("authenticity_token", csrf_token.as_str()),
                ],
            )
            .await
            .map_err(LoginError::http(LoginStep::SubmitCredentials))?;

        let token_page = self.follow_login_redirect(res).await?;
        extract_token(&token_page.body)
    }

    async fn follow_login_redirect(&self, res: HttpResponse) -> Result<HttpResponse, LoginError> {
        match parse_authorization_decision(&res)? {
            Some(AuthorizationDecision::Granted { redirect }) => {
                debug!(%redirect, "application authorized, following login redirect");
                self.client
                    .get(redirect.as_str(), &[])
                    .await
                    .map_err(LoginError::http(LoginStep::FetchToken))
            }
            Some(AuthorizationDecision::NeedsConfirmation { fields }) => {
                debug!("GitHub asks for re-authorization");
                let mut form = vec![("authorize".to_string(), "1".to_string())];
                form.extend(fields);
                self.client
                    .post_form(&self.endpoints.github_oauth_authorize(), &form)
                    .await
                    .map_err(LoginError::http(LoginStep::ConfirmAuthorization))
            }
            None => Err(LoginError::UnexpectedResponse {
                dump: self.client.is_tracing().then(|| res.dump()),
            }),
        }
    }
}

/// Login using the options with a fresh session.
pub async fn login(
    options: &LoginOptions,
    cancel: CancellationToken,
) -> Result<String, LoginError> {
    let flow = LoginFlow::new(options, cancel)?;
    let run = flow.run(&options.cluster_url, &options.credentials);
    match options.timeout {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| LoginError::Timeout(limit))?,
        None => run.await,
    }
}

/// Identifiers of the cluster from the final URL of the login redirect.
pub fn parse_cluster_identity(res: &HttpResponse) -> Result<ClusterIdentity, LoginError> {
    let param = |parameter: &'static str| {
        res.query_param(parameter)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| LoginError::MissingIdentity {
                parameter,
                url: res.url.to_string(),
            })
    };
    Ok(ClusterIdentity {
        cluster_id: param("cluster_id")?,
        client_id: param("client")?,
    })
}

/// CSRF token of the GitHub login form.
pub fn extract_csrf_token(body: &str) -> Result<String, LoginError> {
    Document::parse(body)
        .find_attribute(CSRF_INPUT, "value")?
        .ok_or(LoginError::CsrfExtraction)
}

/// Classify the GitHub response to the credential submission. `None` when the
/// page has neither the login redirect link nor a single authorize form.
pub fn parse_authorization_decision(
    res: &HttpResponse,
) -> Result<Option<AuthorizationDecision>, LoginError> {
    let doc = Document::parse(&res.body);

    // Easy path, no re-authorization. An empty link would resolve to the page
    // itself.
    if let Some(href) = doc
        .find_attribute(LOGIN_REDIRECT_LINK, "href")?
        .filter(|href| !href.trim().is_empty())
    {
        return Ok(Some(AuthorizationDecision::Granted {
            redirect: res.url.join(&href)?,
        }));
    }

    if doc.count(AUTHORIZE_FORM)? != 1 {
        return Ok(None);
    }
    let mut fields = Vec::new();
    doc.each_form_field(AUTHORIZE_FORM, |name, value| {
        fields.push((name.to_string(), value.to_string()))
    })?;
    Ok(Some(AuthorizationDecision::NeedsConfirmation { fields }))
}

/// ACS token from the last inline script of the page.
pub fn extract_token(body: &str) -> Result<String, LoginError> {
    let script = Document::parse(body)
        .find_text(TOKEN_SCRIPT, Occurrence::Last)?
        .ok_or(token::TokenError::TokenExtraction)?;
    let payload = token::extract_payload(&script)?;
    Ok(token::decode_id_token(&payload)?)
}
