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

use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use dcos_login::http::HttpClientError;
use dcos_login::login::LoginError;
use dcos_login::login::types::LoginStep;
use dcos_login::login;


use common::*;

#[tokio::test]
async fn test_login_direct_redirect() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("cluster_id=foo&client=bar").await;
    fixture
        .mount_auth0_authorize(auth0_page(Some(CSRF_TOKEN)), 1)
        .await;
    fixture
        .mount_github_session(fixture.redirect_page(), 1)
        .await;
    fixture.mount_token_page().await;

    let token = login(&fixture.options(false), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(ACS_TOKEN, token);
}

#[tokio::test]
async fn test_login_reauthorize() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("cluster_id=foo&client=bar").await;
    fixture
        .mount_auth0_authorize(auth0_page(Some(CSRF_TOKEN)), 1)
        .await;
    fixture.mount_github_session(authorize_form_page(), 1).await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/authorize"))
        .and(body_string_contains("authorize=1"))
        .and(body_string_contains("authenticity_token=csrf2"))
        .and(body_string_contains("client_id=auth0client"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/acs?code=2", fixture.cluster.uri())),
        )
        .expect(1)
        .mount(&fixture.github)
        .await;
    fixture.mount_token_page().await;

    let token = login(&fixture.options(false), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(ACS_TOKEN, token);
}

#[tokio::test]
async fn test_login_unexpected_github_response() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("cluster_id=foo&client=bar").await;
    fixture
        .mount_auth0_authorize(auth0_page(Some(CSRF_TOKEN)), 1)
        .await;
    fixture
        .mount_github_session(
            r#"<div class="flash flash-error">Incorrect username or password.</div>"#.into(),
            1,
        )
        .await;

    match login(&fixture.options(false), CancellationToken::new()).await {
        Err(LoginError::UnexpectedResponse { dump }) => assert!(dump.is_none()),
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn test_login_unexpected_github_response_traced() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("cluster_id=foo&client=bar").await;
    fixture
        .mount_auth0_authorize(auth0_page(Some(CSRF_TOKEN)), 1)
        .await;
    fixture
        .mount_github_session(
            r#"<div class="flash flash-error">Incorrect username or password.</div>"#.into(),
            1,
        )
        .await;

    match login(&fixture.options(true), CancellationToken::new()).await {
        Err(err @ LoginError::UnexpectedResponse { .. }) => {
            assert!(err.to_string().contains("Incorrect username or password."));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn test_login_missing_csrf() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("cluster_id=foo&client=bar").await;
    fixture.mount_auth0_authorize(auth0_page(None), 1).await;
    // Credentials must never be submitted
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fixture.github)
        .await;

    let err = login(&fixture.options(false), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LoginError::CsrfExtraction));
}

#[tokio::test]
async fn test_login_missing_identity() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("client=bar").await;
    fixture
        .mount_auth0_authorize(auth0_page(Some(CSRF_TOKEN)), 0)
        .await;

    match login(&fixture.options(false), CancellationToken::new()).await {
        Err(LoginError::MissingIdentity { parameter, url }) => {
            assert_eq!("cluster_id", parameter);
            assert!(url.starts_with(&fixture.auth0.uri()));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn test_login_status_error() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("cluster_id=foo&client=bar").await;
    Mock::given(method("GET"))
        .and(path("/authorize"))
        .and(wiremock::matchers::query_param("connection", "github"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&fixture.auth0)
        .await;
    fixture
        .mount_github_session(fixture.redirect_page(), 0)
        .await;

    match login(&fixture.options(false), CancellationToken::new()).await {
        Err(LoginError::Http {
            step: LoginStep::AuthorizeSession,
            source: HttpClientError::Status { status, dump },
        }) => {
            assert_eq!(StatusCode::SERVICE_UNAVAILABLE, status);
            assert!(dump.is_none());
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn test_login_token_page_without_token() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("cluster_id=foo&client=bar").await;
    fixture
        .mount_auth0_authorize(auth0_page(Some(CSRF_TOKEN)), 1)
        .await;
    fixture
        .mount_github_session(fixture.redirect_page(), 1)
        .await;
    Mock::given(method("GET"))
        .and(path("/acs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<script type="text/javascript">var value = 1;</script>"#,
        ))
        .mount(&fixture.cluster)
        .await;

    let err = login(&fixture.options(false), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LoginError::Token {
            source: dcos_login::token::TokenError::TokenExtraction
        }
    ));
}

#[tokio::test]
async fn test_login_timeout() {
    let fixture = Fixture::start().await;
    fixture.mount_cluster_login("cluster_id=foo&client=bar").await;
    Mock::given(method("GET"))
        .and(path("/authorize"))
        .and(wiremock::matchers::query_param("connection", "github"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&fixture.auth0)
        .await;

    let mut options = fixture.options(false);
    options.timeout = Some(Duration::from_millis(300));
    let err = login(&options, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, LoginError::Timeout(_)));
}

#[tokio::test]
async fn test_login_cancelled() {
    let fixture = Fixture::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fixture.cluster)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    match login(&fixture.options(false), cancel).await {
        Err(LoginError::Http {
            step: LoginStep::Initiate,
            source: HttpClientError::Cancelled,
        }) => {}
        other => panic!("unexpected result {other:?}"),
    }
}
