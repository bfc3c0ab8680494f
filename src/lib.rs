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
//! Unattended login to a DC/OS Community Edition cluster.
//!
//! The cluster delegates authentication to Auth0, which in turn delegates to
//! GitHub. None of these pages are meant to be driven programmatically, so the
//! crate replays what a browser would do: it follows the redirects with a
//! single cookie-aware session, scrapes the hidden form state out of the HTML
//! and finally decodes the ACS token the cluster frontend embeds in an inline
//! script.

pub mod config;
pub mod http;
pub mod login;
pub mod markup;
pub mod token;

pub use crate::login::{Credentials, LoginFlow, LoginOptions, LoginOptionsBuilder, login};
