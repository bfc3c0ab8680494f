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

use clap::Parser;
use color_eyre::eyre::{Report, Result, eyre};
use std::io;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use dcos_login::config::Config;
use dcos_login::{Credentials, LoginOptionsBuilder, login};

/// Login to a Community Edition DC/OS cluster using GitHub credentials and
/// print the ACS token.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// URL of the DC/OS master(s) (e.g https://example.com)
    #[arg(long, env = "CLUSTER_URL")]
    cluster_url: Option<String>,

    /// GitHub username used for logging in
    #[arg(short, long, env = "GH_USERNAME")]
    username: String,

    /// GitHub password used for logging in
    #[arg(short, long, env = "GH_PASSWORD", hide_env_values = true)]
    password: String,

    /// Set this when targeting a cluster with a self-signed certificate
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Enable debugging mode. This *WILL* print credentials.
    #[arg(long)]
    debug: bool,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity level. Repeat to increase level.
    #[arg(short, long, global=true, action = clap::ArgAction::Count, display_order = 920)]
    pub verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    color_eyre::install()?;
    let args = Args::parse();

    let level = match args.verbose {
        0 if args.debug => LevelFilter::DEBUG,
        0 => LevelFilter::WARN,
        1 if args.debug => LevelFilter::DEBUG,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(level);

    // build the tracing registry
    tracing_subscriber::registry().with(log_layer).init();

    let cfg = Config::new(args.config.clone())?;
    let cluster_url = args
        .cluster_url
        .or_else(|| cfg.cluster.url.clone())
        .ok_or_else(|| eyre!("cluster url must be given with --cluster-url or CLUSTER_URL"))?;

    let options = LoginOptionsBuilder::default()
        .cluster_url(cluster_url)
        .credentials(Credentials::new(args.username, args.password))
        .allow_insecure_tls(args.insecure || cfg.cluster.insecure)
        .trace(args.debug)
        .endpoints(cfg.endpoints())
        .request_timeout(cfg.http.request_timeout())
        .timeout(cfg.http.timeout())
        .build()?;
    debug!("Login options: {:?}", options);

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_interrupt(cancel.clone()));

    let token = login(&options, cancel).await?;
    println!("{token}");

    Ok(())
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    if signal::ctrl_c().await.is_ok() {
        cancel.cancel();
    }
}
