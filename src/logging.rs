// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives, e.g. `SALOONLITE_LOG=saloonlite=trace`.
pub const LOG_ENV: &str = "SALOONLITE_LOG";

/// Installs the stderr subscriber; stdout stays free for command output.
pub fn init(verbose: bool) {
    let fallback = if verbose { "info,saloonlite=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
