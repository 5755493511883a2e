// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Listing for wake monitor library components.

pub mod bus;
pub mod monitor;

use std::io::stdout;

use anyhow::Result;
use log::info;

use crate::bus::GenuineSession;
use crate::bus::LOGIN_MANAGER_INTERFACE;
use crate::bus::SLEEP_SIGNAL;
use crate::monitor::GenuineClock;
use crate::monitor::WakeMonitor;

pub use monitor::MonitorOptions;
pub use monitor::OutputMode;

/// Watch the system bus for wake-from-sleep transitions and report each one
/// on stdout. Under normal operation this function never returns.
pub fn monitor(options: MonitorOptions) -> Result<()> {
    let session = GenuineSession::open()?;
    session.subscribe(LOGIN_MANAGER_INTERFACE, SLEEP_SIGNAL)?;
    info!(
        "monitoring {} for {} signals",
        LOGIN_MANAGER_INTERFACE, SLEEP_SIGNAL
    );
    let mut out = stdout();
    let mut monitor = WakeMonitor::new(
        Box::new(session),
        Box::new(GenuineClock {}),
        options.mode,
        &mut out,
    );
    monitor.run()
}
