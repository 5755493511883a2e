// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Implements the monitor loop that waits for sleep/wake transitions on a
//! bus session and reports each wake on the output stream.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use chrono::DateTime;
use chrono::Local;
use log::debug;
use log::warn;

use crate::bus::decode_wake_payload;
use crate::bus::is_sleep_signal;
use crate::bus::BusSession;
use crate::bus::SLEEP_SIGNAL;

/// How long one turn of the loop waits for bus traffic before checking
/// again. The bounded wait doubles as the idle back-off, so a quiet bus
/// costs one wakeup per period.
const POLL_PERIOD: Duration = Duration::from_secs(1);

/// ctime-style timestamp layout. chrono renders weekday and month names as
/// fixed English strings, so the output does not vary with the locale.
const HUMAN_TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// How a wake transition is reported on the output stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputMode {
    /// The literal word "woken".
    #[default]
    Plain,
    /// Seconds since the Unix epoch, as a decimal integer.
    UnixTimestamp,
    /// Wall-clock time in a fixed human-readable form.
    HumanTimestamp,
}

/// Options taken from the command line affecting the monitor.
#[derive(Default)]
pub struct MonitorOptions {
    /// The report format for wake transitions.
    pub mode: OutputMode,
}

/// The Clock trait allows tests to substitute a scripted wall clock.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Always reads the real wall clock, unless testing (see MockClock).
pub struct GenuineClock {}

impl Clock for GenuineClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A WakeMonitor drives a bus session and writes one line per wake
/// transition to its output stream.
pub struct WakeMonitor<'a> {
    session: Box<dyn BusSession>,
    clock: Box<dyn Clock>,
    mode: OutputMode,
    out: &'a mut dyn Write,
}

impl<'a> WakeMonitor<'a> {
    pub fn new(
        session: Box<dyn BusSession>,
        clock: Box<dyn Clock>,
        mode: OutputMode,
        out: &'a mut dyn Write,
    ) -> WakeMonitor<'a> {
        WakeMonitor {
            session,
            clock,
            mode,
            out,
        }
    }

    /// Runs the monitor loop. With a genuine session this never returns
    /// under normal operation: per-message problems are logged and
    /// swallowed, and only a failed bus connection or a failed write to the
    /// output stream propagates an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            if self.session.quit_request() {
                return Ok(());
            }
            let message = match self.session.poll_once(POLL_PERIOD)? {
                Some(message) => message,
                None => continue,
            };
            if !is_sleep_signal(&message) {
                match message.member() {
                    // The bus daemon tells every new connection which name
                    // it acquired; do not report it to avoid spam.
                    Some(member) if &*member == "NameAcquired" => {
                        debug!("ignoring NameAcquired signal")
                    }
                    _ => warn!("unexpected message on filtered connection: {:?}", message),
                }
                continue;
            }
            match decode_wake_payload(&message) {
                Ok(false) => self.report_wake()?,
                Ok(true) => debug!("system is preparing to sleep"),
                Err(e) => warn!("ignoring malformed {} signal: {}", SLEEP_SIGNAL, e),
            }
        }
    }

    // Writes the report line for one wake transition. Flushes immediately so
    // that a consumer reading through a pipe sees the line without delay.
    fn report_wake(&mut self) -> Result<()> {
        let now = self.clock.now();
        let line = match self.mode {
            OutputMode::Plain => "woken".to_string(),
            OutputMode::UnixTimestamp => now.timestamp().to_string(),
            OutputMode::HumanTimestamp => now.format(HUMAN_TIMESTAMP_FORMAT).to_string(),
        };
        writeln!(self.out, "{}", line).context("Failed to write wake report")?;
        self.out.flush().context("Failed to flush wake report")?;
        Ok(())
    }
}
