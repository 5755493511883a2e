// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Handles the session with the D-Bus system bus: connecting, subscribing to
//! the login manager's sleep/wake signal, and decoding its payload.

use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use dbus::arg::ArgType;
use dbus::blocking::Connection;
use dbus::message::MatchRule;
use dbus::message::MessageType;
use dbus::Message;
use thiserror::Error as ThisError;

/// The interface on which the login manager announces sleep/wake transitions.
pub const LOGIN_MANAGER_INTERFACE: &str = "org.freedesktop.login1.Manager";
/// The signal member announcing a sleep/wake transition. Its single boolean
/// argument is true when the system is about to suspend and false once it
/// has resumed.
pub const SLEEP_SIGNAL: &str = "PrepareForSleep";

/// Failure modes when extracting the transition value from a signal that
/// passed the interface and member filter.
#[derive(Debug, PartialEq, ThisError)]
pub enum DecodeError {
    #[error("signal carries no arguments")]
    NoArguments,
    #[error("signal argument has type {0:?}, expected a boolean")]
    NotBoolean(ArgType),
}

/// The BusSession trait hides the bus connection behind a polling interface
/// so that the monitor loop can run against a scripted session in tests.
pub trait BusSession {
    /// Waits up to |timeout| for the next message from the bus daemon.
    /// Returns Ok(None) if nothing arrived within the timeout. An error
    /// indicates the connection itself has failed.
    fn poll_once(&mut self, timeout: Duration) -> Result<Option<Message>>;
    /// Returns true if the monitor loop should stop.
    fn quit_request(&self) -> bool;
}

/// A GenuineSession owns the D-Bus connection used to receive sleep/wake
/// transitions from the login manager.
pub struct GenuineSession {
    connection: Connection,
}

impl GenuineSession {
    /// Opens a private connection to the system bus.
    pub fn open() -> Result<GenuineSession> {
        let connection =
            Connection::new_system().context("Failed to start system dbus connection")?;
        Ok(GenuineSession { connection })
    }

    /// Asks the bus daemon to deliver signals matching |interface| and
    /// |member| to this connection. The registration is a synchronous
    /// round-trip, so a rejected rule surfaces here rather than as silence
    /// later.
    pub fn subscribe(&self, interface: &str, member: &str) -> Result<()> {
        let rule = MatchRule::new_signal(interface, member);
        self.connection
            .add_match_no_cb(&rule.match_str())
            .with_context(|| format!("Failed to register match for {}.{}", interface, member))?;
        Ok(())
    }
}

impl BusSession for GenuineSession {
    fn poll_once(&mut self, timeout: Duration) -> Result<Option<Message>> {
        self.connection
            .channel()
            .blocking_pop_message(timeout)
            .context("Failed to read from system dbus connection")
    }

    // Always returns false, unless testing (see MockSession).
    fn quit_request(&self) -> bool {
        false
    }
}

/// Returns true if |message| is a sleep/wake signal from the login manager.
/// Method calls and replies never qualify, even with matching names.
pub fn is_sleep_signal(message: &Message) -> bool {
    if message.msg_type() != MessageType::Signal {
        return false;
    }
    let interface_matches = message
        .interface()
        .map_or(false, |interface| &*interface == LOGIN_MANAGER_INTERFACE);
    let member_matches = message
        .member()
        .map_or(false, |member| &*member == SLEEP_SIGNAL);
    interface_matches && member_matches
}

/// Extracts the transition value from a sleep/wake signal: true means the
/// system is preparing to suspend, false means it has just resumed.
pub fn decode_wake_payload(message: &Message) -> std::result::Result<bool, DecodeError> {
    let mut args = message.iter_init();
    match args.arg_type() {
        ArgType::Invalid => Err(DecodeError::NoArguments),
        ArgType::Boolean => args
            .read::<bool>()
            .map_err(|_| DecodeError::NotBoolean(ArgType::Boolean)),
        other => Err(DecodeError::NotBoolean(other)),
    }
}
