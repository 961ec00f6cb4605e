//
// Copyright (C) 2025 The Android Open-Source Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single-use completion token joining a UI-thread action with a blocked caller.
//!
//! Each rendezvous gets its own channel, so independent waits can never satisfy each other. The
//! producer side consumes itself on completion, making a double release unrepresentable.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

/// Create a fresh single-producer/single-consumer rendezvous.
pub fn channel() -> (Completer, Waiter) {
    let (tx, rx) = mpsc::sync_channel(1);
    (Completer { tx }, Waiter { rx })
}

/// The producer half. Dropping it without calling `complete` abandons the waiter.
pub struct Completer {
    tx: mpsc::SyncSender<()>,
}

impl Completer {
    /// Release the waiter. A no-op if the waiter already gave up.
    pub fn complete(self) {
        let _ = self.tx.try_send(());
    }
}

/// The consumer half.
pub struct Waiter {
    rx: mpsc::Receiver<()>,
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The completer fired.
    Completed,
    /// The completer was dropped without firing; the awaited action may still be pending.
    Abandoned,
    /// The deadline passed first. Only produced by `wait_timeout`.
    TimedOut,
}

impl Waiter {
    /// Block until the completer fires or is dropped.
    pub fn wait(self) -> WaitOutcome {
        match self.rx.recv() {
            Ok(()) => WaitOutcome::Completed,
            Err(_) => WaitOutcome::Abandoned,
        }
    }

    /// Block until the completer fires, is dropped, or `timeout` elapses.
    pub fn wait_timeout(self, timeout: Duration) -> WaitOutcome {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => WaitOutcome::Completed,
            Err(RecvTimeoutError::Disconnected) => WaitOutcome::Abandoned,
            Err(RecvTimeoutError::Timeout) => WaitOutcome::TimedOut,
        }
    }
}
