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

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use std::{
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

use crate::completion::{self, WaitOutcome, Waiter};
use crate::dialog::{DialogHost, DialogSpec};
use crate::library_loader::{ModuleBootstrap, NATIVE_MODULE_NAME};
use crate::task::{Handler, HandlerCallback, Sender};

/// Requests the shim posts to the UI-owning thread.
pub enum ShimRequest {
    ShowAlert { message: String, done: completion::Completer },
}

/// UI-thread-owned state of the shim. Handles posted requests by driving the host's dialog
/// surface; runs exclusively on the thread its `Handler` was created on.
pub struct ActivityState<H: DialogHost> {
    app_label: String,
    dialog_host: H,
}

impl<H: DialogHost> ActivityState<H> {
    pub fn new(app_label: impl Into<String>, dialog_host: H) -> Self {
        Self { app_label: app_label.into(), dialog_host }
    }
}

impl<H: DialogHost> HandlerCallback<ShimRequest> for ActivityState<H> {
    fn handle_task(&mut self, task: ShimRequest) -> Result<()> {
        match task {
            ShimRequest::ShowAlert { message, done } => {
                let spec = DialogSpec::modal_alert(self.app_label.clone(), message);
                self.dialog_host.show_dialog(spec, done)
            }
        }
    }
}

/// Spawn a dedicated UI-owning thread running the shim's task loop and return a sender for it.
/// The thread exits once every sender has been dropped.
pub fn spawn_ui_thread<H: DialogHost + 'static>(
    app_label: impl Into<String>,
    dialog_host: H,
) -> Result<Sender<ShimRequest>> {
    let app_label = app_label.into();
    let (sender_tx, sender_rx) = mpsc::channel();
    thread::Builder::new()
        .name("activity-ui".to_string())
        .spawn(move || {
            let (handler, sender) =
                Handler::new_on_current_thread(ActivityState::new(app_label, dialog_host));
            // The receiver is alive until this function returns a sender or fails.
            let _ = sender_tx.send(sender);
            if let Err(e) = handler.run_loop() {
                error!("The UI task loop terminated: {:#}", e);
            }
        })
        .context("Failed to spawn the UI thread")?;
    sender_rx.recv().context("The UI thread exited before handing out a sender")
}

/// The caller-side activity adapter. The host's activity hosting layer drives `on_create`;
/// application code running off the UI thread calls `show_modal_message`.
///
/// Cloning is cheap and clones share the module bootstrap state, so concurrent alerts from
/// several threads each get their own rendezvous.
#[derive(Clone)]
pub struct ActivityShim {
    sender: Sender<ShimRequest>,
    bootstrap: Arc<ModuleBootstrap>,
}

impl ActivityShim {
    /// A shim bootstrapping the default native rendering module.
    pub fn new(sender: Sender<ShimRequest>) -> Self {
        Self::with_module(sender, NATIVE_MODULE_NAME)
    }

    pub fn with_module(sender: Sender<ShimRequest>, module_name: &str) -> Self {
        Self { sender, bootstrap: Arc::new(ModuleBootstrap::new(module_name)) }
    }

    /// Host lifecycle entry point, invoked once per activity instance after any saved-state
    /// restoration. Loads the native module; a load failure is surfaced to the hosting layer
    /// instead of crashing the process. Idempotent across repeated creation.
    pub fn on_create(&self) -> Result<()> {
        self.bootstrap.load()?;
        info!("Activity created; native module {} is loaded", self.bootstrap.library_name());
        Ok(())
    }

    /// Entry point lookup in the bootstrapped module, for the hosting layer.
    pub fn find_module_symbol(&self, symbol_name: &str) -> Result<*mut std::ffi::c_void> {
        self.bootstrap.find_symbol(symbol_name)
    }

    /// Show a modal alert and block the calling thread until the user dismisses it.
    ///
    /// Must be called off the UI-owning thread; a call from the UI thread fails fast instead of
    /// deadlocking on a task that could never run. Resumption is strictly ordered after the
    /// user's dismissal, but there is no bound on how soon the dialog appears.
    ///
    /// If the UI side abandons the rendezvous the call returns Ok anyway; the dialog may then
    /// still be on screen. Lossy, kept for parity with dismissal-only callers.
    pub fn show_modal_message(&self, message: &str) -> Result<()> {
        let waiter = self.post_alert(message)?;
        if waiter.wait() == WaitOutcome::Abandoned {
            warn!("The alert rendezvous was abandoned before dismissal; continuing");
        }
        Ok(())
    }

    /// Like `show_modal_message`, but gives up waiting after `timeout`. Returns Ok(false) when
    /// the deadline passed with the dialog still pending; the dialog itself is not torn down.
    pub fn show_modal_message_timeout(&self, message: &str, timeout: Duration) -> Result<bool> {
        let waiter = self.post_alert(message)?;
        match waiter.wait_timeout(timeout) {
            WaitOutcome::Completed => Ok(true),
            WaitOutcome::Abandoned => {
                warn!("The alert rendezvous was abandoned before dismissal; continuing");
                Ok(true)
            }
            WaitOutcome::TimedOut => {
                warn!("Gave up waiting for dialog dismissal after {:?}", timeout);
                Ok(false)
            }
        }
    }

    fn post_alert(&self, message: &str) -> Result<Waiter> {
        if thread::current().id() == self.sender.thread_id() {
            bail!(
                "show_modal_message called on the UI-owning thread; \
                 the wait would deadlock the process"
            );
        }
        let (done, waiter) = completion::channel();
        self.sender
            .send(ShimRequest::ShowAlert { message: message.to_string(), done })
            .context("Failed to post the alert task to the UI thread")?;
        Ok(waiter)
    }
}
