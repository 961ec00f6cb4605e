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

//! # Native activity shim
//!
//! The glue between a platform activity hosting layer and a native rendering module. The hosting
//! layer creates an [`ActivityShim`] per activity instance and drives its lifecycle; application
//! threads use it to show blocking modal alerts on the UI-owning thread.
//!
//! Two jobs, nothing more:
//!
//! - Load the named native module once per process with an explicit, observable result, instead
//!   of an implicit load-at-class-init side effect that can only fail by crashing.
//! - Rendezvous an arbitrary caller thread with a modal dialog dismissed on the UI thread, using
//!   a fresh single-use completion token per alert so concurrent alerts stay independent.
//!
//! Everything platform-specific (the real dialog rendering, the looper integration) stays behind
//! the [`dialog::DialogHost`] trait and the UI-thread [`task::Handler`], keeping the shim's logic
//! testable without the host framework.

/// The host activity adapter and its UI-thread request handling.
pub mod activity;
/// Single-use completion tokens for caller/UI-thread rendezvous.
pub mod completion;
/// The modal dialog capability surface consumed from the host UI framework.
pub mod dialog;
/// Native module loading and the once-per-process bootstrap.
pub mod library_loader;
/// The single-threaded cooperative task queue for the UI-owning thread.
pub mod task;

pub use activity::{spawn_ui_thread, ActivityShim, ActivityState, ShimRequest};
pub use completion::WaitOutcome;
pub use dialog::{DialogHost, DialogSpec, DISMISS_BUTTON_LABEL};
pub use library_loader::{ModuleBootstrap, NATIVE_MODULE_NAME};
