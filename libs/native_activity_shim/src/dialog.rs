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

use anyhow::Result;

use crate::completion::Completer;

/// Label of the single control a modal alert exposes.
pub const DISMISS_BUTTON_LABEL: &str = "Close";

/// Everything the host UI framework needs to build a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSpec {
    pub title: String,
    pub message: String,
    pub button_label: String,
    pub cancelable: bool,
}

impl DialogSpec {
    /// A modal alert: one "Close" button, back-press and outside-tap must not dismiss it.
    pub fn modal_alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            button_label: DISMISS_BUTTON_LABEL.to_string(),
            cancelable: false,
        }
    }
}

/// The dialog surface owned by the host UI framework. Implementations render the dialog described
/// by a `DialogSpec` and report the user's dismissal back through the supplied completer.
pub trait DialogHost: Send {
    /// Present `spec` on screen. Must be called on the UI-owning thread only. The implementation
    /// calls `on_dismiss.complete()` exactly when the user activates the dialog's button; if the
    /// dialog is torn down without a dismissal, dropping `on_dismiss` reports the abandonment.
    fn show_dialog(&mut self, spec: DialogSpec, on_dismiss: Completer) -> Result<()>;
}
