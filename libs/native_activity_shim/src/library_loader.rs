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
use std::{
    ffi::{c_void, CString},
    sync::OnceLock,
};

/// The symbolic name of the native rendering module the shim brings up.
pub const NATIVE_MODULE_NAME: &str = "libvulkan.so";

macro_rules! bail_with_dlerror {
    ($fmt:literal $(, $($arg:tt)+)?) => {
        {
            // SAFETY: trivially safe.
            let error = unsafe { libc::dlerror() };
            if !error.is_null() {
                // SAFETY: `error` is a pointer to a valid C string returned by `dlerror()`.
                let error_cstr = unsafe { std::ffi::CStr::from_ptr(error) };
                let dl_error_msg = error_cstr.to_string_lossy();

                anyhow::bail!(
                    concat!($fmt, ": {}"),
                    $($($arg)+,)?
                    dl_error_msg
                );
            } else {
                anyhow::bail!($fmt $(, $($arg)+)?);
            }
        }
    };
}

/// LoadedLibrary represents a library loaded to the memory space of the process.
pub struct LoadedLibrary {
    library_handle: *mut c_void,
}

// SAFETY: the handle refers to a process-global mapping kept by the dynamic loader. `dlsym` and
// `dlclose` on it are thread-safe.
unsafe impl Send for LoadedLibrary {}
// SAFETY: see the Send impl above; &LoadedLibrary only exposes `dlsym` lookups.
unsafe impl Sync for LoadedLibrary {}

impl LoadedLibrary {
    /// Load a library to the process memory space.
    ///
    /// # Safety
    ///
    /// Users must ensure that the initialization and termination routines of the library are safe.
    pub unsafe fn new(library_name: &str) -> Result<Self> {
        let library = CString::new(library_name).context("Invalid library name")?;

        // SAFETY: `library` is a valid C string. The caller ensured that the library is safe to
        // be loaded.
        let library_handle =
            unsafe { libc::dlopen(library.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        if library_handle.is_null() {
            bail_with_dlerror!("Failed to open the library {}", library_name);
        }

        Ok(Self { library_handle })
    }

    pub fn find_symbol(&self, symbol_name: &str) -> Result<*mut c_void> {
        let symbol = CString::new(symbol_name).context("Invalid symbol name")?;
        // SAFETY: `self.library_handle` is a valid library handle and `symbol` is a valid C
        // string.
        let symbol_handle = unsafe { libc::dlsym(self.library_handle, symbol.as_ptr()) };
        if symbol_handle.is_null() {
            bail_with_dlerror!("Failed to find the symbol {}", symbol_name);
        }
        Ok(symbol_handle)
    }
}

impl Drop for LoadedLibrary {
    fn drop(&mut self) {
        // SAFETY: the instance owns a valid handle to the opened library. The termination routine
        // is ensured to be safe.
        unsafe { libc::dlclose(self.library_handle) };
    }
}

/// ModuleBootstrap loads the named native module exactly once and keeps it mapped for the rest of
/// the process lifetime. The outcome of the first load attempt is cached, so a failed load is
/// reported the same way to every caller instead of crashing the process.
pub struct ModuleBootstrap {
    library_name: String,
    // anyhow::Error is not Clone, so a failed load is cached as its rendered message.
    state: OnceLock<std::result::Result<LoadedLibrary, String>>,
}

impl ModuleBootstrap {
    pub fn new(library_name: impl Into<String>) -> Self {
        Self { library_name: library_name.into(), state: OnceLock::new() }
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    /// Load the module if it hasn't been attempted yet. Idempotent: later calls return the cached
    /// outcome of the first attempt.
    pub fn load(&self) -> Result<()> {
        let outcome = self.state.get_or_init(|| {
            // SAFETY: the module is the platform rendering library named by the hosting layer;
            // its initialization routines are trusted.
            unsafe { LoadedLibrary::new(&self.library_name) }.map_err(|e| format!("{:#}", e))
        });
        match outcome {
            Ok(_) => Ok(()),
            Err(msg) => bail!("Failed to load the native module {}: {}", self.library_name, msg),
        }
    }

    /// Look up an entry point in the loaded module.
    pub fn find_symbol(&self, symbol_name: &str) -> Result<*mut c_void> {
        match self.state.get() {
            Some(Ok(library)) => library.find_symbol(symbol_name),
            Some(Err(_)) | None => {
                bail!("The native module {} is not loaded", self.library_name)
            }
        }
    }
}
