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

use anyhow::{anyhow, Result};
use log::info;
use std::{
    sync::mpsc,
    thread::{self, ThreadId},
};

/// A struct used to send tasks to `Handler`.
pub struct Sender<T: Send> {
    tx: mpsc::Sender<T>,
    thread_id: ThreadId,
}

impl<T: Send> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone(), thread_id: self.thread_id }
    }
}

impl<T: Send> Sender<T> {
    /// Send a task to the associated `Handler`. Fails once the handler has shut down.
    pub fn send(&self, task: T) -> Result<()> {
        self.tx.send(task).map_err(|_| anyhow!("Failed to send the task: the handler is gone"))
    }

    /// The thread the associated `Handler` runs its tasks on.
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }
}

/// A trait defining expected behavior of callback functions for `Handler`.
pub trait HandlerCallback<T: Send> {
    /// Handle a task.
    /// This function is called on the same thread that created the `Handler` owning the callback.
    /// If this function returns Err, the handler is deactivated and this function will never be
    /// called anymore even if there is a sent task.
    fn handle_task(&mut self, task: T) -> Result<()>;
}

/// A struct representing a task handler. Tasks are executed one at a time, in send order, on the
/// thread that created the handler.
pub struct Handler<T: Send, C: HandlerCallback<T>> {
    callback: C,
    rx: mpsc::Receiver<T>,
    thread_id: ThreadId,
}

impl<T: Send, C: HandlerCallback<T>> Handler<T, C> {
    /// Create a handler whose tasks will run on the current thread, along with the first sender
    /// for it. Additional senders are obtained by cloning.
    pub fn new_on_current_thread(callback: C) -> (Self, Sender<T>) {
        let thread_id = thread::current().id();
        let (tx, rx) = mpsc::channel::<T>();

        info!("A handler is activated on the thread {:?}", thread_id);

        (Self { callback, rx, thread_id }, Sender { tx, thread_id })
    }

    /// Run the task loop on this thread. Returns Ok once every sender has been dropped, or the
    /// first Err produced by the callback, which deactivates the handler.
    pub fn run_loop(mut self) -> Result<()> {
        debug_assert_eq!(thread::current().id(), self.thread_id);
        while let Ok(task) = self.rx.recv() {
            self.callback.handle_task(task)?;
        }
        info!("All senders are gone; the handler on {:?} is shutting down", self.thread_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    struct Collect {
        seen: Vec<u32>,
        results: mpsc::Sender<Vec<u32>>,
    }

    impl HandlerCallback<u32> for Collect {
        fn handle_task(&mut self, task: u32) -> Result<()> {
            if task == u32::MAX {
                anyhow::bail!("poisoned task");
            }
            self.seen.push(task);
            self.results.send(self.seen.clone()).unwrap();
            Ok(())
        }
    }

    fn spawn_handler() -> (Sender<u32>, mpsc::Receiver<Vec<u32>>, thread::JoinHandle<Result<()>>) {
        let _ = env_logger::try_init();
        let (results_tx, results_rx) = channel();
        let (sender_tx, sender_rx) = channel();
        let join = thread::spawn(move || {
            let (handler, sender) =
                Handler::new_on_current_thread(Collect { seen: Vec::new(), results: results_tx });
            sender_tx.send(sender).unwrap();
            handler.run_loop()
        });
        (sender_rx.recv().unwrap(), results_rx, join)
    }

    #[test]
    fn tasks_run_in_send_order() {
        let (sender, results, join) = spawn_handler();
        for i in 0..5 {
            sender.send(i).unwrap();
        }
        let mut last = Vec::new();
        for _ in 0..5 {
            last = results.recv().unwrap();
        }
        assert_eq!(last, vec![0, 1, 2, 3, 4]);
        drop(sender);
        assert!(join.join().unwrap().is_ok());
    }

    #[test]
    fn sender_reports_the_handler_thread() {
        let (sender, _results, join) = spawn_handler();
        assert_ne!(sender.thread_id(), thread::current().id());
        drop(sender);
        let _ = join.join().unwrap();
    }

    #[test]
    fn callback_error_deactivates_the_handler() {
        let (sender, _results, join) = spawn_handler();
        sender.send(u32::MAX).unwrap();
        assert!(join.join().unwrap().is_err());
        // The loop has exited, so sending eventually fails once the receiver is dropped.
        assert!(sender.send(1).is_err());
    }

    #[test]
    fn dropping_all_senders_shuts_the_handler_down() {
        let (sender, _results, join) = spawn_handler();
        drop(sender);
        assert!(join.join().unwrap().is_ok());
    }
}
