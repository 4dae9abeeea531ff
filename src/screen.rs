//! Per-page state for data that is loaded from the store.
//!
//! A [Screen] starts out [ScreenState::Loading] and moves to
//! [ScreenState::Ready] or [ScreenState::Error] when its load finishes.
//! Loads run inside the screen's [TaskScope]. Tearing the screen down (or
//! dropping it, e.g. when a client disconnects mid-request) cancels the scope,
//! and a load that finishes after that is discarded instead of applied.

use std::{
    future::Future,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::task::{AbortHandle, JoinHandle};

use crate::Error;

/// The state of data shown on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    /// The data has been requested but has not arrived yet.
    Loading,
    /// The data could not be loaded, with a message for the user.
    Error(String),
    /// The data has arrived.
    Ready(T),
}

impl<T> From<Result<T, Error>> for ScreenState<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(data) => ScreenState::Ready(data),
            Err(error) => ScreenState::Error(error.to_string()),
        }
    }
}

/// A group of tasks that can be cancelled together.
///
/// Cloning a scope gives another handle to the same group.
#[derive(Debug, Clone, Default)]
pub struct TaskScope {
    cancelled: Arc<AtomicBool>,
    tasks: Arc<Mutex<Vec<AbortHandle>>>,
}

impl TaskScope {
    /// Create a live scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [TaskScope::cancel] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Spawn `future` on the runtime as part of this scope.
    ///
    /// If the scope is already cancelled the task is aborted straight away.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handle = tokio::spawn(future);

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_cancelled() {
            handle.abort();
        } else {
            tasks.retain(|task| !task.is_finished());
            tasks.push(handle.abort_handle());
        }

        handle
    }

    /// Cancel the scope and abort its tasks.
    pub fn cancel(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        self.cancelled.store(true, Ordering::SeqCst);

        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

/// Owns the [ScreenState] of one page and the scope its loads run in.
#[derive(Debug)]
pub struct Screen<T> {
    state: Arc<Mutex<ScreenState<T>>>,
    scope: TaskScope,
}

impl<T> Default for Screen<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScreenState::Loading)),
            scope: TaskScope::new(),
        }
    }
}

impl<T> Screen<T>
where
    T: Clone + Send + 'static,
{
    /// Create a screen in the [ScreenState::Loading] state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> ScreenState<T> {
        lock_state(&self.state).clone()
    }

    /// Start loading data in the background.
    ///
    /// The screen goes back to [ScreenState::Loading] until `future` finishes.
    /// The outcome is only applied if the screen has not been torn down by then.
    pub fn spawn_load<F>(&self, future: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<T, Error>> + Send + 'static,
    {
        *lock_state(&self.state) = ScreenState::Loading;

        let state = Arc::clone(&self.state);
        let scope = self.scope.clone();

        self.scope.spawn(async move {
            let result = future.await;
            apply(&state, &scope, result);
        })
    }

    /// Load data and wait for it, returning the resulting state.
    pub async fn load<F>(&self, future: F) -> ScreenState<T>
    where
        F: Future<Output = Result<T, Error>> + Send + 'static,
    {
        if let Err(error) = self.spawn_load(future).await {
            let message = if error.is_cancelled() {
                "the load was cancelled".to_owned()
            } else {
                tracing::error!("screen load panicked: {error}");
                error.to_string()
            };

            apply(
                &self.state,
                &self.scope,
                Err(Error::BackgroundTask(message)),
            );
        }

        self.state()
    }

    /// Stop the screen's loads and ignore any result that arrives afterwards.
    pub fn teardown(&self) {
        // Hold the state lock so that a load cannot be applied halfway through cancelling.
        let _state = lock_state(&self.state);
        self.scope.cancel();
    }
}

impl<T> Drop for Screen<T> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

fn lock_state<T>(state: &Mutex<ScreenState<T>>) -> MutexGuard<'_, ScreenState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply<T>(state: &Mutex<ScreenState<T>>, scope: &TaskScope, result: Result<T, Error>) {
    let mut state = lock_state(state);

    if scope.is_cancelled() {
        tracing::debug!("discarding a load that finished after its screen was torn down");
        return;
    }

    *state = result.into();
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use crate::{
        Error,
        screen::{Screen, ScreenState, TaskScope},
    };

    #[test]
    fn starts_loading() {
        let screen: Screen<u32> = Screen::new();

        assert_eq!(screen.state(), ScreenState::Loading);
    }

    #[tokio::test]
    async fn load_success_is_ready() {
        let screen = Screen::new();

        let state = screen.load(async { Ok(vec![1, 2, 3]) }).await;

        assert_eq!(state, ScreenState::Ready(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn load_failure_keeps_message() {
        let screen: Screen<Vec<u32>> = Screen::new();

        let state = screen
            .load(async { Err(Error::RemoteFailure("network is down".to_owned())) })
            .await;

        assert_eq!(state, ScreenState::Error("network is down".to_owned()));
    }

    #[tokio::test]
    async fn late_result_after_teardown_is_dropped() {
        let screen: Screen<u32> = Screen::new();
        let (sender, receiver) = oneshot::channel::<u32>();

        let handle = screen.spawn_load(async move {
            receiver
                .await
                .map_err(|error| Error::BackgroundTask(error.to_string()))
        });
        screen.teardown();
        let _ = sender.send(42);
        let _ = handle.await;

        assert_eq!(screen.state(), ScreenState::Loading);
    }

    #[tokio::test]
    async fn reload_after_ready_goes_back_to_loading() {
        let screen = Screen::new();
        screen.load(async { Ok(1) }).await;
        let (sender, receiver) = oneshot::channel::<u32>();

        let handle = screen.spawn_load(async move {
            receiver
                .await
                .map_err(|error| Error::BackgroundTask(error.to_string()))
        });

        assert_eq!(screen.state(), ScreenState::Loading);
        sender.send(2).unwrap();
        handle.await.unwrap();
        assert_eq!(screen.state(), ScreenState::Ready(2));
    }

    #[tokio::test]
    async fn cancelled_scope_aborts_new_tasks() {
        let scope = TaskScope::new();
        scope.cancel();

        let handle = scope.spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let error = handle.await.expect_err("task should have been aborted");
        assert!(error.is_cancelled());
        assert!(scope.is_cancelled());
    }
}
