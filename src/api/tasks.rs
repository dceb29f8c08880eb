//! Task Queue Endpoints
//!
//! Bot-side actions are queued as tasks and picked up by the bot process.
//! The console creates a task, then polls it until it settles.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_json::Value;

use super::{get_json, post_json, ApiError};
use crate::config;
use crate::models::{CreatedTask, NewTask, Task, TaskStatus, TasksResponse};

pub const SEND_ANNOUNCEMENT: &str = "send_announcement";

const FAILED_FALLBACK: &str = "任务执行失败";

pub async fn create<P: Serialize>(task: &NewTask<P>) -> Result<i64, ApiError> {
    let created: CreatedTask = post_json("/tasks", task).await?;
    log::info!("[tasks] queued {} as #{}", task.task_type, created.task_id);
    Ok(created.task_id)
}

pub async fn get(task_id: i64) -> Result<Task, ApiError> {
    get_json(&format!("/tasks/{task_id}")).await
}

pub async fn recent() -> Result<Vec<Task>, ApiError> {
    let resp: TasksResponse = get_json("/tasks/recent").await?;
    Ok(resp.tasks)
}

// ========================
// Polling
// ========================

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Done(Value),
    Failed(String),
    TimedOut,
    Cancelled,
}

/// Settled outcome of a task, or `None` while it is still queued or running
pub fn settled(task: &Task) -> Option<TaskOutcome> {
    match task.status {
        TaskStatus::Done => {
            let result = match &task.result {
                Some(value) if !value.is_null() => value.clone(),
                _ => serde_json::json!({ "ok": true }),
            };
            Some(TaskOutcome::Done(result))
        }
        TaskStatus::Failed => {
            let message = task
                .result
                .as_ref()
                .and_then(|r| r.get("error"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(FAILED_FALLBACK);
            Some(TaskOutcome::Failed(message.to_string()))
        }
        TaskStatus::Pending | TaskStatus::Processing | TaskStatus::Unknown => None,
    }
}

/// Shared flag a view flips on unmount to stop its poll loop.
/// `Send + Sync` so it can move into `on_cleanup`.
#[derive(Debug, Clone, Default)]
pub struct PollGuard(Arc<AtomicBool>);

impl PollGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Poll loop with injectable fetch and sleep. Each attempt sleeps first.
pub async fn poll_with<F, Fut, S, SFut>(
    max_attempts: u32,
    mut fetch: F,
    mut sleep: S,
    guard: &PollGuard,
) -> TaskOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Task, ApiError>>,
    S: FnMut() -> SFut,
    SFut: Future<Output = ()>,
{
    for attempt in 1..=max_attempts {
        sleep().await;
        if guard.is_cancelled() {
            return TaskOutcome::Cancelled;
        }
        let fetched = fetch().await;
        if guard.is_cancelled() {
            return TaskOutcome::Cancelled;
        }
        match fetched {
            Ok(task) => {
                if let Some(outcome) = settled(&task) {
                    return outcome;
                }
            }
            Err(err) if err.is_unauthorized() => return TaskOutcome::Failed(err.to_string()),
            Err(err) => log::debug!("[tasks] attempt {attempt} failed: {err}"),
        }
    }
    TaskOutcome::TimedOut
}

/// Poll a task with the configured interval and attempt limit
pub async fn poll_task(task_id: i64, guard: &PollGuard) -> TaskOutcome {
    let cfg = config::get();
    let interval = cfg.poll_interval_ms;
    let outcome = poll_with(
        cfg.poll_max_attempts,
        || get(task_id),
        || TimeoutFuture::new(interval),
        guard,
    )
    .await;
    log::info!("[tasks] #{task_id} settled: {outcome:?}");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    fn task(status: TaskStatus, result: Option<Value>) -> Task {
        Task {
            id: 9,
            task_type: SEND_ANNOUNCEMENT.to_string(),
            status,
            payload: None,
            result,
            created_at: None,
        }
    }

    fn run(responses: Vec<Result<Task, ApiError>>, max_attempts: u32, guard: &PollGuard) -> (TaskOutcome, usize) {
        let queue = RefCell::new(VecDeque::from(responses));
        let calls = Cell::new(0usize);
        let outcome = block_on(poll_with(
            max_attempts,
            || {
                calls.set(calls.get() + 1);
                let next = queue
                    .borrow_mut()
                    .pop_front()
                    .unwrap_or_else(|| Ok(task(TaskStatus::Pending, None)));
                async move { next }
            },
            || async {},
            guard,
        ));
        (outcome, calls.get())
    }

    /// Same loop as `run`, recording the order of sleeps and fetches
    fn run_logged(responses: Vec<Result<Task, ApiError>>, max_attempts: u32) -> (TaskOutcome, Vec<&'static str>) {
        let queue = RefCell::new(VecDeque::from(responses));
        let log = RefCell::new(Vec::new());
        let outcome = block_on(poll_with(
            max_attempts,
            || {
                log.borrow_mut().push("fetch");
                let next = queue
                    .borrow_mut()
                    .pop_front()
                    .unwrap_or_else(|| Ok(task(TaskStatus::Pending, None)));
                async move { next }
            },
            || {
                log.borrow_mut().push("sleep");
                async {}
            },
            &PollGuard::new(),
        ));
        (outcome, log.into_inner())
    }

    fn interleaved(attempts: usize) -> Vec<&'static str> {
        (0..attempts).flat_map(|_| ["sleep", "fetch"]).collect()
    }

    #[test]
    fn sleeps_before_every_fetch() {
        let responses = vec![Ok(task(TaskStatus::Pending, None)), Ok(task(TaskStatus::Done, None))];
        let (outcome, log) = run_logged(responses, 15);
        assert!(matches!(outcome, TaskOutcome::Done(_)));
        assert_eq!(log, interleaved(2));

        let (outcome, log) = run_logged(Vec::new(), 3);
        assert_eq!(outcome, TaskOutcome::TimedOut);
        assert_eq!(log, interleaved(3));

        let (outcome, log) = run_logged(vec![Err(ApiError::Unauthorized)], 15);
        assert_eq!(outcome, TaskOutcome::Failed("未登录".into()));
        assert_eq!(log, interleaved(1));
    }

    #[test]
    fn done_returns_result() {
        let responses = vec![
            Ok(task(TaskStatus::Pending, None)),
            Ok(task(TaskStatus::Processing, None)),
            Ok(task(TaskStatus::Done, Some(serde_json::json!({"message_id": "123"})))),
        ];
        let (outcome, calls) = run(responses, 15, &PollGuard::new());
        assert_eq!(outcome, TaskOutcome::Done(serde_json::json!({"message_id": "123"})));
        assert_eq!(calls, 3);
    }

    #[test]
    fn done_without_result_is_ok() {
        let (outcome, _) = run(vec![Ok(task(TaskStatus::Done, None))], 15, &PollGuard::new());
        assert_eq!(outcome, TaskOutcome::Done(serde_json::json!({"ok": true})));
    }

    #[test]
    fn failed_uses_error_or_fallback() {
        let with_error = task(TaskStatus::Failed, Some(serde_json::json!({"error": "频道不存在"})));
        assert_eq!(settled(&with_error), Some(TaskOutcome::Failed("频道不存在".into())));

        let bare = task(TaskStatus::Failed, None);
        assert_eq!(settled(&bare), Some(TaskOutcome::Failed("任务执行失败".into())));
    }

    #[test]
    fn transient_errors_keep_polling() {
        let responses = vec![
            Err(ApiError::Network("offline".into())),
            Err(ApiError::Status { status: 500, message: None }),
            Ok(task(TaskStatus::Done, None)),
        ];
        let (outcome, calls) = run(responses, 15, &PollGuard::new());
        assert!(matches!(outcome, TaskOutcome::Done(_)));
        assert_eq!(calls, 3);
    }

    #[test]
    fn unauthorized_stops_immediately() {
        let (outcome, calls) = run(vec![Err(ApiError::Unauthorized)], 15, &PollGuard::new());
        assert_eq!(outcome, TaskOutcome::Failed("未登录".into()));
        assert_eq!(calls, 1);
    }

    #[test]
    fn exhausting_attempts_times_out() {
        let (outcome, calls) = run(Vec::new(), 4, &PollGuard::new());
        assert_eq!(outcome, TaskOutcome::TimedOut);
        assert_eq!(calls, 4);
    }

    #[test]
    fn cancelled_guard_skips_fetch() {
        let guard = PollGuard::new();
        guard.cancel();
        let (outcome, calls) = run(vec![Ok(task(TaskStatus::Done, None))], 15, &guard);
        assert_eq!(outcome, TaskOutcome::Cancelled);
        assert_eq!(calls, 0);
    }
}
