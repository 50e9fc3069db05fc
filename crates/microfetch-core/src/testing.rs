//! Scripted [`CommandRunner`] for deterministic orchestration tests.
//!
//! Responses are keyed by the space-joined argument list. A response may
//! carry a delay; when the delay exceeds the invocation's timeout the runner
//! reports a timeout exactly as [`ProcessInvoker`](crate::ProcessInvoker) does.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::engine::EngineBinary;
use crate::invoker::{timeout_message, CommandRunner, InvocationOutcome};

#[derive(Clone)]
struct Scripted {
    outcome: InvocationOutcome,
    delay: Duration,
}

pub struct ScriptedRunner {
    binary: EngineBinary,
    responses: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<Vec<String>>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::with_binary(EngineBinary::with_availability("/opt/microfetch", true))
    }

    pub fn with_binary(binary: EngineBinary) -> Self {
        Self {
            binary,
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn respond(&self, args: &[&str], outcome: InvocationOutcome) {
        self.respond_after(args, outcome, Duration::ZERO);
    }

    pub fn respond_after(&self, args: &[&str], outcome: InvocationOutcome, delay: Duration) {
        lock(&self.responses).insert(args.join(" "), Scripted { outcome, delay });
    }

    /// Script a successful `--format json` style response.
    pub fn respond_ok(&self, args: &[&str], stdout: &str) {
        self.respond(
            args,
            InvocationOutcome {
                stdout: stdout.to_string(),
                stderr: String::new(),
                status: 0,
            },
        );
    }

    /// Every argument list seen so far, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }

    /// Highest number of invocations observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn invoke(&self, args: Vec<String>, timeout: Duration) -> InvocationOutcome {
        lock(&self.calls).push(args.clone());

        if !self.binary.is_available() {
            return InvocationOutcome::failure(self.binary.missing_message());
        }

        let key = args.join(" ");
        let scripted = lock(&self.responses).get(&key).cloned();
        let Some(scripted) = scripted else {
            return InvocationOutcome::failure(format!("no scripted response for: {key}"));
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let outcome = if scripted.delay > timeout {
            tokio::time::sleep(timeout).await;
            InvocationOutcome::failure(timeout_message(timeout))
        } else {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            } else {
                tokio::task::yield_now().await;
            }
            scripted.outcome
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn binary(&self) -> &EngineBinary {
        &self.binary
    }
}
