use crate::config::FailureScope;
use crate::runner::check::Verdict;
use crate::runner::types::{GENERAL_METHOD, TestResult};
use crate::services::ServiceResult;
use serde::Serialize;
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

thread_local! {
    /// 当前线程正在执行受保护的服务调用
    static GUARDED: Cell<bool> = const { Cell::new(false) };
}

/// 安装一次全局 panic hook：受保护调用中的 panic 只记入结果，不打印到 stderr，
/// 其余 panic 交给原来的 hook 处理
fn install_quiet_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARDED.with(Cell::get) {
                debug!("Service call panicked: {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

/// 执行一次受保护的调用，捕获其中的 panic
fn guarded<R>(call: impl FnOnce() -> R) -> std::thread::Result<R> {
    install_quiet_hook();
    GUARDED.with(|g| g.set(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(call));
    GUARDED.with(|g| g.set(false));
    outcome
}

/// 服务级保护范围内的失败，中止该服务剩余的调用
#[derive(Debug)]
pub struct Aborted {
    method: String,
    error: String,
    elapsed: Duration,
}

/// 单次调用的结果：`Ok(Some)` 为返回值，`Ok(None)` 为已记录的失败
pub type Step<T> = std::result::Result<Option<T>, Aborted>;

/// 对单个服务依次调用被测方法，并把每次调用记录为 `TestResult`
pub struct ServiceProbe {
    service: &'static str,
    scope: FailureScope,
    results: Vec<TestResult>,
}

impl ServiceProbe {
    pub fn new(service: &'static str, scope: FailureScope) -> Self {
        Self {
            service,
            scope,
            results: Vec::new(),
        }
    }

    /// 执行一组调用，返回按调用顺序排列的结果
    pub fn run<F>(mut self, sequence: F) -> Vec<TestResult>
    where
        F: FnOnce(&mut Self) -> std::result::Result<(), Aborted>,
    {
        if let Err(aborted) = sequence(&mut self) {
            warn!(
                service = self.service,
                method = %aborted.method,
                error = %aborted.error,
                "Service test aborted"
            );
            self.results.push(TestResult::error(
                self.service,
                GENERAL_METHOD,
                format!("Error while testing {}", self.service),
                aborted.error,
                aborted.elapsed,
            ));
        }
        self.results
    }

    /// 调用一个方法并用 `check` 检查返回值
    ///
    /// 检查未通过只记录失败，不影响后续调用；返回值仍交给调用者使用。
    pub fn call<T, F, C>(&mut self, method: &str, call: F, check: C) -> Step<T>
    where
        T: Serialize,
        F: FnOnce() -> ServiceResult<T>,
        C: FnOnce(&T) -> Verdict,
    {
        debug!(service = self.service, method, "Calling service method");

        let start = Instant::now();
        let outcome = guarded(call);
        let elapsed = start.elapsed();

        let error = match outcome {
            Ok(Ok(value)) => {
                let verdict = check(&value);
                let data = self.payload(method, &value);
                let result = if verdict.passed {
                    TestResult::passed(self.service, method, verdict.message, data, elapsed)
                } else {
                    warn!(
                        service = self.service,
                        method,
                        reason = %verdict.message,
                        "Unexpected return value"
                    );
                    TestResult::rejected(self.service, method, verdict.message, data, elapsed)
                };
                self.results.push(result);
                return Ok(Some(value));
            }
            Ok(Err(e)) => e.to_string(),
            Err(panic) => panic_message(panic.as_ref()),
        };

        match self.scope {
            FailureScope::Service => Err(Aborted {
                method: method.to_string(),
                error,
                elapsed,
            }),
            FailureScope::Method => {
                warn!(service = self.service, method, error = %error, "Service call failed");
                self.results.push(TestResult::error(
                    self.service,
                    method,
                    format!("{} failed", method),
                    error,
                    elapsed,
                ));
                Ok(None)
            }
        }
    }

    /// 缺少前置调用的返回值时，记录该方法未能执行
    pub fn skip(&mut self, method: &str, reason: &str) {
        warn!(service = self.service, method, reason, "Service call not attempted");
        self.results.push(TestResult::error(
            self.service,
            method,
            format!("{} not attempted", method),
            reason,
            Duration::ZERO,
        ));
    }

    fn payload<T: Serialize>(&self, method: &str, value: &T) -> Option<serde_json::Value> {
        match serde_json::to_value(value) {
            Ok(serde_json::Value::Null) => None,
            Ok(v) => Some(v),
            Err(e) => {
                warn!(service = self.service, method, "Failed to capture return value: {}", e);
                None
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
