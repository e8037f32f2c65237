//! Account-approval poller for the waiting screen.
//!
//! The page keeps a single `setTimeout` and asks the poller what to do:
//!
//! ```typescript
//! const poller = new JsApprovalPoller(5000);
//! async function tick() {
//!   if (poller.is_due()) {
//!     try { poller.observe((await fetchStatus()).status); } catch { poller.miss(); }
//!   }
//!   const wait = poller.ms_until_due();
//!   if (wait !== undefined) timer = setTimeout(tick, wait);
//!   else if (poller.state === "approved") router.push("/login");
//! }
//! onUnmounted(() => { poller.cancel(); clearTimeout(timer); });
//! ```

use std::time::Duration;

use oeepro_core::auth::AccountStatus;
use oeepro_core::poll::{approval_task, PollState, PollTask, APPROVAL_POLL_INTERVAL};
use wasm_bindgen::prelude::*;

use crate::js_error;

#[wasm_bindgen]
pub struct JsApprovalPoller {
    task: PollTask<AccountStatus>,
}

#[wasm_bindgen]
impl JsApprovalPoller {
    /// Poll every `interval_ms` milliseconds; 0 selects the default (5 s).
    #[wasm_bindgen(constructor)]
    pub fn new(interval_ms: u32) -> JsApprovalPoller {
        let interval = if interval_ms == 0 {
            APPROVAL_POLL_INTERVAL
        } else {
            Duration::from_millis(interval_ms as u64)
        };
        JsApprovalPoller {
            task: approval_task(interval),
        }
    }

    /// Stop after `max` attempts, counting those already made. Returns the
    /// resulting state; a finished poller is left as it is.
    pub fn limit_attempts(&mut self, max: u32) -> String {
        state_name(self.task.set_max_attempts(max)).to_string()
    }

    /// `active`, or the terminal state: `approved`, `rejected`,
    /// `cancelled` or `exhausted`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_name(self.task.state()).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.task.attempts()
    }

    pub fn is_due(&self) -> bool {
        self.task.is_due(now())
    }

    /// Milliseconds until the next poll, `undefined` once finished.
    pub fn ms_until_due(&self) -> Option<f64> {
        self.task
            .time_until_due(now())
            .map(|d| d.as_secs_f64() * 1000.0)
    }

    /// Report the status string returned by the backend.
    pub fn observe(&mut self, status: &str) -> Result<String, JsValue> {
        let status = AccountStatus::from_name(status)
            .ok_or_else(|| js_error(format!("Unknown account status '{status}'")))?;
        Ok(state_name(self.task.observe(now(), status)).to_string())
    }

    /// Report a failed request.
    pub fn miss(&mut self) -> String {
        state_name(self.task.miss(now())).to_string()
    }

    pub fn cancel(&mut self) {
        self.task.cancel();
    }
}

fn state_name(state: &PollState<AccountStatus>) -> &'static str {
    match state {
        PollState::Active => "active",
        PollState::Satisfied(status) => status.as_str(),
        PollState::Cancelled => "cancelled",
        PollState::Exhausted => "exhausted",
    }
}

fn now() -> Duration {
    Duration::from_secs_f64(js_sys::Date::now().max(0.0) / 1000.0)
}
