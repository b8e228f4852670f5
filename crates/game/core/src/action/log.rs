//! Combat log sink used by effect processors.

use std::cell::RefCell;
use std::rc::Rc;

/// Inputs for [`ActionEffect::log_string`](super::ActionEffect::log_string).
#[derive(Clone, Debug, PartialEq)]
pub struct EffectLogEntry {
    pub actor: String,
    pub action: String,
    pub target: String,
    pub value: Option<f64>,
}

pub trait MessageLog {
    fn log(&mut self, message: String);
}

impl MessageLog for Vec<String> {
    fn log(&mut self, message: String) {
        self.push(message);
    }
}

/// Shared handle, so several processors can write to one log.
impl<L: MessageLog> MessageLog for Rc<RefCell<L>> {
    fn log(&mut self, message: String) {
        self.borrow_mut().log(message);
    }
}

/// Forwards log lines to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl MessageLog for TracingLog {
    fn log(&mut self, message: String) {
        tracing::info!(target: "combat", "{message}");
    }
}
