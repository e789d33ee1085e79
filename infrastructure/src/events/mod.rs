//! Event bus adapters
//!
//! - [`InMemoryEventBus`]: backend bus, one worker task per topic
//! - [`TokioCommandBus`]: UI command bus, one task per subscriber per emit
//!
//! Both isolate handler failures: a panicking handler is logged and the
//! remaining handlers still receive the event.

mod backend_bus;
mod command_bus;

pub use backend_bus::InMemoryEventBus;
pub use command_bus::TokioCommandBus;

use std::any::Any;

/// Best-effort text of a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
