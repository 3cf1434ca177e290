//! Event broadcast: typed notifications fanned out to handlers by priority.
//!
//! # Invariants
//! - Handlers of one event type run in descending handler priority; equal
//!   priorities run in registration order.
//! - A cancelled event reaches no further handler in that broadcast.
//! - A broadcast only considers handlers of the event's own type.
//! - Registration changes made during a broadcast apply from the next one.

mod bus;

pub use bus::{Event, EventBus, EventState, HandlerId};

pub fn crate_info() -> &'static str {
    "renderstar-events v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("events"));
    }
}
