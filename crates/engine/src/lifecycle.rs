use renderstar_events::{Event, EventState};

macro_rules! impl_event {
    ($ty:ty) => {
        impl Event for $ty {
            fn state(&self) -> &EventState {
                &self.state
            }

            fn state_mut(&mut self) -> &mut EventState {
                &mut self.state
            }
        }
    };
}

/// Broadcast before mods pre-initialize.
#[derive(Debug, Default)]
pub struct PreInitializeEvent {
    state: EventState,
}

/// Broadcast before mods initialize.
#[derive(Debug, Default)]
pub struct InitializeEvent {
    state: EventState,
}

/// Broadcast at the start of every frame, before any update.
#[derive(Debug, Default)]
pub struct FrameEvent {
    state: EventState,
    pub frame: u64,
}

impl FrameEvent {
    pub fn new(frame: u64) -> Self {
        Self {
            state: EventState::default(),
            frame,
        }
    }
}

/// Broadcast before mods and the scene are cleaned up.
#[derive(Debug, Default)]
pub struct CleanUpEvent {
    state: EventState,
}

impl_event!(PreInitializeEvent);
impl_event!(InitializeEvent);
impl_event!(FrameEvent);
impl_event!(CleanUpEvent);
