//! Application layer: the actuator use case.

pub mod actuator;

pub use actuator::{
    ActuatorHandle, ActuatorQueue, RenderSink, MOVE_STEP_DURATION, TURN_DURATION,
};
