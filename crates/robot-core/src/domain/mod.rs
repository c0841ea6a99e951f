//! Domain entities for the robot relay system.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: no sockets, no timers, no terminal. Everything here can be
//! unit-tested synchronously.
//!
//! The timing of actions (each move step and each turn takes a fixed
//! wall-clock duration) deliberately does **not** live here — durations are
//! an actuator concern, applied by the display client's scheduling loop.
//! The domain only answers "given this world and this actor, what does one
//! step do?".

/// Grid bounds and cell positions.
pub mod world;

/// The actor state machine: facing, commands, single-step transitions.
pub mod actor;
