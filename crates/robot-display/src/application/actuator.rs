//! ActuatorQueue: strictly sequential execution of actor commands.
//!
//! Commands arrive from the network (and from local input, via the relay
//! echo) at arbitrary rates; the actor executes them one at a time, each
//! action taking a fixed wall-clock duration. This module is the
//! single-flight discipline that makes that safe:
//!
//! - [`ActuatorHandle::enqueue`] appends to an unbounded FIFO channel.
//!   Commands are never reordered, merged, or deduplicated — burst input
//!   accumulates and plays back serially, which keeps motion predictable
//!   and replayable.
//! - One consumer task drains the channel. It executes exactly one action
//!   at a time and only takes the next command after the current action's
//!   fixed-duration waits have elapsed. There is no path that mutates the
//!   actor concurrently, so no locking is needed around actor state.
//! - A newly enqueued command never preempts or cancels an in-flight
//!   action; it only extends the queue.
//!
//! State changes are reported through the injected [`RenderSink`] trait;
//! drawing itself is an infrastructure concern.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use robot_core::domain::actor::{Actor, Command, Facing, StepOutcome};
use robot_core::domain::world::{Position, World};

/// Fixed duration of one unit move step.
pub const MOVE_STEP_DURATION: Duration = Duration::from_millis(200);

/// Fixed duration of one left turn.
pub const TURN_DURATION: Duration = Duration::from_millis(300);

/// Receives actor state-change notifications, once per committed change.
///
/// Implementations draw (or record, in tests). Callbacks fire *before* the
/// action's fixed-duration wait, so a renderer shows each step as it
/// happens rather than after the pause.
pub trait RenderSink: Send + Sync {
    /// One unit move was committed; the actor stands on `to`.
    ///
    /// `from` is provided for trace drawing of the travelled segment.
    fn on_position_changed(&self, from: Position, to: Position);

    /// A turn completed; the actor now faces `facing`.
    fn on_facing_changed(&self, facing: Facing);

    /// A move ran into the world bound; remaining steps were abandoned.
    fn on_blocked(&self);
}

/// Enqueue side of the actuator.
///
/// Cheap to clone; every input source (command channel, local adapters)
/// holds one and appends through it.
#[derive(Clone)]
pub struct ActuatorHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl ActuatorHandle {
    /// Appends `command` to the tail of the FIFO queue.
    ///
    /// If the actuator was idle it begins executing immediately; if it is
    /// mid-action the command waits its turn. Returns `false` when the
    /// actuator task has shut down.
    pub fn enqueue(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// The actor plus its execution loop state.
///
/// Owns the [`Actor`] exclusively for the lifetime of the consumer task —
/// the queue's single consumer is the only writer of actor state.
pub struct ActuatorQueue {
    world: World,
    actor: Actor,
    sink: Arc<dyn RenderSink>,
}

impl ActuatorQueue {
    pub fn new(world: World, actor: Actor, sink: Arc<dyn RenderSink>) -> Self {
        Self { world, actor, sink }
    }

    /// Starts the single consumer task.
    ///
    /// Returns the enqueue handle and the task's join handle. The task runs
    /// until every [`ActuatorHandle`] clone is dropped, then resolves to the
    /// final actor state (which tests assert on).
    pub fn spawn(self) -> (ActuatorHandle, JoinHandle<Actor>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(self.run(rx));
        (ActuatorHandle { tx }, join)
    }

    /// The scheduling loop: one command at a time, in arrival order.
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) -> Actor {
        while let Some(command) = rx.recv().await {
            debug!("executing {command:?}");
            self.execute(command).await;
        }
        self.actor
    }

    /// Executes one command to completion, fixed-duration waits included.
    async fn execute(&mut self, command: Command) {
        match command {
            Command::Move(steps) => {
                for _ in 0..steps {
                    match self.actor.step_forward(&self.world) {
                        StepOutcome::Moved { from, to } => {
                            self.sink.on_position_changed(from, to);
                            sleep(MOVE_STEP_DURATION).await;
                        }
                        StepOutcome::Blocked => {
                            // Not an error: report it and abandon the rest
                            // of this move. Position stays valid.
                            self.sink.on_blocked();
                            break;
                        }
                    }
                }
            }
            Command::TurnLeft => {
                let facing = self.actor.turn_left();
                self.sink.on_facing_changed(facing);
                sleep(TURN_DURATION).await;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::render::{RecordingRenderer, RenderEvent};
    use tokio::time::Instant;

    fn actor_at(world: &World, x: i32, y: i32, facing: Facing) -> Actor {
        Actor::new(world, Position::new(x, y), facing)
    }

    /// Runs `commands` through a fresh actuator and returns the final actor
    /// plus everything the sink saw. The paused clock auto-advances through
    /// the fixed-duration waits, so these tests are instant and exact.
    async fn run_commands(
        world: World,
        actor: Actor,
        commands: &[Command],
    ) -> (Actor, Vec<RenderEvent>) {
        let sink = Arc::new(RecordingRenderer::new());
        let queue = ActuatorQueue::new(world, actor, sink.clone());
        let (handle, join) = queue.spawn();
        for &command in commands {
            assert!(handle.enqueue(command));
        }
        drop(handle);
        let final_actor = join.await.expect("actuator task panicked");
        (final_actor, sink.events())
    }

    #[tokio::test(start_paused = true)]
    async fn test_reference_scenario_three_moves_then_turn() {
        // World 10x10, actor at (1,1) facing E; Move(1) x3 then TurnLeft.
        let world = World::new(10, 10);
        let actor = actor_at(&world, 1, 1, Facing::East);

        let (final_actor, events) = run_commands(
            world,
            actor,
            &[
                Command::Move(1),
                Command::Move(1),
                Command::Move(1),
                Command::TurnLeft,
            ],
        )
        .await;

        assert_eq!(final_actor.position(), Position::new(4, 1));
        assert_eq!(final_actor.facing(), Facing::North);
        assert_eq!(
            events,
            vec![
                RenderEvent::Position {
                    from: Position::new(1, 1),
                    to: Position::new(2, 1)
                },
                RenderEvent::Position {
                    from: Position::new(2, 1),
                    to: Position::new(3, 1)
                },
                RenderEvent::Position {
                    from: Position::new(3, 1),
                    to: Position::new(4, 1)
                },
                RenderEvent::Facing(Facing::North),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_at_east_edge_reports_blocked_and_does_not_move() {
        let world = World::new(10, 10);
        let actor = actor_at(&world, 9, 1, Facing::East);

        let (final_actor, events) = run_commands(world, actor, &[Command::Move(1)]).await;

        assert_eq!(events, vec![RenderEvent::Blocked]);
        assert_eq!(final_actor.position(), Position::new(9, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_step_move_truncates_at_the_wall() {
        // Two cells of room, five steps requested: two commits then blocked.
        let world = World::new(10, 10);
        let actor = actor_at(&world, 7, 0, Facing::East);

        let (final_actor, events) = run_commands(world, actor, &[Command::Move(5)]).await;

        assert_eq!(
            events,
            vec![
                RenderEvent::Position {
                    from: Position::new(7, 0),
                    to: Position::new(8, 0)
                },
                RenderEvent::Position {
                    from: Position::new(8, 0),
                    to: Position::new(9, 0)
                },
                RenderEvent::Blocked,
            ]
        );
        assert_eq!(final_actor.position(), Position::new(9, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_four_turns_restore_facing() {
        let world = World::new(5, 5);
        let actor = actor_at(&world, 2, 2, Facing::East);

        let (final_actor, events) =
            run_commands(world, actor, &[Command::TurnLeft; 4]).await;

        assert_eq!(final_actor.facing(), Facing::East);
        assert_eq!(
            events,
            vec![
                RenderEvent::Facing(Facing::North),
                RenderEvent::Facing(Facing::West),
                RenderEvent::Facing(Facing::South),
                RenderEvent::Facing(Facing::East),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_enqueues_execute_in_arrival_order() {
        // A burst of rapid key presses must play back serially, in order,
        // never merged or dropped.
        let world = World::new(10, 10);
        let actor = actor_at(&world, 0, 0, Facing::East);

        let (final_actor, events) = run_commands(
            world,
            actor,
            &[
                Command::Move(1),
                Command::TurnLeft,
                Command::Move(1),
                Command::TurnLeft,
            ],
        )
        .await;

        assert_eq!(
            events,
            vec![
                RenderEvent::Position {
                    from: Position::new(0, 0),
                    to: Position::new(1, 0)
                },
                RenderEvent::Facing(Facing::North),
                RenderEvent::Position {
                    from: Position::new(1, 0),
                    to: Position::new(1, 1)
                },
                RenderEvent::Facing(Facing::West),
            ]
        );
        assert_eq!(final_actor.position(), Position::new(1, 1));
        assert_eq!(final_actor.facing(), Facing::West);
    }

    /// Recording sink that captures the paused-clock instant of each
    /// position event, to pin down the single-flight timing contract.
    struct TimingSink {
        instants: std::sync::Mutex<Vec<Instant>>,
    }

    impl RenderSink for TimingSink {
        fn on_position_changed(&self, _from: Position, _to: Position) {
            self.instants.lock().unwrap().push(Instant::now());
        }
        fn on_facing_changed(&self, _facing: Facing) {}
        fn on_blocked(&self) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_flight_spaces_steps_by_the_fixed_duration() {
        // Two moves enqueued back-to-back: the second must not start until
        // the first action's full 200 ms wait has elapsed.
        let world = World::new(10, 10);
        let actor = actor_at(&world, 0, 0, Facing::East);
        let sink = Arc::new(TimingSink {
            instants: std::sync::Mutex::new(Vec::new()),
        });
        let queue = ActuatorQueue::new(world, actor, sink.clone());
        let (handle, join) = queue.spawn();

        handle.enqueue(Command::Move(1));
        handle.enqueue(Command::Move(1));
        drop(handle);
        join.await.unwrap();

        let instants = sink.instants.lock().unwrap().clone();
        assert_eq!(instants.len(), 2);
        assert_eq!(instants[1] - instants[0], MOVE_STEP_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_during_execution_does_not_preempt() {
        // Enqueue a second command from another task while the first is
        // mid-wait; it must run after, not interleave.
        let world = World::new(10, 10);
        let actor = actor_at(&world, 0, 0, Facing::East);
        let sink = Arc::new(RecordingRenderer::new());
        let queue = ActuatorQueue::new(world, actor, sink.clone());
        let (handle, join) = queue.spawn();

        handle.enqueue(Command::Move(3));
        let late = handle.clone();
        tokio::spawn(async move {
            // Lands while step 1 of the move is still waiting.
            tokio::time::sleep(Duration::from_millis(50)).await;
            late.enqueue(Command::TurnLeft);
        });
        drop(handle);
        let final_actor = join.await.unwrap();

        // All three position events precede the facing event.
        let events = sink.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RenderEvent::Position { .. }));
        assert!(matches!(events[1], RenderEvent::Position { .. }));
        assert!(matches!(events[2], RenderEvent::Position { .. }));
        assert_eq!(events[3], RenderEvent::Facing(Facing::North));
        assert_eq!(final_actor.position(), Position::new(3, 0));
    }
}
