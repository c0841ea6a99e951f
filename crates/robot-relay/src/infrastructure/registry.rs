//! PeerRegistry: the authoritative set of currently connected peers.
//!
//! Every accepted WebSocket connection is registered here under a
//! monotonically assigned local [`PeerId`]. The registry is the single
//! shared mutable resource on the server side; membership reads and writes
//! are serialised behind one async mutex, and broadcast iterates a snapshot
//! taken under that mutex so it can never observe a half-removed entry.
//!
//! # Delivery model
//!
//! A peer is represented by the sending half of a **bounded** outbound
//! queue. A dedicated writer task per peer drains the queue into its
//! WebSocket sink, so one slow peer never stalls the broadcast loop or the
//! other peers. When a peer's queue is full the frame is dropped for that
//! peer only — state rides the discrete command stream, so a lossy queue
//! under overload beats unbounded buffering. When a peer's queue is closed
//! (its writer task has gone away) the peer is removed on the spot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// Frames queued per peer before the drop-on-overflow policy kicks in.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Local identity of a registered peer.
///
/// Assigned monotonically from an atomic counter, used only for registry
/// membership, and never transmitted on the wire. Ids are never reused, so
/// a removed peer can never collide with a later one.
pub type PeerId = u64;

/// Error type for registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The same peer id was added twice.
    ///
    /// This is a contract violation in the accept loop, not an external
    /// input condition, so it is surfaced to the caller instead of being
    /// silently swallowed.
    #[error("peer {0} is already registered")]
    AlreadyRegistered(PeerId),
}

/// The set of currently open peer connections.
pub struct PeerRegistry {
    peers: Mutex<HashMap<PeerId, mpsc::Sender<String>>>,
    next_id: AtomicU64,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self {
            peers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Reserves the next peer id.
    pub fn next_peer_id(&self) -> PeerId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Registers a peer's outbound queue under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if `id` is already a
    /// member.
    pub async fn add(&self, id: PeerId, tx: mpsc::Sender<String>) -> Result<(), RegistryError> {
        let mut peers = self.peers.lock().await;
        if peers.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        peers.insert(id, tx);
        debug!("peer {id} registered ({} connected)", peers.len());
        Ok(())
    }

    /// Removes a peer; returns whether it was present.
    ///
    /// Idempotent: disconnect races mean the same peer can be scheduled for
    /// removal twice (read-loop exit and broadcast send failure), and the
    /// second removal must be a harmless no-op.
    pub async fn remove(&self, id: PeerId) -> bool {
        let mut peers = self.peers.lock().await;
        let was_present = peers.remove(&id).is_some();
        if was_present {
            debug!("peer {id} removed ({} connected)", peers.len());
        }
        was_present
    }

    /// Number of currently registered peers.
    pub async fn len(&self) -> usize {
        self.peers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.peers.lock().await.is_empty()
    }

    /// Queues `payload` to every peer registered at the time of the call.
    ///
    /// The member set is snapshotted under the lock and the lock released
    /// before any send, so peers added mid-broadcast do not receive this
    /// frame and registry mutations are never blocked on peer queues.
    /// Delivery failures are contained per peer:
    ///
    /// - closed queue (writer task gone) — peer is removed, remaining peers
    ///   still receive the frame;
    /// - full queue — the frame is dropped for that peer only.
    ///
    /// The sender, if registered, is included: the relay's echo is what
    /// gives controllers their round-trip confirmation.
    ///
    /// Returns the number of peers the frame was queued to.
    pub async fn broadcast_all(&self, payload: &str) -> usize {
        let snapshot: Vec<(PeerId, mpsc::Sender<String>)> = {
            let peers = self.peers.lock().await;
            peers.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        let mut delivered = 0;
        let mut dead: Vec<PeerId> = Vec::new();

        for (id, tx) in snapshot {
            match tx.try_send(payload.to_owned()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("peer {id}: outbound queue full, dropping frame");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("peer {id}: outbound queue closed, scheduling removal");
                    dead.push(id);
                }
            }
        }

        for id in dead {
            self.remove(id).await;
        }

        delivered
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
