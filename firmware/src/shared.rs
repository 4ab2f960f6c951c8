//! State and queues shared between tasks.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use pad_core::{OutputError, PacketSink, PadState, Profile, StateCell};
use pad_proto::Packet;
use portable_atomic::{AtomicU32, Ordering};

/// Depth of the device → host queue.
pub const OUTBOUND_DEPTH: usize = 16;

/// Device → host packets waiting for the HID TX task.
pub type OutboundQueue = Channel<CriticalSectionRawMutex, Packet, OUTBOUND_DEPTH>;

/// [`PadState`] behind a critical-section mutex.
///
/// Every access is one short closure; nothing awaits while holding it.
pub struct SharedState<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<PadState<N>>>,
}

impl<const N: usize> SharedState<N> {
    #[must_use]
    pub const fn new(profile: &'static Profile) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(PadState::new(profile))),
        }
    }
}

impl<const N: usize> StateCell<N> for SharedState<N> {
    fn with<R>(&self, f: impl FnOnce(&mut PadState<N>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Packets dropped because the outbound queue was full.
static DROPPED: AtomicU32 = AtomicU32::new(0);

/// Total packets dropped since boot.
#[must_use]
pub fn dropped_packets() -> u32 {
    DROPPED.load(Ordering::Relaxed)
}

/// [`PacketSink`] that enqueues without waiting.
///
/// A full queue drops the packet and reports [`OutputError::Dropped`].
#[derive(Clone, Copy)]
pub struct QueueSink {
    queue: &'static OutboundQueue,
}

impl QueueSink {
    #[must_use]
    pub const fn new(queue: &'static OutboundQueue) -> Self {
        Self { queue }
    }

    /// Enqueue `packet`, dropping it if the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Dropped`] when the queue is full.
    pub fn push(&self, packet: Packet) -> Result<(), OutputError> {
        self.queue.try_send(packet).map_err(|_| {
            DROPPED.fetch_add(1, Ordering::Relaxed);
            OutputError::Dropped
        })
    }
}

impl PacketSink for QueueSink {
    async fn send(&mut self, packet: &Packet) -> Result<(), OutputError> {
        self.push(*packet)
    }

    fn is_ready(&self) -> bool {
        !self.queue.is_full()
    }
}
