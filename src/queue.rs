//! Bounded command handoff between the receive interrupt and the consumer.
//!
//! The producer side never waits: [`CommandQueue::try_push`] either enqueues
//! or drops the command and counts the drop. The consumer side waits in
//! [`CommandQueue::pop`] (async) or [`CommandQueue::pop_blocking`] until a
//! command arrives or the queue is shut down.
//!
//! Shutdown does not discard work: commands enqueued before
//! [`CommandQueue::shutdown`] are still delivered, and [`Cancelled`] is
//! returned only once the queue is both closed and empty.

use crate::command::Command;
use crate::config::QUEUE_CAPACITY;
use crate::types::Cancelled;
use core::cell::Cell;
#[cfg(not(feature = "std"))]
use embassy_futures::block_on;
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
#[cfg(feature = "std")]
use futures::executor::block_on;

/// Queue safe to push from interrupt handlers.
pub type IsrCommandQueue<const N: usize = QUEUE_CAPACITY> =
    CommandQueue<CriticalSectionRawMutex, N>;

#[derive(Debug, Clone, Copy, Default)]
struct QueueState {
    closed: bool,
    dropped: u32,
}

/// Fixed-capacity FIFO of [`Command`]s with a single consumer.
///
/// Construction is `const`, so a queue can live in a `static` shared with an
/// interrupt handler.
pub struct CommandQueue<M: RawMutex, const N: usize = QUEUE_CAPACITY> {
    channel: Channel<M, Command, N>,
    wake: Signal<M, ()>,
    state: Mutex<M, Cell<QueueState>>,
}

impl<M: RawMutex, const N: usize> CommandQueue<M, N> {
    /// Creates an empty, open queue.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            wake: Signal::new(),
            state: Mutex::new(Cell::new(QueueState {
                closed: false,
                dropped: 0,
            })),
        }
    }

    /// Enqueues `command` without waiting.
    ///
    /// Returns false if the command was dropped because the queue is full or
    /// shut down. The queue contents are unchanged in that case.
    pub fn try_push(&self, command: Command) -> bool {
        self.state.lock(|cell| {
            let mut state = cell.get();
            let accepted = !state.closed && self.channel.try_send(command).is_ok();
            if !accepted {
                state.dropped = state.dropped.saturating_add(1);
                cell.set(state);
            }
            accepted
        })
    }

    /// Waits for the next command.
    ///
    /// Returns [`Cancelled`] once the queue is shut down and drained.
    pub async fn pop(&self) -> Result<Command, Cancelled> {
        loop {
            // Read the flag before draining: pushes are rejected once it is
            // set, so an empty channel afterwards stays empty.
            let closed = self.is_shut_down();
            if let Ok(command) = self.channel.try_receive() {
                return Ok(command);
            }
            if closed {
                return Err(Cancelled);
            }

            match select(self.channel.receive(), self.wake.wait()).await {
                Either::First(command) => return Ok(command),
                Either::Second(()) => continue,
            }
        }
    }

    /// Waits for the next command, blocking the calling context.
    ///
    /// With `std` the calling thread is parked until a push or shutdown
    /// wakes it. Without `std` there is no scheduler to yield to and the
    /// wait polls continuously; firmware should drive [`pop`](Self::pop)
    /// from an executor instead.
    ///
    /// Must only be called from the consumer context, never from an
    /// interrupt handler.
    pub fn pop_blocking(&self) -> Result<Command, Cancelled> {
        block_on(self.pop())
    }

    /// Takes the next command if one is queued.
    pub fn try_pop(&self) -> Option<Command> {
        self.channel.try_receive().ok()
    }

    /// Closes the queue and wakes the consumer.
    pub fn shutdown(&self) {
        self.state.lock(|cell| {
            let mut state = cell.get();
            state.closed = true;
            cell.set(state);
        });
        self.wake.signal(());
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.state.lock(|cell| cell.get().closed)
    }

    /// Number of commands dropped by [`try_push`](Self::try_push).
    pub fn dropped(&self) -> u32 {
        self.state.lock(|cell| cell.get().dropped)
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Returns true if no commands are queued.
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Returns true if the next push would be dropped for lack of space.
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    /// Maximum number of queued commands.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, const N: usize> Default for CommandQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
