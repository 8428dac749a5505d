//=========================================================================
// Call Collector
//=========================================================================
//
// Engine-side collector of queued native notifications.
//
// Architecture:
//   Receiver<NativeCall> → collect_frame() → frame calls → TickControl
//
// The engine drains everything queued since the previous frame before
// ticking. Draining is bounded so a flooding producer cannot stall a frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::interface::NativeCall;

//=== TickControl =========================================================

/// Engine loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== CallCollector =======================================================

/// Collects queued notifications once per engine frame.
pub struct CallCollector {
    receiver: Receiver<NativeCall>,
    frame_calls: Vec<NativeCall>,
}

impl CallCollector {
    const MAX_CALLS_PER_FRAME: usize = 1024;

    pub(crate) fn new(receiver: Receiver<NativeCall>) -> Self {
        Self {
            receiver,
            frame_calls: Vec::with_capacity(64),
        }
    }

    /// Drains pending notifications for this frame.
    ///
    /// Returns [`TickControl::Exit`] once an `Exit` notification is seen or
    /// the bridge side has gone away. Calls collected before the exit stay
    /// available through [`CallCollector::calls`].
    pub fn collect_frame(&mut self) -> TickControl {
        self.frame_calls.clear();
        let mut drained = 0;

        while drained < Self::MAX_CALLS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(NativeCall::Exit) => return TickControl::Exit,
                Ok(call) => {
                    self.frame_calls.push(call);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_CALLS_PER_FRAME {
            warn!(target: "bridge::native", "Call queue backlog: drained {} calls this frame", drained);
        }

        TickControl::Continue
    }

    /// Calls collected by the last [`CallCollector::collect_frame`].
    pub fn calls(&self) -> &[NativeCall] {
        &self.frame_calls
    }

    /// Takes ownership of this frame's calls, leaving an empty buffer.
    pub fn take_calls(&mut self) -> Vec<NativeCall> {
        std::mem::take(&mut self.frame_calls)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
