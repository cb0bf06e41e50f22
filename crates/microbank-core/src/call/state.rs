//! Per-shape call state machines.

use std::fmt;

use crate::retry::CallError;

/// The four RPC interaction shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    Unary,
    ServerStream,
    ClientStream,
    Bidi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    AwaitingResponse,
    Open,
    Receiving,
    Sending,
    Closing,
    AwaitingSummary,
    Exchanging,
    Completed,
    Failed,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CallState::Completed | CallState::Failed)
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallShape::Unary => "unary",
            CallShape::ServerStream => "server-stream",
            CallShape::ClientStream => "client-stream",
            CallShape::Bidi => "bidi-stream",
        };
        f.write_str(name)
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl CallShape {
    /// Whether `from -> to` is a legal transition for this shape.
    /// Any non-terminal state may fail; terminal states are final.
    pub fn allows(self, from: CallState, to: CallState) -> bool {
        use CallState::*;
        if from.is_terminal() {
            return false;
        }
        if to == Failed {
            return true;
        }
        match self {
            CallShape::Unary => matches!(
                (from, to),
                (Idle, AwaitingResponse) | (AwaitingResponse, Completed)
            ),
            CallShape::ServerStream => matches!(
                (from, to),
                (Idle, Open) | (Open, Receiving) | (Open, Completed) | (Receiving, Completed)
            ),
            CallShape::ClientStream => matches!(
                (from, to),
                (Idle, Open)
                    | (Open, Sending)
                    | (Sending, Closing)
                    | (Closing, AwaitingSummary)
                    | (AwaitingSummary, Completed)
            ),
            CallShape::Bidi => matches!(
                (from, to),
                (Idle, Open) | (Open, Exchanging) | (Exchanging, Completed)
            ),
        }
    }
}

/// Tracks the state of one call and traces every transition.
#[derive(Debug)]
pub struct CallTrace<'a> {
    shape: CallShape,
    method: &'a str,
    state: CallState,
}

impl<'a> CallTrace<'a> {
    pub fn new(shape: CallShape, method: &'a str) -> Self {
        Self {
            shape,
            method,
            state: CallState::Idle,
        }
    }

    /// Trace for a stream that was established elsewhere.
    pub fn opened(shape: CallShape, method: &'a str) -> Self {
        let mut trace = Self::new(shape, method);
        trace.advance(CallState::Open);
        trace
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn method(&self) -> &'a str {
        self.method
    }

    pub fn advance(&mut self, next: CallState) {
        debug_assert!(
            self.shape.allows(self.state, next),
            "illegal {} transition {} -> {}",
            self.shape,
            self.state,
            next
        );
        tracing::trace!(
            method = self.method,
            shape = %self.shape,
            from = %self.state,
            to = %next,
            "call state"
        );
        self.state = next;
    }

    /// Move to `Failed` and hand the error back for returning.
    pub fn fail(&mut self, err: CallError) -> CallError {
        self.advance(CallState::Failed);
        err
    }
}
