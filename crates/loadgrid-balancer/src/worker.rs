//! Single-request worker state machine.
//!
//! `Idle --assign--> Busy { remaining } --tick x remaining--> Idle`

use loadgrid_core::{Request, WorkerId};

use crate::error::{BalancerError, BalancerResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum WorkerState {
    Idle,
    Busy { request: Request, remaining: u32 },
}

/// A server that processes one request at a time.
#[derive(Debug, Clone)]
pub struct Worker {
    id: WorkerId,
    state: WorkerState,
    /// Requests this worker has finished.
    served: u64,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            state: WorkerState::Idle,
            served: 0,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, WorkerState::Idle)
    }

    /// The request in flight, if any.
    pub fn current(&self) -> Option<&Request> {
        match &self.state {
            WorkerState::Idle => None,
            WorkerState::Busy { request, .. } => Some(request),
        }
    }

    /// Cycles left on the current request; 0 when idle.
    pub fn remaining(&self) -> u32 {
        match &self.state {
            WorkerState::Idle => 0,
            WorkerState::Busy { remaining, .. } => *remaining,
        }
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    /// Start work on `request`.
    ///
    /// A request with zero service time completes immediately and the
    /// worker stays idle. Assigning to a busy worker is an error and
    /// leaves the in-flight request untouched.
    pub fn assign(&mut self, request: Request) -> BalancerResult<()> {
        if !self.is_idle() {
            return Err(BalancerError::WorkerBusy(self.id));
        }
        if request.service_time == 0 {
            self.served += 1;
            return Ok(());
        }
        self.state = WorkerState::Busy {
            remaining: request.service_time,
            request,
        };
        Ok(())
    }

    /// Advance one cycle. Returns `true` if the request finished on this tick.
    pub fn tick(&mut self) -> bool {
        let WorkerState::Busy { remaining, .. } = &mut self.state else {
            return false;
        };
        *remaining -= 1;
        if *remaining > 0 {
            return false;
        }
        self.state = WorkerState::Idle;
        self.served += 1;
        true
    }
}
