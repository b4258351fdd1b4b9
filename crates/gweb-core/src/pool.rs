//! Context recycling.

use parking_lot::Mutex;

use crate::context::Context;
use crate::request::Request;

/// Idle contexts waiting for their next request.
///
/// Acquiring pops an idle context (or creates one) and resets it for the
/// incoming request; releasing returns it unless `max_idle` contexts are
/// already parked.
#[derive(Debug)]
pub(crate) struct ContextPool {
    idle: Mutex<Vec<Context>>,
    max_idle: usize,
}

impl ContextPool {
    pub(crate) fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    pub(crate) fn acquire(&self, request: Request) -> Context {
        let recycled = self.idle.lock().pop();
        match recycled {
            Some(mut ctx) => {
                tracing::trace!("reusing pooled context");
                ctx.reset(request);
                ctx
            }
            None => {
                tracing::trace!("allocating context");
                Context::new(request)
            }
        }
    }

    pub(crate) fn release(&self, ctx: Context) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(ctx);
            tracing::trace!(idle = idle.len(), "context released");
        }
    }

    pub(crate) fn idle_len(&self) -> usize {
        self.idle.lock().len()
    }
}
