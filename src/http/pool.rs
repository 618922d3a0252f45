//! Reuse of per-request contexts.
//!
//! # Responsibilities
//! - Hand out a reset `Context` for every request
//! - Take contexts back when the request finishes
//!
//! # Design Decisions
//! - Reset happens on acquire, so a context never leaks a previous request's parameters
//! - Idle contexts are capped; extras are dropped
//! - The lock is held only to push or pop, never across a dispatch

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

use crate::http::context::Context;

/// A bounded pool of idle contexts.
#[derive(Debug)]
pub struct ContextPool {
    idle: Mutex<Vec<Context>>,
    max_idle: usize,
}

impl ContextPool {
    /// Create an empty pool keeping at most `max_idle` contexts.
    pub fn new(max_idle: usize) -> Arc<Self> {
        Arc::new(Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        })
    }

    /// Take a reset context, reusing an idle one when available.
    pub fn acquire(self: &Arc<Self>) -> PooledContext {
        let reused = self.idle.lock().ok().and_then(|mut idle| idle.pop());
        let mut ctx = reused.unwrap_or_default();
        ctx.reset();
        PooledContext {
            ctx,
            pool: self.clone(),
        }
    }

    /// Number of idle contexts.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }

    fn release(&self, ctx: Context) {
        if let Ok(mut idle) = self.idle.lock() {
            if idle.len() < self.max_idle {
                idle.push(ctx);
            }
        }
    }
}

/// A context on loan from a [`ContextPool`]; returned on drop.
#[derive(Debug)]
pub struct PooledContext {
    ctx: Context,
    pool: Arc<ContextPool>,
}

impl Deref for PooledContext {
    type Target = Context;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl DerefMut for PooledContext {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}

impl Drop for PooledContext {
    fn drop(&mut self) {
        let ctx = std::mem::take(&mut self.ctx);
        self.pool.release(ctx);
    }
}
