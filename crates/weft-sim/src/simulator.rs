//! Simulator — repeated execution under a simulated clock.
//!
//! The host loop owns the cadence: it calls `step()` whenever it wants
//! one execution, and `advance_clock()` when clock-driven. Both tolerate
//! arbitrary, irregular invocation, including zero and very large
//! deltas; clamping huge jumps is host policy. Once a step has started
//! it runs to completion or raises — there is no in-flight cancellation.

use crate::controller::Controller;
use crate::emit_model_output;
use tracing::{debug, trace};
use weft_eval::{Context, EvalResult};
use weft_types::Node;

/// Repeatedly executes the controlled module's program, one step at a
/// time, against a fresh per-step context.
pub struct Simulator {
    controller: Controller,
    /// Simulated clock, microseconds. Used by the *next* step.
    clock: u64,
    /// Completed (successful) step count. Independent of the clock.
    steps: u64,
}

impl Simulator {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            clock: 0,
            steps: 0,
        }
    }

    /// Execute the program exactly once at the current clock.
    ///
    /// Fires the reset hook first, then builds a fresh [`Context`],
    /// executes, and publishes the resulting changeset. On failure the
    /// error reaches the host's error hook and propagates; the step
    /// counter, clock, and snapshot stay untouched and nothing is
    /// retried — resuming is the host's decision.
    pub fn step(&mut self) -> EvalResult<()> {
        self.controller.clear_error();
        let mut ctx = Context::new(self.clock);
        debug!(clock = self.clock, steps = self.steps, "step");
        self.controller.execute(&mut ctx)?;
        emit_model_output(&mut ctx);
        self.controller.publish();
        self.steps += 1;
        Ok(())
    }

    /// Advance the clock used by the next `step()`. Executes nothing.
    pub fn advance_clock(&mut self, delta_micros: u64) {
        self.clock = self.clock.saturating_add(delta_micros);
        trace!(clock = self.clock, "clock advanced");
    }

    /// Ad hoc evaluation at the current clock, through the controller.
    pub fn eval(&mut self, node: &Node) -> EvalResult<()> {
        self.controller.eval(node, self.clock)
    }

    /// Current simulated clock (µs).
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Completed step count.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }
}
