//! Weft driving layer.
//!
//! Repeatedly executes a loaded module — once per step — and keeps view
//! observers synchronized with minimal changesets:
//!
//! ```text
//! Simulator::step() → Module::execute(Context) → Controller diff → views
//! ```
//!
//! Scheduling policy (timer-driven vs frame-driven stepping, speed
//! clamping, cancellation) belongs to the host; `step()` and
//! `advance_clock()` tolerate any cadence.

pub mod changeset;
pub mod controller;
pub mod simulator;

pub use changeset::{Change, Changeset};
pub use controller::{Controller, View};
pub use simulator::Simulator;

use weft_eval::Context;

/// Drain `print` output collected during an execution into the log.
pub(crate) fn emit_model_output(ctx: &mut Context) {
    for line in ctx.output.drain(..) {
        tracing::info!(target: "weft::model", "{line}");
    }
}
