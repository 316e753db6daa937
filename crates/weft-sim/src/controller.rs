//! Controller — view observers and change notification.
//!
//! The controller owns the running module, diffs its scope against the
//! prior snapshot after every execution (step, ad hoc evaluation, or
//! initial load), and notifies registered views in registration order.
//! Two host hooks exist: an error hook invoked when execution fails and
//! a reset hook invoked to clear any displayed error before a fresh run.

use crate::changeset::Changeset;
use crate::emit_model_output;
use std::collections::BTreeMap;
use tracing::{debug, error};
use weft_eval::{Context, EvalError, EvalResult, Factory, Module};
use weft_types::{Node, Value};

/// A view observer.
///
/// `update` must be idempotent under repeated identical changesets;
/// registration before the first execution is fine — no update is
/// delivered until the first publish.
pub trait View {
    fn name(&self) -> &str;
    fn update(&mut self, changes: &Changeset);
}

type ErrorHook = Box<dyn FnMut(&EvalError)>;
type ResetHook = Box<dyn FnMut()>;

/// Owns the module and keeps observers synchronized.
pub struct Controller {
    module: Module,
    factory: Factory,
    views: Vec<Box<dyn View>>,
    snapshot: BTreeMap<String, Value>,
    error_hook: Option<ErrorHook>,
    reset_hook: Option<ResetHook>,
}

impl Controller {
    /// Wrap a loaded module, using the default grammar for ad hoc
    /// evaluation.
    pub fn new(module: Module) -> Self {
        Self::with_factory(module, Factory::with_defaults())
    }

    /// Wrap a loaded module with a caller-supplied factory.
    ///
    /// The snapshot starts empty, so the first publish reports every
    /// binding the initial execution produced.
    pub fn with_factory(module: Module, factory: Factory) -> Self {
        Self {
            module,
            factory,
            views: Vec::new(),
            snapshot: BTreeMap::new(),
            error_hook: None,
            reset_hook: None,
        }
    }

    /// The running module.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Register a view. Registration order is notification order.
    pub fn add_view(&mut self, view: Box<dyn View>) {
        self.views.push(view);
    }

    /// Install the error hook.
    pub fn on_error(&mut self, hook: impl FnMut(&EvalError) + 'static) {
        self.error_hook = Some(Box::new(hook));
    }

    /// Install the reset hook.
    pub fn on_reset(&mut self, hook: impl FnMut() + 'static) {
        self.reset_hook = Some(Box::new(hook));
    }

    /// Execute the module program once against `ctx`.
    ///
    /// Failures are surfaced to the error hook and returned; the caller
    /// decides whether stepping resumes. No publish happens on failure.
    pub fn execute(&mut self, ctx: &mut Context) -> EvalResult<()> {
        match self.module.execute(ctx) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.report_error(&err);
                Err(err)
            }
        }
    }

    /// Ad hoc ("REPL") evaluation against the live module environment.
    ///
    /// Re-enters the factory pipeline, executes immediately, and
    /// publishes — side effects persist and surface through the same
    /// changeset mechanism as stepping.
    pub fn eval(&mut self, node: &Node, clock: u64) -> EvalResult<()> {
        self.clear_error();
        let mut ctx = Context::new(clock);
        let result = self.module.eval(node, &self.factory, &mut ctx);
        match result {
            Ok(()) => {
                emit_model_output(&mut ctx);
                self.publish();
                Ok(())
            }
            Err(err) => {
                self.report_error(&err);
                Err(err)
            }
        }
    }

    /// Diff the module scope against the prior snapshot and notify all
    /// views, in registration order.
    ///
    /// Called only after an execution has fully returned, so views never
    /// observe a partially mutated environment. An empty changeset is
    /// still delivered; views are required to be idempotent.
    pub fn publish(&mut self) {
        let after = self.module.snapshot();
        let order = self.module.env.list(self.module.scope);
        let changes = Changeset::diff(&self.snapshot, order, &after);
        self.snapshot = after;

        debug!(changed = changes.len(), views = self.views.len(), "publish");
        for view in &mut self.views {
            view.update(&changes);
        }
    }

    /// User-facing state dump: module-scope bindings in declaration
    /// order, constants filtered out.
    pub fn state_dump(&self) -> Vec<(String, Value)> {
        let env = &self.module.env;
        let scope = self.module.scope;
        env.list(scope)
            .iter()
            .filter(|name| !env.is_constant(scope, name.as_str()))
            .filter_map(|name| {
                env.get(scope, name)
                    .ok()
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }

    /// Fire the reset hook (clears any displayed error).
    pub(crate) fn clear_error(&mut self) {
        if let Some(hook) = &mut self.reset_hook {
            hook();
        }
    }

    fn report_error(&mut self, err: &EvalError) {
        error!(module = %self.module.name, %err, "execution failed");
        if let Some(hook) = &mut self.error_hook {
            hook(err);
        }
    }
}
