//! Dispatcher: resolves a tool, validates its parameters, runs the handler
//! under a timeout and normalizes the outcome.
//!
//! This is the single normalization boundary. Whatever happens inside a
//! handler, the caller gets either a JSON payload or a [`ToolError`] from
//! the closed [`ErrorKind`](atlasgate_core::ErrorKind) set.

use crate::protocol::InvokeResult;
use crate::tools::{default_tools, RegistryError, Tool, ToolRegistry};
use crate::validate::validate;
use atlasgate_core::{BackendContext, ToolError, ToolSpec};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Bound on a single backend call unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct Dispatcher {
    registry: ToolRegistry,
    handlers: HashMap<String, Arc<dyn Tool>>,
    context: Arc<BackendContext>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(context: Arc<BackendContext>) -> Self {
        Self {
            registry: ToolRegistry::new(),
            handlers: HashMap::new(),
            context,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Dispatcher with the full Jira and Confluence tool table registered.
    pub fn with_default_tools(context: Arc<BackendContext>) -> Result<Self, RegistryError> {
        let mut dispatcher = Self::new(context);
        for tool in default_tools() {
            dispatcher.register(tool)?;
        }
        Ok(dispatcher)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register a tool's spec and its handler together.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let spec = tool.spec();
        let name = spec.name.clone();
        self.registry.register(spec)?;
        self.handlers.insert(name, tool);
        Ok(())
    }

    /// Registered tool specs, in registration order.
    pub fn tools(&self) -> &[ToolSpec] {
        self.registry.list()
    }

    pub fn context(&self) -> &BackendContext {
        &self.context
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one invocation end to end.
    ///
    /// The handler runs on its own task. If the caller goes away, or the
    /// timeout fires, that task is left to finish and its result is dropped.
    pub async fn dispatch(&self, name: &str, raw: &Map<String, Value>) -> InvokeResult {
        let span = tracing::info_span!(
            "invoke",
            tool = %name,
            invocation_id = %uuid::Uuid::new_v4()
        );
        let started = Instant::now();

        let result = self.dispatch_inner(name, raw).instrument(span.clone()).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(parent: &span, elapsed_ms, "Invocation succeeded"),
            Err(err) => tracing::warn!(
                parent: &span,
                kind = %err.kind,
                elapsed_ms,
                error = %err.message,
                "Invocation failed"
            ),
        }
        result
    }

    async fn dispatch_inner(&self, name: &str, raw: &Map<String, Value>) -> InvokeResult {
        let spec = self.registry.get(name)?;
        let params = validate(spec, raw)?;

        let handler = self
            .handlers
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::unknown_tool(name))?;
        let context = self.context.clone();

        tracing::debug!(params = params.len(), "Dispatching to backend");
        let task = tokio::spawn(
            async move { handler.execute(&context, params).await }.in_current_span(),
        );

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ToolError::unknown(format!(
                "Tool `{}` failed: {}",
                name,
                describe_join_error(join_error)
            ))),
            Err(_) => Err(ToolError::unavailable(format!(
                "Backend call for `{}` timed out after {} ms",
                name,
                self.timeout.as_millis()
            ))),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tools", &self.registry.len())
            .field("context", &self.context)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// Panic payload text only; never a backtrace.
fn describe_join_error(err: tokio::task::JoinError) -> String {
    if err.is_cancelled() {
        return "handler task was cancelled".to_string();
    }
    let payload = err.into_panic();
    let cause = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("handler panicked: {}", cause)
}
