// Tool-invocation protocol: tool registry, parameter validation and
// dispatch to the backend adapters.

pub mod dispatcher;
pub mod protocol;
pub mod tools;
pub mod validate;

#[cfg(test)]
mod testing;

pub use dispatcher::{Dispatcher, DEFAULT_TIMEOUT};
pub use protocol::{ErrorBody, ErrorInfo, InvokeRequest, InvokeResponse, InvokeResult};
pub use tools::{RegistryError, Tool, ToolRegistry};
pub use validate::{validate, ValidatedParams};
