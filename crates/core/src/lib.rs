// Core types for the atlasgate tool server: the error taxonomy, tool
// schemas and the backend adapter contract.

pub mod backend;
pub mod error;
pub mod types;

pub use backend::{BackendContext, DocumentSpace, IssueTracker};
pub use error::{ErrorKind, ToolError, ToolResult};
pub use types::*;
