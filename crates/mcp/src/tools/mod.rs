pub mod confluence;
pub mod jira;
mod registry;

pub use confluence::{ConfluenceGetPageTool, ConfluenceGetSpacesTool, ConfluenceSearchTool};
pub use jira::{
    JiraAddCommentTool, JiraCreateIssueTool, JiraGetIssueTool, JiraGetProjectsTool,
    JiraSearchIssuesTool,
};
pub use registry::{RegistryError, Tool, ToolRegistry};

use std::sync::Arc;

/// The fixed tool table served by atlasgate, in discovery order.
pub fn default_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        // Jira tools
        Arc::new(JiraGetProjectsTool),
        Arc::new(JiraSearchIssuesTool),
        Arc::new(JiraGetIssueTool),
        Arc::new(JiraCreateIssueTool),
        Arc::new(JiraAddCommentTool),
        // Confluence tools
        Arc::new(ConfluenceGetSpacesTool),
        Arc::new(ConfluenceSearchTool),
        Arc::new(ConfluenceGetPageTool),
    ]
}

/// Shared `max_results` parameter: 1..=100, default 10.
pub(crate) fn max_results_param() -> atlasgate_core::ParamSpec {
    atlasgate_core::ParamSpec::optional(
        "max_results",
        atlasgate_core::ParamType::Integer,
        "Maximum results (default 10)",
    )
    .with_default(10)
    .with_range(1, 100)
}

pub(crate) fn max_results(params: &crate::validate::ValidatedParams) -> u32 {
    params
        .int("max_results")
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(10)
}
