// Jira tools: projects, issue search, issue details, issue creation, comments

use crate::tools::{max_results, max_results_param, Tool};
use crate::validate::ValidatedParams;
use atlasgate_core::backend::NewIssue;
use atlasgate_core::{BackendContext, ParamSpec, ParamType, ToolResult, ToolSpec};
use serde_json::{json, Value};

pub const DEFAULT_JQL: &str = "ORDER BY created DESC";
pub const DEFAULT_ISSUE_TYPE: &str = "Task";

/// Tool to list projects
pub struct JiraGetProjectsTool;

#[async_trait::async_trait]
impl Tool for JiraGetProjectsTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "jira_get_projects",
            "List all Jira projects accessible to the user",
        )
    }

    async fn execute(&self, ctx: &BackendContext, _params: ValidatedParams) -> ToolResult<Value> {
        let projects = ctx.issues.list_projects().await?;
        Ok(json!({ "projects": projects }))
    }
}

/// Tool to search issues with JQL
pub struct JiraSearchIssuesTool;

#[async_trait::async_trait]
impl Tool for JiraSearchIssuesTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "jira_search_issues",
            "Search Jira issues using JQL (Jira Query Language), e.g. 'project = PROJ AND status = Open'",
        )
        .param(
            ParamSpec::optional("jql", ParamType::String, "JQL query string")
                .with_default(DEFAULT_JQL),
        )
        .param(max_results_param())
    }

    async fn execute(&self, ctx: &BackendContext, params: ValidatedParams) -> ToolResult<Value> {
        let jql = params.str("jql").unwrap_or(DEFAULT_JQL);
        let search = ctx.issues.search_issues(jql, max_results(&params)).await?;
        Ok(json!(search))
    }
}

/// Tool to get one issue by key
pub struct JiraGetIssueTool;

#[async_trait::async_trait]
impl Tool for JiraGetIssueTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("jira_get_issue", "Get details of a specific Jira issue by key").param(
            ParamSpec::required("issue_key", ParamType::String, "Issue key (e.g., PROJ-123)"),
        )
    }

    async fn execute(&self, ctx: &BackendContext, params: ValidatedParams) -> ToolResult<Value> {
        let issue = ctx.issues.get_issue(params.require_str("issue_key")?).await?;
        Ok(json!(issue))
    }
}

/// Tool to create an issue. Not idempotent.
pub struct JiraCreateIssueTool;

#[async_trait::async_trait]
impl Tool for JiraCreateIssueTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("jira_create_issue", "Create a new Jira issue")
            .param(ParamSpec::required(
                "project_key",
                ParamType::String,
                "Project key (e.g., PROJ)",
            ))
            .param(ParamSpec::required(
                "summary",
                ParamType::String,
                "Issue summary/title",
            ))
            .param(
                ParamSpec::optional("issue_type", ParamType::String, "Issue type (Task, Bug, Story)")
                    .with_default(DEFAULT_ISSUE_TYPE),
            )
            .param(
                ParamSpec::optional("description", ParamType::String, "Issue description")
                    .with_default(""),
            )
    }

    async fn execute(&self, ctx: &BackendContext, params: ValidatedParams) -> ToolResult<Value> {
        let new_issue = NewIssue {
            project_key: params.require_str("project_key")?.to_string(),
            summary: params.require_str("summary")?.to_string(),
            description: params.str("description").unwrap_or_default().to_string(),
            issue_type: params
                .str("issue_type")
                .unwrap_or(DEFAULT_ISSUE_TYPE)
                .to_string(),
        };

        let created = ctx.issues.create_issue(&new_issue).await?;
        tracing::info!(key = %created.key, project = %new_issue.project_key, "Created issue");

        Ok(json!({
            "key": created.key,
            "id": created.id,
            "self": created.self_url,
            "url": format!("{}/browse/{}", ctx.base_url, created.key),
        }))
    }
}

/// Tool to add a comment to an issue. Not idempotent.
pub struct JiraAddCommentTool;

#[async_trait::async_trait]
impl Tool for JiraAddCommentTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("jira_add_comment", "Add a comment to a Jira issue")
            .param(ParamSpec::required(
                "issue_key",
                ParamType::String,
                "Issue key (e.g., PROJ-123)",
            ))
            .param(ParamSpec::required(
                "comment",
                ParamType::String,
                "Comment text",
            ))
    }

    async fn execute(&self, ctx: &BackendContext, params: ValidatedParams) -> ToolResult<Value> {
        let comment = ctx
            .issues
            .add_comment(params.require_str("issue_key")?, params.require_str("comment")?)
            .await?;
        Ok(json!(comment))
    }
}
