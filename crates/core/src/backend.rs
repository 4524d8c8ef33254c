//! Backend adapter contract.
//!
//! Adapters own the mapping of their transport failures into [`ErrorKind`]
//! values; callers only ever see [`ToolError`].
//!
//! [`ErrorKind`]: crate::error::ErrorKind
//! [`ToolError`]: crate::error::ToolError

use crate::error::ToolResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An issue-tracker project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
    pub id: String,
}

/// One row of an issue search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub key: String,
    pub summary: String,
    pub status: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSearch {
    pub total: u64,
    pub issues: Vec<IssueSummary>,
}

/// Full issue details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub created: String,
    pub updated: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Fields for creating an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub project_key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub key: String,
    pub id: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub issue_key: String,
}

/// A document-space space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub space_type: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub space: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSearch {
    pub total: u64,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub space: Option<String>,
    pub version: Option<u64>,
    /// Storage-format (XHTML) body
    pub body: String,
}

/// Issue tracker capabilities the dispatcher depends on.
#[async_trait::async_trait]
pub trait IssueTracker: Send + Sync {
    async fn list_projects(&self) -> ToolResult<Vec<Project>>;

    async fn search_issues(&self, jql: &str, limit: u32) -> ToolResult<IssueSearch>;

    async fn get_issue(&self, key: &str) -> ToolResult<Issue>;

    /// Not idempotent: every call creates a new issue.
    async fn create_issue(&self, issue: &NewIssue) -> ToolResult<CreatedIssue>;

    async fn add_comment(&self, key: &str, body: &str) -> ToolResult<Comment>;
}

/// Document space capabilities the dispatcher depends on.
#[async_trait::async_trait]
pub trait DocumentSpace: Send + Sync {
    async fn list_spaces(&self) -> ToolResult<Vec<Space>>;

    async fn search_pages(
        &self,
        query: &str,
        space_filter: Option<&str>,
        limit: u32,
    ) -> ToolResult<PageSearch>;

    async fn get_page(&self, id: &str) -> ToolResult<Page>;
}

/// Backend handles shared by every invocation.
///
/// Built once at startup and never mutated; adapters are responsible for
/// being safe under concurrent use.
#[derive(Clone)]
pub struct BackendContext {
    pub base_url: String,
    pub issues: Arc<dyn IssueTracker>,
    pub docs: Arc<dyn DocumentSpace>,
}

impl BackendContext {
    pub fn new(
        base_url: impl Into<String>,
        issues: Arc<dyn IssueTracker>,
        docs: Arc<dyn DocumentSpace>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            issues,
            docs,
        }
    }
}

impl std::fmt::Debug for BackendContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendContext")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
