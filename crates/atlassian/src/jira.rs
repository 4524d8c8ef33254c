//! Jira Cloud adapter (REST API v3).

use crate::adf;
use crate::error::AtlassianResult;
use crate::transport::HttpTransport;
use atlasgate_core::backend::{
    Comment, CreatedIssue, Issue, IssueSearch, IssueSummary, NewIssue, Project,
};
use atlasgate_core::{IssueTracker, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

const SEARCH_FIELDS: &str = "summary,status,issuetype,created";
const ISSUE_FIELDS: &str =
    "summary,description,status,issuetype,priority,assignee,created,updated,labels";

/// Jira adapter backed by the shared HTTP transport.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: HttpTransport,
}

impl JiraClient {
    pub fn new(http: HttpTransport) -> Self {
        Self { http }
    }

    async fn fetch_projects(&self) -> AtlassianResult<Vec<Project>> {
        let url = self.http.url(&["rest", "api", "3", "project"])?;
        let projects: Vec<WireProject> = self.http.get(url).await?;

        Ok(projects.into_iter().map(Project::from).collect())
    }

    async fn fetch_search(&self, jql: &str, limit: u32) -> AtlassianResult<IssueSearch> {
        let url = self.http.url(&["rest", "api", "3", "search", "jql"])?;
        let max_results = limit.to_string();
        let query = [
            ("jql", jql),
            ("maxResults", max_results.as_str()),
            ("fields", SEARCH_FIELDS),
        ];

        let data: WireSearch = self.http.get_with_query(url, &query).await?;
        let issues: Vec<IssueSummary> = data.issues.into_iter().map(IssueSummary::from).collect();
        let total = data.total.unwrap_or(issues.len() as u64);
        debug!(jql = %jql, total, returned = issues.len(), "Jira search complete");

        Ok(IssueSearch { total, issues })
    }

    async fn fetch_issue(&self, key: &str) -> AtlassianResult<Issue> {
        let url = self.http.url(&["rest", "api", "3", "issue", key])?;
        let issue: WireIssue = self
            .http
            .get_with_query(url, &[("fields", ISSUE_FIELDS)])
            .await?;

        Ok(issue.into())
    }

    async fn post_issue(&self, issue: &NewIssue) -> AtlassianResult<CreatedIssue> {
        let url = self.http.url(&["rest", "api", "3", "issue"])?;
        let body = CreateIssueBody::from(issue);

        let created: WireCreated = self.http.post(url, &body).await?;
        debug!(key = %created.key, "Jira issue created");

        Ok(CreatedIssue {
            key: created.key,
            id: created.id,
            self_url: created.self_url,
        })
    }

    async fn post_comment(&self, key: &str, body: &str) -> AtlassianResult<Comment> {
        let url = self.http.url(&["rest", "api", "3", "issue", key, "comment"])?;
        let payload = json!({ "body": adf::text_to_adf(body) });

        let comment: WireComment = self.http.post(url, &payload).await?;
        Ok(Comment {
            id: comment.id,
            issue_key: key.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl IssueTracker for JiraClient {
    async fn list_projects(&self) -> ToolResult<Vec<Project>> {
        Ok(self.fetch_projects().await?)
    }

    async fn search_issues(&self, jql: &str, limit: u32) -> ToolResult<IssueSearch> {
        Ok(self.fetch_search(jql, limit).await?)
    }

    async fn get_issue(&self, key: &str) -> ToolResult<Issue> {
        Ok(self.fetch_issue(key).await?)
    }

    async fn create_issue(&self, issue: &NewIssue) -> ToolResult<CreatedIssue> {
        Ok(self.post_issue(issue).await?)
    }

    async fn add_comment(&self, key: &str, body: &str) -> ToolResult<Comment> {
        Ok(self.post_comment(key, body).await?)
    }
}

// Wire shapes. Only the fields the tools surface are modelled.

#[derive(Debug, Deserialize)]
struct WireProject {
    id: String,
    key: String,
    name: String,
}

impl From<WireProject> for Project {
    fn from(p: WireProject) -> Self {
        Self {
            key: p.key,
            name: p.name,
            id: p.id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSearch {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    issues: Vec<WireIssue>,
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    key: String,
    #[serde(default)]
    fields: WireFields,
}

#[derive(Debug, Default, Deserialize)]
struct WireFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    status: Option<Named>,
    #[serde(default)]
    issuetype: Option<Named>,
    #[serde(default)]
    priority: Option<Named>,
    #[serde(default)]
    assignee: Option<WireUser>,
    #[serde(default)]
    created: String,
    #[serde(default)]
    updated: String,
    #[serde(default)]
    labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    display_name: String,
}

fn name_of(named: Option<Named>) -> String {
    named.map(|n| n.name).unwrap_or_default()
}

impl From<WireIssue> for IssueSummary {
    fn from(issue: WireIssue) -> Self {
        let f = issue.fields;
        Self {
            key: issue.key,
            summary: f.summary,
            status: name_of(f.status),
            issue_type: name_of(f.issuetype),
            created: f.created,
        }
    }
}

impl From<WireIssue> for Issue {
    fn from(issue: WireIssue) -> Self {
        let f = issue.fields;
        let description = f
            .description
            .filter(|d| !d.is_null())
            .map(|d| adf::adf_to_text(&d));

        Self {
            key: issue.key,
            summary: f.summary,
            description,
            status: name_of(f.status),
            issue_type: name_of(f.issuetype),
            priority: f.priority.map(|p| p.name),
            assignee: f.assignee.map(|a| a.display_name),
            created: f.created,
            updated: f.updated,
            labels: f.labels,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateIssueBody {
    fields: CreateIssueFields,
}

#[derive(Debug, Serialize)]
struct CreateIssueFields {
    project: KeyRef,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<Value>,
    issuetype: NameRef,
}

#[derive(Debug, Serialize)]
struct KeyRef {
    key: String,
}

#[derive(Debug, Serialize)]
struct NameRef {
    name: String,
}

impl From<&NewIssue> for CreateIssueBody {
    fn from(issue: &NewIssue) -> Self {
        let description = if issue.description.trim().is_empty() {
            None
        } else {
            Some(adf::text_to_adf(&issue.description))
        };

        Self {
            fields: CreateIssueFields {
                project: KeyRef {
                    key: issue.project_key.clone(),
                },
                summary: issue.summary.clone(),
                description,
                issuetype: NameRef {
                    name: issue.issue_type.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireCreated {
    id: String,
    key: String,
    #[serde(rename = "self", default)]
    self_url: String,
}

#[derive(Debug, Deserialize)]
struct WireComment {
    id: String,
}
