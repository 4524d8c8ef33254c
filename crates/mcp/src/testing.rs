// In-memory backend adapters for unit tests

use atlasgate_core::backend::{
    Comment, CreatedIssue, Issue, IssueSearch, IssueSummary, NewIssue, Page, PageSearch,
    PageSummary, Project, Space,
};
use atlasgate_core::{BackendContext, DocumentSpace, IssueTracker, ToolError, ToolResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) const BASE_URL: &str = "https://example.atlassian.net";

#[derive(Default)]
pub(crate) struct MockIssues {
    pub delay: Option<Duration>,
    pub searches: Mutex<Vec<(String, u32)>>,
    pub created: Mutex<Vec<NewIssue>>,
    pub comments: Mutex<Vec<(String, String)>>,
}

impl MockIssues {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

pub(crate) fn issue(key: &str) -> Issue {
    Issue {
        key: key.to_string(),
        summary: format!("Summary of {}", key),
        description: Some("Steps to reproduce".to_string()),
        status: "Open".to_string(),
        issue_type: "Bug".to_string(),
        priority: Some("High".to_string()),
        assignee: None,
        created: "2024-01-01T10:00:00.000+0000".to_string(),
        updated: "2024-01-02T10:00:00.000+0000".to_string(),
        labels: vec!["backend".to_string()],
    }
}

#[async_trait::async_trait]
impl IssueTracker for MockIssues {
    async fn list_projects(&self) -> ToolResult<Vec<Project>> {
        self.pause().await;
        Ok(vec![Project {
            key: "DEMO".to_string(),
            name: "Demo Project".to_string(),
            id: "10000".to_string(),
        }])
    }

    async fn search_issues(&self, jql: &str, limit: u32) -> ToolResult<IssueSearch> {
        self.pause().await;
        self.searches.lock().unwrap().push((jql.to_string(), limit));
        Ok(IssueSearch {
            total: 1,
            issues: vec![IssueSummary {
                key: "DEMO-1".to_string(),
                summary: "First issue".to_string(),
                status: "Open".to_string(),
                issue_type: "Task".to_string(),
                created: "2024-01-01".to_string(),
            }],
        })
    }

    async fn get_issue(&self, key: &str) -> ToolResult<Issue> {
        self.pause().await;
        match key {
            "PROJ-999" => Err(ToolError::not_found(
                "Issue does not exist or you do not have permission to see it.",
            )),
            "AUTH-1" => Err(ToolError::auth("Client must be authenticated")),
            "BOOM-1" => panic!("adapter exploded"),
            _ => Ok(issue(key)),
        }
    }

    async fn create_issue(&self, new_issue: &NewIssue) -> ToolResult<CreatedIssue> {
        self.pause().await;
        let mut created = self.created.lock().unwrap();
        created.push(new_issue.clone());
        let n = created.len();
        Ok(CreatedIssue {
            key: format!("{}-{}", new_issue.project_key, n),
            id: format!("{}", 10000 + n),
            self_url: format!("{}/rest/api/3/issue/{}", BASE_URL, 10000 + n),
        })
    }

    async fn add_comment(&self, key: &str, body: &str) -> ToolResult<Comment> {
        self.pause().await;
        self.comments
            .lock()
            .unwrap()
            .push((key.to_string(), body.to_string()));
        Ok(Comment {
            id: "20001".to_string(),
            issue_key: key.to_string(),
        })
    }
}

#[derive(Default)]
pub(crate) struct MockDocs {
    pub searches: Mutex<Vec<(String, Option<String>, u32)>>,
}

#[async_trait::async_trait]
impl DocumentSpace for MockDocs {
    async fn list_spaces(&self) -> ToolResult<Vec<Space>> {
        Ok(vec![Space {
            key: "ENG".to_string(),
            name: "Engineering".to_string(),
            space_type: "global".to_string(),
            id: "98306".to_string(),
        }])
    }

    async fn search_pages(
        &self,
        query: &str,
        space_filter: Option<&str>,
        limit: u32,
    ) -> ToolResult<PageSearch> {
        self.searches.lock().unwrap().push((
            query.to_string(),
            space_filter.map(str::to_string),
            limit,
        ));
        Ok(PageSearch {
            total: 1,
            pages: vec![PageSummary {
                id: "123".to_string(),
                title: "Getting started".to_string(),
                page_type: "page".to_string(),
                space: Some("ENG".to_string()),
            }],
        })
    }

    async fn get_page(&self, id: &str) -> ToolResult<Page> {
        match id {
            "404" => Err(ToolError::not_found("No content found with id: 404")),
            "429" => Err(ToolError::rate_limited("Rate limit exceeded")),
            _ => Ok(Page {
                id: id.to_string(),
                title: "Getting started".to_string(),
                space: Some("ENG".to_string()),
                version: Some(3),
                body: "<h1>Welcome</h1><p>Hello &amp; <b>welcome</b>\n  aboard</p>".to_string(),
            }),
        }
    }
}

pub(crate) fn context(issues: Arc<MockIssues>, docs: Arc<MockDocs>) -> BackendContext {
    BackendContext::new(BASE_URL, issues, docs)
}

pub(crate) fn default_context() -> BackendContext {
    context(Arc::new(MockIssues::default()), Arc::new(MockDocs::default()))
}
