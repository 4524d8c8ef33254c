//! Confluence Cloud adapter (REST API v1 under `/wiki`).

use crate::error::AtlassianResult;
use crate::transport::HttpTransport;
use atlasgate_core::backend::{Page, PageSearch, PageSummary, Space};
use atlasgate_core::{DocumentSpace, ToolResult};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

const SPACE_LIMIT: &str = "100";

/// Confluence adapter backed by the shared HTTP transport.
#[derive(Debug, Clone)]
pub struct ConfluenceClient {
    http: HttpTransport,
}

impl ConfluenceClient {
    pub fn new(http: HttpTransport) -> Self {
        Self { http }
    }

    async fn fetch_spaces(&self) -> AtlassianResult<Vec<Space>> {
        let url = self.http.url(&["wiki", "rest", "api", "space"])?;
        let data: Results<WireSpace> = self
            .http
            .get_with_query(url, &[("limit", SPACE_LIMIT)])
            .await?;

        Ok(data.results.into_iter().map(Space::from).collect())
    }

    async fn fetch_search(
        &self,
        query: &str,
        space: Option<&str>,
        limit: u32,
    ) -> AtlassianResult<PageSearch> {
        let url = self.http.url(&["wiki", "rest", "api", "content", "search"])?;
        let cql = build_cql(query, space);
        let limit = limit.to_string();

        let data: Results<WireContent> = self
            .http
            .get_with_query(url, &[("cql", cql.as_str()), ("limit", limit.as_str())])
            .await?;

        let pages: Vec<PageSummary> = data.results.into_iter().map(PageSummary::from).collect();
        let total = data.total_size.or(data.size).unwrap_or(pages.len() as u64);
        debug!(cql = %cql, total, "Confluence search complete");

        Ok(PageSearch { total, pages })
    }

    async fn fetch_page(&self, id: &str) -> AtlassianResult<Page> {
        let url = self.http.url(&["wiki", "rest", "api", "content", id])?;
        let page: WireContent = self
            .http
            .get_with_query(url, &[("expand", "body.storage,space,version")])
            .await?;

        Ok(page.into())
    }
}

#[async_trait::async_trait]
impl DocumentSpace for ConfluenceClient {
    async fn list_spaces(&self) -> ToolResult<Vec<Space>> {
        Ok(self.fetch_spaces().await?)
    }

    async fn search_pages(
        &self,
        query: &str,
        space_filter: Option<&str>,
        limit: u32,
    ) -> ToolResult<PageSearch> {
        Ok(self.fetch_search(query, space_filter, limit).await?)
    }

    async fn get_page(&self, id: &str) -> ToolResult<Page> {
        Ok(self.fetch_page(id).await?)
    }
}

/// Title search restricted to pages, optionally within one space.
fn build_cql(query: &str, space: Option<&str>) -> String {
    let mut cql = format!("type=page AND title~\"{}\"", escape_cql(query));
    if let Some(space) = space {
        cql.push_str(&format!(" AND space=\"{}\"", escape_cql(space)));
    }
    cql
}

fn escape_cql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Space key from an `_expandable.space` link such as `/rest/api/space/ENG`.
fn space_key_from_link(link: &str) -> Option<String> {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

/// Confluence returns space ids as numbers and content ids as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Results<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    total_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WireSpace {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    key: String,
    name: String,
    #[serde(rename = "type", default)]
    space_type: String,
}

impl From<WireSpace> for Space {
    fn from(s: WireSpace) -> Self {
        Self {
            key: s.key,
            name: s.name,
            space_type: s.space_type,
            id: s.id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type", default)]
    content_type: String,
    #[serde(default)]
    space: Option<WireSpaceRef>,
    #[serde(default)]
    version: Option<WireVersion>,
    #[serde(default)]
    body: Option<WireBody>,
    #[serde(rename = "_expandable", default)]
    expandable: Option<WireExpandable>,
}

impl WireContent {
    fn space_key(&self) -> Option<String> {
        self.space
            .as_ref()
            .map(|s| s.key.clone())
            .or_else(|| {
                self.expandable
                    .as_ref()
                    .and_then(|e| e.space.as_deref())
                    .and_then(space_key_from_link)
            })
    }
}

#[derive(Debug, Deserialize)]
struct WireSpaceRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct WireVersion {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct WireBody {
    storage: Option<WireStorage>,
}

#[derive(Debug, Deserialize)]
struct WireStorage {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct WireExpandable {
    #[serde(default)]
    space: Option<String>,
}

impl From<WireContent> for PageSummary {
    fn from(c: WireContent) -> Self {
        let space = c.space_key();
        Self {
            id: c.id,
            title: c.title,
            page_type: c.content_type,
            space,
        }
    }
}

impl From<WireContent> for Page {
    fn from(c: WireContent) -> Self {
        let space = c.space_key();
        Self {
            id: c.id,
            title: c.title,
            space,
            version: c.version.map(|v| v.number),
            body: c
                .body
                .and_then(|b| b.storage)
                .map(|s| s.value)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AtlassianConfig;
    use atlasgate_core::ErrorKind;
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(uri: &str) -> ConfluenceClient {
        let config = AtlassianConfig::new(Url::parse(uri).unwrap(), "me@example.com", "token");
        ConfluenceClient::new(HttpTransport::new(Arc::new(config)).unwrap())
    }

    #[test]
    fn test_build_cql() {
        assert_eq!(build_cql("runbook", None), r#"type=page AND title~"runbook""#);
        assert_eq!(
            build_cql("on-call", Some("OPS")),
            r#"type=page AND title~"on-call" AND space="OPS""#
        );
    }

    #[test]
    fn test_cql_escapes_quotes() {
        assert_eq!(
            build_cql(r#"say "hi" \o/"#, None),
            r#"type=page AND title~"say \"hi\" \\o/""#
        );
    }

    #[test]
    fn test_space_key_from_link() {
        assert_eq!(space_key_from_link("/rest/api/space/ENG").as_deref(), Some("ENG"));
        assert_eq!(space_key_from_link("/rest/api/space/ENG/").as_deref(), Some("ENG"));
        assert_eq!(space_key_from_link(""), None);
    }

    #[tokio::test]
    async fn test_list_spaces_numeric_ids() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/rest/api/space"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"id": 98306, "key": "ENG", "name": "Engineering", "type": "global"},
                    {"id": "98307", "key": "~alice", "name": "Alice", "type": "personal"}
                ],
                "size": 2
            })))
            .mount(&server)
            .await;

        let spaces = client_for(&server.uri()).list_spaces().await.unwrap();

        assert_eq!(spaces.len(), 2);
        assert_eq!(spaces[0].id, "98306");
        assert_eq!(spaces[0].space_type, "global");
        assert_eq!(spaces[1].id, "98307");
    }

    #[tokio::test]
    async fn test_search_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/rest/api/content/search"))
            .and(query_param("cql", r#"type=page AND title~"deploy" AND space="ENG""#))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "id": "123",
                    "type": "page",
                    "title": "Deploy guide",
                    "_expandable": {"space": "/rest/api/space/ENG"}
                }],
                "size": 1,
                "totalSize": 7
            })))
            .mount(&server)
            .await;

        let search = client_for(&server.uri())
            .search_pages("deploy", Some("ENG"), 3)
            .await
            .unwrap();

        assert_eq!(search.total, 7);
        assert_eq!(search.pages[0].id, "123");
        assert_eq!(search.pages[0].page_type, "page");
        assert_eq!(search.pages[0].space.as_deref(), Some("ENG"));
    }

    #[tokio::test]
    async fn test_get_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/rest/api/content/123"))
            .and(query_param("expand", "body.storage,space,version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "123",
                "type": "page",
                "title": "Deploy guide",
                "space": {"id": 98306, "key": "ENG", "name": "Engineering"},
                "version": {"number": 4},
                "body": {"storage": {"value": "<p>Run it</p>", "representation": "storage"}}
            })))
            .mount(&server)
            .await;

        let page = client_for(&server.uri()).get_page("123").await.unwrap();

        assert_eq!(page.title, "Deploy guide");
        assert_eq!(page.space.as_deref(), Some("ENG"));
        assert_eq!(page.version, Some(4));
        assert_eq!(page.body, "<p>Run it</p>");
    }

    #[tokio::test]
    async fn test_get_page_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/rest/api/content/999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "statusCode": 404,
                "message": "No content found with id: ContentId{id=999}"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).get_page("999").await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFoundError);
        assert!(err.message.contains("No content found"));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/rest/api/space"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).list_spaces().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimited);
    }
}
