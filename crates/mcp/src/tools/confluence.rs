// Confluence tools: spaces, page search, page content

use crate::tools::{max_results, max_results_param, Tool};
use crate::validate::ValidatedParams;
use atlasgate_core::{BackendContext, ParamSpec, ParamType, ToolResult, ToolSpec};
use serde_json::{json, Value};

/// Tool to list spaces
pub struct ConfluenceGetSpacesTool;

#[async_trait::async_trait]
impl Tool for ConfluenceGetSpacesTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "confluence_get_spaces",
            "List all Confluence spaces accessible to the user",
        )
    }

    async fn execute(&self, ctx: &BackendContext, _params: ValidatedParams) -> ToolResult<Value> {
        let spaces = ctx.docs.list_spaces().await?;
        Ok(json!({ "spaces": spaces }))
    }
}

/// Tool to search pages by title
pub struct ConfluenceSearchTool;

#[async_trait::async_trait]
impl Tool for ConfluenceSearchTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("confluence_search", "Search Confluence pages by text")
            .param(ParamSpec::required(
                "query",
                ParamType::String,
                "Search query text",
            ))
            .param(ParamSpec::optional(
                "space_key",
                ParamType::String,
                "Limit the search to one space (e.g., ENG)",
            ))
            .param(max_results_param())
    }

    async fn execute(&self, ctx: &BackendContext, params: ValidatedParams) -> ToolResult<Value> {
        let search = ctx
            .docs
            .search_pages(
                params.require_str("query")?,
                params.str("space_key").filter(|s| !s.is_empty()),
                max_results(&params),
            )
            .await?;
        Ok(json!(search))
    }
}

/// Tool to fetch a page by id
pub struct ConfluenceGetPageTool;

#[async_trait::async_trait]
impl Tool for ConfluenceGetPageTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "confluence_get_page",
            "Get content of a specific Confluence page",
        )
        .param(ParamSpec::required("page_id", ParamType::String, "Page ID"))
        .param(
            ParamSpec::optional(
                "as_text",
                ParamType::Boolean,
                "Strip markup and return plain text (default false)",
            )
            .with_default(false),
        )
    }

    async fn execute(&self, ctx: &BackendContext, params: ValidatedParams) -> ToolResult<Value> {
        let page = ctx.docs.get_page(params.require_str("page_id")?).await?;

        let url = match &page.space {
            Some(space) => format!("{}/wiki/spaces/{}/pages/{}", ctx.base_url, space, page.id),
            None => format!("{}/wiki/pages/viewpage.action?pageId={}", ctx.base_url, page.id),
        };
        let body = if params.bool("as_text").unwrap_or(false) {
            strip_markup(&page.body)
        } else {
            page.body
        };

        Ok(json!({
            "id": page.id,
            "title": page.title,
            "space": page.space,
            "version": page.version,
            "body": body,
            "url": url,
        }))
    }
}

/// Drop tags, decode the common entities and collapse whitespace.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, MockDocs, MockIssues};
    use crate::validate::validate;
    use atlasgate_core::ErrorKind;
    use std::sync::Arc;

    async fn run(tool: &dyn Tool, ctx: &BackendContext, raw: Value) -> ToolResult<Value> {
        let params = validate(&tool.spec(), raw.as_object().unwrap())?;
        tool.execute(ctx, params).await
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("<h1>Welcome</h1><p>Hello &amp; <b>welcome</b>\n  aboard</p>"),
            "Welcome Hello & welcome aboard"
        );
        assert_eq!(strip_markup("plain"), "plain");
        assert_eq!(strip_markup("a &lt;b&gt; c"), "a <b> c");
    }

    #[tokio::test]
    async fn test_get_spaces() {
        let ctx = testing::default_context();
        let result = run(&ConfluenceGetSpacesTool, &ctx, json!({})).await.unwrap();
        assert_eq!(result["spaces"][0]["key"], "ENG");
        assert_eq!(result["spaces"][0]["type"], "global");
    }

    #[tokio::test]
    async fn test_search_passes_space_filter() {
        let docs = Arc::new(MockDocs::default());
        let ctx = testing::context(Arc::new(MockIssues::default()), docs.clone());

        let result = run(
            &ConfluenceSearchTool,
            &ctx,
            json!({"query": "getting started", "space_key": "ENG", "max_results": 3}),
        )
        .await
        .unwrap();
        assert_eq!(result["pages"][0]["space"], "ENG");

        run(&ConfluenceSearchTool, &ctx, json!({"query": "api"})).await.unwrap();

        let searches = docs.searches.lock().unwrap();
        assert_eq!(searches[0], ("getting started".to_string(), Some("ENG".to_string()), 3));
        assert_eq!(searches[1], ("api".to_string(), None, 10));
    }

    #[tokio::test]
    async fn test_get_page_raw_and_text() {
        let ctx = testing::default_context();

        let raw = run(&ConfluenceGetPageTool, &ctx, json!({"page_id": 123})).await.unwrap();
        assert_eq!(raw["id"], "123");
        assert!(raw["body"].as_str().unwrap().starts_with("<h1>"));
        assert_eq!(raw["url"], "https://example.atlassian.net/wiki/spaces/ENG/pages/123");
        assert_eq!(raw["version"], 3);

        let text = run(
            &ConfluenceGetPageTool,
            &ctx,
            json!({"page_id": "123", "as_text": "true"}),
        )
        .await
        .unwrap();
        assert_eq!(text["body"], "Welcome Hello & welcome aboard");
    }

    #[tokio::test]
    async fn test_get_page_errors_pass_through() {
        let ctx = testing::default_context();
        let err = run(&ConfluenceGetPageTool, &ctx, json!({"page_id": "404"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFoundError);

        let err = run(&ConfluenceGetPageTool, &ctx, json!({"page_id": "429"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimited);
    }
}
