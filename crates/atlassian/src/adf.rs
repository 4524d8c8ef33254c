//! Minimal Atlassian Document Format (ADF) conversion.
//!
//! Jira Cloud's v3 API takes and returns rich text as ADF documents. Tools
//! speak plain text, so descriptions and comments are wrapped on the way in
//! and flattened on the way out.

use serde_json::{json, Value};

/// Wrap plain text in an ADF document, one paragraph per line block.
///
/// Blank lines separate paragraphs; single newlines become hard breaks.
pub fn text_to_adf(text: &str) -> Value {
    let content: Vec<Value> = text
        .split("\n\n")
        .map(|block| block.trim_matches(|c: char| c == '\n' || c == '\r'))
        .filter(|block| !block.trim().is_empty())
        .map(paragraph)
        .collect();

    json!({
        "type": "doc",
        "version": 1,
        "content": content,
    })
}

fn paragraph(block: &str) -> Value {
    let mut nodes = Vec::new();
    for (i, line) in block.lines().enumerate() {
        if i > 0 {
            nodes.push(json!({"type": "hardBreak"}));
        }
        if !line.is_empty() {
            nodes.push(json!({"type": "text", "text": line}));
        }
    }
    json!({"type": "paragraph", "content": nodes})
}

/// Flatten an ADF document (or fragment) to plain text.
///
/// Block nodes are separated by a blank line; unknown node types contribute
/// their children's text. A plain JSON string is returned unchanged, which
/// covers responses from instances still serving v2 text fields.
pub fn adf_to_text(node: &Value) -> String {
    match node {
        Value::String(s) => s.clone(),
        Value::Object(_) => {
            let mut out = String::new();
            collect(node, &mut out);
            out.trim().to_string()
        }
        _ => String::new(),
    }
}

fn collect(node: &Value, out: &mut String) {
    let node_type = node.get("type").and_then(Value::as_str).unwrap_or_default();

    match node_type {
        "text" => {
            if let Some(text) = node.get("text").and_then(Value::as_str) {
                out.push_str(text);
            }
            return;
        }
        "hardBreak" => {
            out.push('\n');
            return;
        }
        "mention" | "emoji" => {
            if let Some(text) = node.pointer("/attrs/text").and_then(Value::as_str) {
                out.push_str(text);
            }
            return;
        }
        _ => {}
    }

    let children = node.get("content").and_then(Value::as_array);
    let is_block = matches!(
        node_type,
        "paragraph" | "heading" | "codeBlock" | "blockquote" | "listItem" | "rule"
    );

    if let Some(children) = children {
        for child in children {
            collect(child, out);
        }
    }

    if is_block && !out.is_empty() && !out.ends_with("\n\n") {
        if out.ends_with('\n') {
            out.push('\n');
        } else {
            out.push_str("\n\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_adf_single_paragraph() {
        let doc = text_to_adf("Steps to reproduce");
        assert_eq!(
            doc,
            json!({
                "type": "doc",
                "version": 1,
                "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "Steps to reproduce"}]}
                ]
            })
        );
    }

    #[test]
    fn test_text_to_adf_paragraphs_and_breaks() {
        let doc = text_to_adf("first\nsecond\n\nthird");
        let content = doc["content"].as_array().unwrap();

        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["content"][1]["type"], "hardBreak");
        assert_eq!(content[0]["content"][2]["text"], "second");
        assert_eq!(content[1]["content"][0]["text"], "third");
    }

    #[test]
    fn test_text_to_adf_empty() {
        let doc = text_to_adf("");
        assert_eq!(doc["type"], "doc");
        assert!(doc["content"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_adf_to_text() {
        let doc = json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Summary"}]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Ping "},
                    {"type": "mention", "attrs": {"id": "abc", "text": "@alice"}},
                    {"type": "hardBreak"},
                    {"type": "text", "text": "thanks"}
                ]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "one"}]}
                    ]}
                ]}
            ]
        });

        assert_eq!(adf_to_text(&doc), "Summary\n\nPing @alice\nthanks\n\none");
    }

    #[test]
    fn test_text_survives_conversion() {
        let text = "line one\nline two\n\nnext paragraph";
        assert_eq!(adf_to_text(&text_to_adf(text)), text);
    }

    #[test]
    fn test_adf_to_text_non_documents() {
        assert_eq!(adf_to_text(&json!("already plain")), "already plain");
        assert_eq!(adf_to_text(&Value::Null), "");
        assert_eq!(adf_to_text(&json!(42)), "");
    }
}
