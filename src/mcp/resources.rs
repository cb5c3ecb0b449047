//! Widget templates exposed as MCP resources

use crate::widgets::{self, WIDGET_MIME_TYPE, Widget};
use crate::{AppsError, Result};
use rmcp::model::{AnnotateAble, Meta, RawResource, ReadResourceResult, Resource, ResourceContents};
use serde_json::json;

fn widget_meta(widget: &Widget) -> Option<Meta> {
    serde_json::from_value(json!({
        "openai/widgetDescription": widget.description,
        "openai/widgetPrefersBorder": true,
    }))
    .ok()
}

fn resource(widget: &Widget) -> Resource {
    let mut raw = RawResource::new(widget.uri, widget.name);
    raw.description = Some(widget.description.to_string());
    raw.mime_type = Some(WIDGET_MIME_TYPE.to_string());
    raw.meta = widget_meta(widget);
    raw.no_annotation()
}

/// Every widget template, for `resources/list`
#[must_use]
pub fn list() -> Vec<Resource> {
    widgets::ALL.iter().map(resource).collect()
}

/// `resources/read` result for `uri`
pub fn read(uri: &str) -> Result<ReadResourceResult> {
    let widget = widgets::find(uri)
        .ok_or_else(|| AppsError::not_found(format!("Resource not found: {uri}")))?;

    let mut contents = ResourceContents::text(widget.html, widget.uri);
    if let ResourceContents::TextResourceContents {
        mime_type, meta, ..
    } = &mut contents
    {
        *mime_type = Some(WIDGET_MIME_TYPE.to_string());
        *meta = widget_meta(widget);
    }

    Ok(ReadResourceResult {
        contents: vec![contents],
    })
}
