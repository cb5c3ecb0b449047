//! Tool arguments, widget metadata and result envelopes

use crate::widgets::{self, Widget};
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, Meta, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const GET_WEATHER: &str = "get_weather";
pub const PREDICT_AGE: &str = "predict_age";
pub const SEARCH_FAST_FOOD: &str = "search_fast_food";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherArgs {
    /// City name, optionally with region or country, e.g. "Paris, France"
    pub city: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AgeArgs {
    /// First name
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FastFoodArgs {
    /// Address, neighbourhood or city to search around
    pub location: String,
    /// Search radius in metres, clamped to 100..=5000
    #[serde(default)]
    pub radius_meters: Option<u32>,
}

/// `_meta` linking a tool and its results to a widget
#[must_use]
pub fn template_meta(widget: &Widget, invoking: &str, invoked: &str) -> Option<Meta> {
    serde_json::from_value(json!({
        "openai/outputTemplate": widget.uri,
        "openai/toolInvocation/invoking": invoking,
        "openai/toolInvocation/invoked": invoked,
        "openai/widgetAccessible": true,
        "openai/resultCanProduceWidget": true,
    }))
    .ok()
}

/// Widget and status lines shown by the host while a tool runs
#[must_use]
pub fn presentation(tool: &str) -> Option<(&'static Widget, &'static str, &'static str)> {
    match tool {
        GET_WEATHER => Some((&widgets::WEATHER, "Checking the weather", "Weather ready")),
        PREDICT_AGE => Some((&widgets::AGE, "Predicting age", "Prediction ready")),
        SEARCH_FAST_FOOD => Some((
            &widgets::FAST_FOOD,
            "Looking for fast food nearby",
            "Found nearby places",
        )),
        _ => None,
    }
}

fn meta_for(tool: &str) -> Option<Meta> {
    presentation(tool).and_then(|(widget, invoking, invoked)| template_meta(widget, invoking, invoked))
}

/// Attach the widget template metadata to a routed tool descriptor
#[must_use]
pub fn with_widget_meta(mut tool: Tool) -> Tool {
    tool.meta = meta_for(&tool.name);
    tool
}

/// Wrap a tool's structured payload in the `tools/call` result envelope
pub fn call_result<T: Serialize>(
    tool: &str,
    summary: String,
    payload: &T,
) -> Result<CallToolResult, ErrorData> {
    let structured = serde_json::to_value(payload)
        .map_err(|e| ErrorData::internal_error(format!("Failed to encode {tool} result: {e}"), None))?;

    let mut result = CallToolResult::success(vec![Content::text(summary)]);
    result.structured_content = Some(structured);
    result.meta = meta_for(tool);
    Ok(result)
}
