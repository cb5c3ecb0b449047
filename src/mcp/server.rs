//! The MCP server: three tools and their widget resources

use super::resources;
use super::tools::{self, AgeArgs, FastFoodArgs, WeatherArgs};
use crate::config::AppsConfig;
use crate::http::build_client;
use crate::{AgeService, PlacesService, WeatherService};
use rmcp::handler::server::tool::{ToolCallContext, ToolRouter};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, tool, tool_router};
use tracing::{debug, info};

pub const SERVER_NAME: &str = "mcp-apps";

const INSTRUCTIONS: &str = "Tools for weather, name-based age prediction and nearby fast food. \
Each tool returns a short text summary and structured data rendered by a widget.";

/// Protocol revisions a client may ask for, newest first
const SUPPORTED_VERSIONS: [ProtocolVersion; 3] = [
    ProtocolVersion::V_2025_06_18,
    ProtocolVersion::V_2025_03_26,
    ProtocolVersion::V_2024_11_05,
];

/// Echo the client's revision when we speak it, otherwise offer the newest
#[must_use]
pub fn negotiate_version(requested: &ProtocolVersion) -> ProtocolVersion {
    if SUPPORTED_VERSIONS.contains(requested) {
        requested.clone()
    } else {
        ProtocolVersion::V_2025_06_18
    }
}

#[derive(Clone)]
pub struct AppsServer {
    weather: WeatherService,
    age: AgeService,
    places: PlacesService,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AppsServer {
    #[must_use]
    pub fn new(weather: WeatherService, age: AgeService, places: PlacesService) -> Self {
        Self {
            weather,
            age,
            places,
            tool_router: Self::tool_router(),
        }
    }

    /// Build every tool against the configured upstreams, sharing one HTTP client
    pub fn from_config(config: &AppsConfig) -> crate::Result<Self> {
        let client = build_client(&config.http)?;
        Ok(Self::new(
            WeatherService::open_meteo(client.clone(), &config.upstream),
            AgeService::agify(client.clone(), &config.upstream),
            PlacesService::openstreetmap(client, &config.upstream, config.places.clone()),
        ))
    }

    #[tool(
        description = "Get the current weather and today's forecast for a city.",
        annotations(title = "Get weather", read_only_hint = true, open_world_hint = true)
    )]
    async fn get_weather(
        &self,
        Parameters(args): Parameters<WeatherArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        info!("Tool called: {}", tools::GET_WEATHER);
        let result = self.weather.lookup(&args.city).await;
        tools::call_result(tools::GET_WEATHER, result.summary(), &result)
    }

    #[tool(
        description = "Predict the typical age of people with a given first name.",
        annotations(title = "Predict age", read_only_hint = true, open_world_hint = true)
    )]
    async fn predict_age(
        &self,
        Parameters(args): Parameters<AgeArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        info!("Tool called: {}", tools::PREDICT_AGE);
        let result = self.age.predict(&args.name).await;
        tools::call_result(tools::PREDICT_AGE, result.summary(), &result)
    }

    #[tool(
        description = "List fast-food places near a location, nearest first.",
        annotations(title = "Find fast food", read_only_hint = true, open_world_hint = true)
    )]
    async fn search_fast_food(
        &self,
        Parameters(args): Parameters<FastFoodArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        info!("Tool called: {}", tools::SEARCH_FAST_FOOD);
        let result = self.places.search(&args.location, args.radius_meters).await;
        tools::call_result(tools::SEARCH_FAST_FOOD, result.summary(), &result)
    }
}

impl ServerHandler for AppsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: crate::VERSION.to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn initialize(
        &self,
        request: ClientInfo,
        _context: RequestContext<RoleServer>,
    ) -> Result<ServerInfo, ErrorData> {
        let mut info = self.get_info();
        info.protocol_version = negotiate_version(&request.protocol_version);
        info!("Initializing session with protocol {:?}", info.protocol_version);
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = self
            .tool_router
            .list_all()
            .into_iter()
            .map(tools::with_widget_meta)
            .collect();
        Ok(ListToolsResult::with_all_items(tools))
    }

    /// Unknown tools and undecodable arguments come back as `-32602`;
    /// upstream trouble is reported inside the result.
    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!("Dispatching tool {}", request.name);
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(resources::list()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        resources::read(&request.uri).map_err(ErrorData::from)
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        Ok(ListResourceTemplatesResult::with_all_items(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::test_support::{self, LineClient};
    use crate::{age, places, weather};
    use axum::Router;
    use rstest::rstest;
    use serde_json::{Value, json};

    /// Server wired to one fixture host playing every upstream
    async fn fixture_server() -> AppsServer {
        let router = Router::new()
            .merge(weather::open_meteo::fixture::router())
            .merge(age::agify::fixture::router())
            .merge(places::overpass::fixture::router());
        let base = test_support::serve(router).await;
        let mut config = AppsConfig::default();
        config.upstream = UpstreamConfig {
            geocoding_base_url: base.clone(),
            forecast_base_url: base.clone(),
            agify_base_url: base.clone(),
            nominatim_base_url: base.clone(),
            overpass_base_url: base,
        };
        AppsServer::from_config(&config).unwrap()
    }

    async fn session() -> LineClient {
        let mut client = LineClient::start(fixture_server().await);
        client.initialize("2025-06-18").await;
        client
    }

    fn call(id: u32, tool: &str, arguments: Value) -> Value {
        json!({"jsonrpc": "2.0", "id": id, "method": "tools/call",
               "params": {"name": tool, "arguments": arguments}})
    }

    #[rstest]
    #[case("2025-06-18", "2025-06-18")]
    #[case("2025-03-26", "2025-03-26")]
    #[case("2024-11-05", "2024-11-05")]
    #[case("1999-01-01", "2025-06-18")]
    fn test_negotiate_version(#[case] requested: &str, #[case] expected: &str) {
        let requested: ProtocolVersion = serde_json::from_value(json!(requested)).unwrap();
        let negotiated = serde_json::to_value(negotiate_version(&requested)).unwrap();
        assert_eq!(negotiated, expected);
    }

    #[tokio::test]
    async fn test_initialize_echoes_supported_version() {
        let mut client = LineClient::start(fixture_server().await);
        let response = client.initialize("2025-03-26").await;
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(response["result"]["serverInfo"]["name"], "mcp-apps");
        assert!(response["result"]["capabilities"]["tools"].is_object());
        assert!(response["result"]["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_carries_output_templates() {
        let mut client = session().await;
        let response = client
            .request(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}))
            .await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);

        let weather = tools.iter().find(|t| t["name"] == "get_weather").unwrap();
        assert_eq!(weather["inputSchema"]["required"], json!(["city"]));
        assert_eq!(weather["annotations"]["readOnlyHint"], true);
        assert_eq!(weather["_meta"]["openai/outputTemplate"], "ui://widget/weather.html");
        assert_eq!(weather["_meta"]["openai/widgetAccessible"], true);

        let food = tools.iter().find(|t| t["name"] == "search_fast_food").unwrap();
        assert!(food["inputSchema"]["properties"]["radiusMeters"].is_object());
        assert_eq!(food["_meta"]["openai/outputTemplate"], "ui://widget/fast-food.html");
    }

    #[tokio::test]
    async fn test_weather_tool_call() {
        let mut client = session().await;
        let response = client
            .request(call(3, "get_weather", json!({"city": "Paris, France"})))
            .await;
        let result = &response["result"];
        assert_eq!(result["structuredContent"]["kind"], "weather");
        assert_eq!(result["structuredContent"]["current"]["temperatureUnit"], "°C");
        assert!(result["content"][0]["text"].as_str().unwrap().contains("Paris"));
        assert_eq!(result["_meta"]["openai/outputTemplate"], "ui://widget/weather.html");
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_a_protocol_error() {
        let mut client = session().await;
        let response = client
            .request(call(4, "get_weather", json!({"city": "Atlantis"})))
            .await;
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["structuredContent"]["kind"], "weather_error");
        assert_eq!(response["result"]["isError"], false);
    }

    #[tokio::test]
    async fn test_age_and_fast_food_tool_calls() {
        let mut client = session().await;
        let age = client
            .request(call(5, "predict_age", json!({"name": "Michael"})))
            .await;
        assert_eq!(age["result"]["structuredContent"]["age"], 62);

        // the fixture host has no /search route, so Nominatim fails with 404
        let food = client
            .request(call(6, "search_fast_food", json!({"location": "Berlin"})))
            .await;
        assert_eq!(food["result"]["structuredContent"]["kind"], "fast_food_error");
        assert!(food["result"]["structuredContent"]["error"]
            .as_str()
            .unwrap()
            .contains("404"));
    }

    #[tokio::test]
    async fn test_unknown_tool_and_bad_arguments() {
        let mut client = session().await;
        let response = client.request(call(7, "launch_rocket", json!({}))).await;
        assert_eq!(response["error"]["code"], -32602);

        let response = client
            .request(call(8, "get_weather", json!({"town": "Paris"})))
            .await;
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_resources() {
        let mut client = session().await;
        let listed = client
            .request(json!({"jsonrpc": "2.0", "id": 9, "method": "resources/list"}))
            .await;
        assert_eq!(listed["result"]["resources"].as_array().unwrap().len(), 3);

        let read = client
            .request(json!({"jsonrpc": "2.0", "id": 10, "method": "resources/read",
                            "params": {"uri": "ui://widget/age.html"}}))
            .await;
        assert_eq!(read["result"]["contents"][0]["mimeType"], "text/html+skybridge");

        let missing = client
            .request(json!({"jsonrpc": "2.0", "id": 11, "method": "resources/read",
                            "params": {"uri": "ui://widget/none.html"}}))
            .await;
        assert_eq!(missing["error"]["code"], -32002);

        let templates = client
            .request(json!({"jsonrpc": "2.0", "id": 12, "method": "resources/templates/list"}))
            .await;
        assert_eq!(templates["result"]["resourceTemplates"], json!([]));
    }

    #[tokio::test]
    async fn test_ping() {
        let mut client = session().await;
        let response = client
            .request(json!({"jsonrpc": "2.0", "id": "p", "method": "ping"}))
            .await;
        assert_eq!(response["id"], "p");
        assert_eq!(response["result"], json!({}));
    }
}
