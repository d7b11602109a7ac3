//! Macro-based MCP server
//!
//! Tool registration and input schemas are generated by rmcp's
//! `#[tool_router]` / `#[tool_handler]` macros. Every tool answers with the
//! gateway envelope as JSON text; envelopes are data, never protocol errors.

use crate::logging::LoggingMiddleware;
use crate::tools::DeviceGateway;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Display name of the server
pub const SERVER_NAME: &str = "智能家居设备控制中心";

const SERVER_INSTRUCTIONS: &str = "智能家居设备控制中心：通过后端API查询和控制智能家居设备。\
可用工具: get_config, get_device_overview, get_device_detail, control_device, \
get_device_type_docs。控制设备前可先调用 get_device_type_docs 查看各设备类型支持的操作和参数。\
设备类型: air_conditioner, refrigerator, light, lock, camera。";

/// `get_device_detail` parameters
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeviceDetailRequest {
    /// 设备ID，用于标识特定设备
    pub device_id: String,
}

/// `control_device` parameters
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ControlDeviceRequest {
    /// 设备ID，用于标识要控制的设备
    pub device_id: String,

    /// 要执行的操作，如'set_temperature'、'switch'等
    pub action: String,

    /// 操作参数，根据不同操作类型提供相应的参数
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// `get_device_type_docs` parameters
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct DeviceTypeDocsRequest {
    /// 设备类型: air_conditioner, refrigerator, light, lock 或 camera；省略时返回全部文档
    #[serde(default)]
    pub device_type: Option<String>,
}

/// Smart-home MCP server with macro-based tool definitions
#[derive(Clone)]
pub struct SmartHomeMcpServer {
    /// Tool gateway shared by all invocations
    gateway: Arc<DeviceGateway>,

    tool_router: ToolRouter<Self>,
}

impl SmartHomeMcpServer {
    /// Gateway used by the tools
    pub fn gateway(&self) -> &DeviceGateway {
        &self.gateway
    }

    fn respond(
        tool: &str,
        started: Instant,
        envelope: Value,
    ) -> Result<CallToolResult, McpError> {
        LoggingMiddleware::log_tool_response(
            tool,
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            &envelope,
        );
        Ok(CallToolResult::success(vec![Content::text(envelope.to_string())]))
    }
}

#[tool_router]
impl SmartHomeMcpServer {
    /// Create a new server around a configured gateway
    pub fn new(gateway: DeviceGateway) -> Self {
        info!("Initializing {SERVER_NAME} with macro-based tools");
        Self {
            gateway: Arc::new(gateway),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "获取当前配置信息。返回当前配置的后端API地址。认证令牌不会返回明文，只返回是否已配置。")]
    async fn get_config(&self) -> Result<CallToolResult, McpError> {
        let started = Instant::now();
        LoggingMiddleware::log_tool_call("get_config", &json!({}));
        Self::respond("get_config", started, self.gateway.get_config())
    }

    #[tool(description = "获取所有设备的概览信息。返回系统中所有设备的基本信息列表，包括设备ID、名称、状态等。需要服务器启动时提供认证令牌。")]
    async fn get_device_overview(&self) -> Result<CallToolResult, McpError> {
        let started = Instant::now();
        LoggingMiddleware::log_tool_call("get_device_overview", &json!({}));
        let envelope = self.gateway.get_device_overview().await;
        Self::respond("get_device_overview", started, envelope)
    }

    #[tool(description = "获取特定设备的详细信息，包括设备状态、功耗、运行时间、日志等。需要服务器启动时提供认证令牌。")]
    async fn get_device_detail(
        &self,
        Parameters(DeviceDetailRequest { device_id }): Parameters<DeviceDetailRequest>,
    ) -> Result<CallToolResult, McpError> {
        let started = Instant::now();
        LoggingMiddleware::log_tool_call(
            "get_device_detail",
            &json!({ "device_id": device_id }),
        );
        let envelope = self.gateway.get_device_detail(&device_id).await;
        Self::respond("get_device_detail", started, envelope)
    }

    #[tool(description = "控制特定设备执行操作。各设备支持的命令: \
        air_conditioner: set_temperature(temperature 16-30), switch(state on/off); \
        refrigerator: set_temperature(temperature -20到10), switch(state on/off); \
        light: set_brightness(brightness 0-100), switch(state on/off); \
        lock: set_lock(state lock/unlock); \
        camera: set_recording(state start/stop), set_resolution(resolution 720p/1080p/4k)。\
        示例: device_id=\"5\", action=\"set_temperature\", parameters={\"temperature\": 24}")]
    async fn control_device(
        &self,
        Parameters(request): Parameters<ControlDeviceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let started = Instant::now();
        LoggingMiddleware::log_tool_call(
            "control_device",
            &json!({
                "device_id": request.device_id,
                "action": request.action,
                "parameters": request.parameters,
            }),
        );
        let envelope = self
            .gateway
            .control_device(&request.device_id, &request.action, request.parameters)
            .await;
        Self::respond("control_device", started, envelope)
    }

    #[tool(description = "获取设备控制文档，包括设备类型、支持的操作和参数说明。指定设备类型时返回该类型的文档；否则返回所有设备类型和设备状态说明(online/offline/error)。")]
    async fn get_device_type_docs(
        &self,
        Parameters(DeviceTypeDocsRequest { device_type }): Parameters<DeviceTypeDocsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let started = Instant::now();
        LoggingMiddleware::log_tool_call(
            "get_device_type_docs",
            &json!({ "device_type": device_type }),
        );
        let envelope = self.gateway.get_device_type_docs(device_type.as_deref());
        Self::respond("get_device_type_docs", started, envelope)
    }
}

#[tool_handler]
impl ServerHandler for SmartHomeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn server() -> SmartHomeMcpServer {
        SmartHomeMcpServer::new(DeviceGateway::new(&ServerConfig::default()).unwrap())
    }

    #[test]
    fn test_registers_all_tools() {
        let mut names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "control_device",
                "get_config",
                "get_device_detail",
                "get_device_overview",
                "get_device_type_docs",
            ]
        );
    }

    #[test]
    fn test_server_info_enables_tools() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains(SERVER_NAME));
    }

    fn envelope(result: &CallToolResult) -> Value {
        assert_ne!(result.is_error, Some(true));
        let text = result.content[0]
            .raw
            .as_text()
            .expect("envelope is text content");
        serde_json::from_str(&text.text).expect("envelope is JSON")
    }

    #[tokio::test]
    async fn test_failure_envelope_is_a_successful_tool_result() {
        let server = server();

        let result = server.get_device_overview().await.unwrap();
        let value = envelope(&result);
        assert_eq!(value["success"], json!(false));
        assert_eq!(
            value["message"],
            json!(crate::tools::MISSING_TOKEN_MESSAGE)
        );

        let result = server
            .get_device_type_docs(Parameters(DeviceTypeDocsRequest {
                device_type: Some("toaster".to_string()),
            }))
            .await
            .unwrap();
        let value = envelope(&result);
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["available_types"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_local_tools_answer_with_success_envelope() {
        let server = server();

        let value = envelope(&server.get_config().await.unwrap());
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["config"]["auth_token_configured"], json!(false));

        let result = server
            .get_device_type_docs(Parameters(DeviceTypeDocsRequest::default()))
            .await
            .unwrap();
        assert_eq!(envelope(&result)["success"], json!(true));
    }

    #[test]
    fn test_request_parameters_deserialize() {
        let request: ControlDeviceRequest = serde_json::from_value(json!({
            "device_id": "5",
            "action": "set_temperature",
            "parameters": {"temperature": 24}
        }))
        .unwrap();
        assert_eq!(request.parameters["temperature"], json!(24));

        let request: DeviceTypeDocsRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.device_type.is_none());
    }
}
