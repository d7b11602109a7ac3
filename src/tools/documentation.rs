//! Device-type documentation tool
//!
//! Static catalog of the five device types the backend manages, the control
//! commands each accepts, and the device status codes. The catalog is
//! documentation only; control commands are never checked against it.

use super::{DeviceGateway, ToolResponse};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Documentation for one device type
#[derive(Debug, Clone, Serialize)]
pub struct DeviceTypeDoc {
    /// Device type key, e.g. `air_conditioner`
    #[serde(skip)]
    pub name: &'static str,

    /// Human-readable description
    pub description: &'static str,

    /// Supported control commands
    pub control_commands: Vec<CommandDoc>,
}

/// Documentation for one control command
#[derive(Debug, Clone, Serialize)]
pub struct CommandDoc {
    /// Action name
    pub action: &'static str,

    /// Parameter name to description
    pub params: BTreeMap<&'static str, &'static str>,

    /// Example invocation
    pub example: CommandExample,
}

/// Example `{action, params}` pair
#[derive(Debug, Clone, Serialize)]
pub struct CommandExample {
    pub action: &'static str,
    pub params: Value,
}

fn command(
    action: &'static str,
    params: &[(&'static str, &'static str)],
    example: Value,
) -> CommandDoc {
    CommandDoc {
        action,
        params: params.iter().copied().collect(),
        example: CommandExample {
            action,
            params: example,
        },
    }
}

fn switch_command() -> CommandDoc {
    command(
        "switch",
        &[("state", "开关状态，'on'或'off'")],
        json!({"state": "on"}),
    )
}

/// Device types in catalog order
pub static DEVICE_CATALOG: Lazy<Vec<DeviceTypeDoc>> = Lazy::new(|| {
    vec![
        DeviceTypeDoc {
            name: "air_conditioner",
            description: "空调设备",
            control_commands: vec![
                command(
                    "set_temperature",
                    &[("temperature", "设置温度值，通常在16-30°C之间")],
                    json!({"temperature": 24}),
                ),
                switch_command(),
            ],
        },
        DeviceTypeDoc {
            name: "refrigerator",
            description: "冰箱设备",
            control_commands: vec![
                command(
                    "set_temperature",
                    &[("temperature", "设置冰箱温度，范围：-20到10°C")],
                    json!({"temperature": 4}),
                ),
                switch_command(),
            ],
        },
        DeviceTypeDoc {
            name: "light",
            description: "灯具设备",
            control_commands: vec![
                command(
                    "set_brightness",
                    &[("brightness", "亮度值，范围：0-100")],
                    json!({"brightness": 80}),
                ),
                switch_command(),
            ],
        },
        DeviceTypeDoc {
            name: "lock",
            description: "门锁设备",
            control_commands: vec![command(
                "set_lock",
                &[("state", "锁定状态，'lock'或'unlock'")],
                json!({"state": "lock"}),
            )],
        },
        DeviceTypeDoc {
            name: "camera",
            description: "摄像头设备",
            control_commands: vec![
                command(
                    "set_recording",
                    &[("state", "录制状态，'start'或'stop'")],
                    json!({"state": "start"}),
                ),
                command(
                    "set_resolution",
                    &[("resolution", "分辨率，'720p', '1080p'或'4k'")],
                    json!({"resolution": "1080p"}),
                ),
            ],
        },
    ]
});

/// Device status codes reported by the backend
pub const DEVICE_STATUS: [(&str, &str); 3] = [
    ("online", "设备在线正常工作"),
    ("offline", "设备离线"),
    ("error", "设备出现错误"),
];

/// Look up a device type by key
pub fn find_device_type(name: &str) -> Option<&'static DeviceTypeDoc> {
    DEVICE_CATALOG.iter().find(|doc| doc.name == name)
}

/// Known device type keys in catalog order
pub fn available_types() -> Vec<&'static str> {
    DEVICE_CATALOG.iter().map(|doc| doc.name).collect()
}

/// Full documentation table: `{device_types: {...}, device_status: {...}}`
pub fn full_documentation() -> Value {
    let device_types: Map<String, Value> = DEVICE_CATALOG
        .iter()
        .map(|doc| (doc.name.to_string(), json!(doc)))
        .collect();
    let device_status: Map<String, Value> = DEVICE_STATUS
        .iter()
        .map(|(code, description)| (code.to_string(), json!(description)))
        .collect();

    json!({
        "device_types": device_types,
        "device_status": device_status,
    })
}

impl DeviceGateway {
    /// `get_device_type_docs` tool: local lookup, no network
    ///
    /// An empty string is treated like an omitted device type.
    pub fn get_device_type_docs(&self, device_type: Option<&str>) -> Value {
        debug!(?device_type, "get_device_type_docs");

        match device_type.filter(|t| !t.is_empty()) {
            Some(name) => match find_device_type(name) {
                Some(doc) => ToolResponse::success(Map::new())
                    .with_field("device_type", json!(name))
                    .with_field("documentation", json!(doc))
                    .into(),
                None => ToolResponse::failure(format!("未找到设备类型 '{name}' 的文档"))
                    .with_field("available_types", json!(available_types()))
                    .into(),
            },
            None => ToolResponse::success(Map::new())
                .with_message("设备类型文档概览")
                .with_field("available_types", json!(available_types()))
                .with_field("documentation", full_documentation())
                .into(),
        }
    }
}
