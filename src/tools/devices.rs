//! Device listing, detail and control tools
//!
//! Thin wrappers over the backend device API. Control commands are
//! forwarded as-is; the backend decides what is legal.

use super::DeviceGateway;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

const OVERVIEW_OPERATION: &str = "获取设备概览";
const DETAIL_OPERATION: &str = "获取设备详情";
const CONTROL_OPERATION: &str = "设备控制";

/// Control command body sent to `/api/v1/devices/{id}/control/`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ControlCommand {
    /// Action name, e.g. `set_temperature` or `switch`
    pub action: String,

    /// Action parameters, e.g. `{"temperature": 24}`
    pub parameters: Map<String, Value>,
}

impl DeviceGateway {
    /// `get_device_overview` tool
    pub async fn get_device_overview(&self) -> Value {
        debug!("get_device_overview");
        self.guarded(OVERVIEW_OPERATION, self.client.device_overview())
            .await
    }

    /// `get_device_detail` tool
    pub async fn get_device_detail(&self, device_id: &str) -> Value {
        debug!(device_id, "get_device_detail");
        self.guarded(DETAIL_OPERATION, self.client.device_detail(device_id))
            .await
    }

    /// `control_device` tool
    pub async fn control_device(
        &self,
        device_id: &str,
        action: &str,
        parameters: Map<String, Value>,
    ) -> Value {
        debug!(device_id, action, "control_device");
        let command = ControlCommand {
            action: action.to_string(),
            parameters,
        };
        self.guarded(
            CONTROL_OPERATION,
            self.client.control_device(device_id, &command),
        )
        .await
    }
}
