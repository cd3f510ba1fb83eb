//! Actions (`/v1/actions`)
//!
//! Most actions apply to every host or service matched by a [`Target`].

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::client::Client;
use crate::error::{ApiError, Result};
use crate::objects::ObjectType;

const BASE_URL_PATH: &str = "/v1/actions";

/// Objects an action applies to: a type plus an optional filter expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Target {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            filter: None,
        }
    }

    pub fn hosts(filter: impl Into<String>) -> Self {
        Self::new("Host").with_filter(filter)
    }

    pub fn services(filter: impl Into<String>) -> Self {
        Self::new("Service").with_filter(filter)
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Passive check result for `process-check-result`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Services: 0=OK, 1=WARNING, 2=CRITICAL, 3=UNKNOWN. Hosts: 0=UP, 1=DOWN.
    pub exit_status: u8,
    pub plugin_output: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub performance_data: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub check_command: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub author: String,
    pub comment: String,
    /// Unix timestamp after which the acknowledgement is removed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    /// Keep until the object fully recovers
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sticky: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub notify: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Downtime {
    pub author: String,
    pub comment: String,
    pub start_time: i64,
    pub end_time: i64,
    /// Length in seconds of a flexible downtime
    pub duration: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fixed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_name: Option<String>,
}

/// Action endpoint
pub struct Actions<'a> {
    client: &'a Client,
}

impl<'a> Actions<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Submit a passive check result for one host or service
    pub async fn process_check_result(
        &self,
        object_type: ObjectType,
        name: &str,
        result: &CheckResult,
    ) -> Result<Value> {
        let key = match object_type {
            ObjectType::Host => "host",
            ObjectType::Service => "service",
            _ => {
                return Err(ApiError::Configuration(
                    "object_type needs to be \"Host\" or \"Service\".".to_string(),
                ))
            }
        };

        let mut payload = to_map(result)?;
        payload.insert(key.into(), json!(name));
        self.post("process-check-result", Value::Object(payload))
            .await
    }

    /// Reschedule checks, optionally ignoring time periods and disabled checks
    pub async fn reschedule_check(
        &self,
        target: &Target,
        next_check: Option<i64>,
        force_check: bool,
    ) -> Result<Value> {
        let mut payload = targeted(target)?;
        payload.insert("force_check".into(), json!(force_check));
        if let Some(next_check) = next_check {
            payload.insert("next_check".into(), json!(next_check));
        }
        self.post("reschedule-check", Value::Object(payload)).await
    }

    pub async fn send_custom_notification(
        &self,
        target: &Target,
        author: &str,
        comment: &str,
        force: bool,
    ) -> Result<Value> {
        let mut payload = targeted(target)?;
        payload.insert("author".into(), json!(author));
        payload.insert("comment".into(), json!(comment));
        payload.insert("force".into(), json!(force));
        self.post("send-custom-notification", Value::Object(payload))
            .await
    }

    /// Delay notifications until `timestamp`
    pub async fn delay_notification(&self, target: &Target, timestamp: i64) -> Result<Value> {
        let mut payload = targeted(target)?;
        payload.insert("timestamp".into(), json!(timestamp));
        self.post("delay-notification", Value::Object(payload))
            .await
    }

    pub async fn acknowledge_problem(
        &self,
        target: &Target,
        acknowledgement: &Acknowledgement,
    ) -> Result<Value> {
        let mut payload = targeted(target)?;
        payload.extend(to_map(acknowledgement)?);
        self.post("acknowledge-problem", Value::Object(payload))
            .await
    }

    pub async fn remove_acknowledgement(&self, target: &Target) -> Result<Value> {
        let payload = targeted(target)?;
        self.post("remove-acknowledgement", Value::Object(payload))
            .await
    }

    pub async fn add_comment(&self, target: &Target, author: &str, comment: &str) -> Result<Value> {
        let mut payload = targeted(target)?;
        payload.insert("author".into(), json!(author));
        payload.insert("comment".into(), json!(comment));
        self.post("add-comment", Value::Object(payload)).await
    }

    /// Remove a comment by name (`object_type` = `Comment`) or by filter
    pub async fn remove_comment(
        &self,
        object_type: &str,
        name: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Value> {
        let payload = removal_payload(object_type, name, filter);
        self.post("remove-comment", payload).await
    }

    pub async fn schedule_downtime(&self, target: &Target, downtime: &Downtime) -> Result<Value> {
        let mut payload = targeted(target)?;
        payload.extend(to_map(downtime)?);
        self.post("schedule-downtime", Value::Object(payload)).await
    }

    /// Remove a downtime by name (`object_type` = `Downtime`) or by filter
    pub async fn remove_downtime(
        &self,
        object_type: &str,
        name: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Value> {
        if name.is_none() && filter.is_none() {
            return Err(ApiError::Configuration(
                "name and filters is empty or none".to_string(),
            ));
        }
        let payload = removal_payload(object_type, name, filter);
        self.post("remove-downtime", payload).await
    }

    /// Shut down the Icinga 2 process; the call may not return
    pub async fn shutdown_process(&self) -> Result<Value> {
        self.post("shutdown-process", Value::Null).await
    }

    /// Restart the Icinga 2 process; the call may not return
    pub async fn restart_process(&self) -> Result<Value> {
        self.post("restart-process", Value::Null).await
    }

    async fn post(&self, action: &str, payload: Value) -> Result<Value> {
        let path = format!("{BASE_URL_PATH}/{action}");
        self.client
            .request(Method::POST, &path, Some(&payload))
            .await
    }
}

fn to_map(value: &impl Serialize) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// Payload seeded with the target's `type` and `filter`
fn targeted(target: &Target) -> Result<Map<String, Value>> {
    if target.object_type.trim().is_empty() {
        return Err(ApiError::Configuration(
            "action target needs an object type".to_string(),
        ));
    }
    to_map(target)
}

fn removal_payload(object_type: &str, name: Option<&str>, filter: Option<&str>) -> Value {
    let mut payload = Map::new();
    payload.insert("type".into(), json!(object_type));
    if let Some(name) = name {
        payload.insert(object_type.to_lowercase(), json!(name));
    }
    if let Some(filter) = filter {
        payload.insert("filter".into(), json!(filter));
    }
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targeted_payload() {
        let payload = targeted(&Target::services("service.name==\"ping4\"")).unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({"type": "Service", "filter": "service.name==\"ping4\""})
        );

        assert!(matches!(
            targeted(&Target::new(" ")),
            Err(ApiError::Configuration(_))
        ));
    }

    #[test]
    fn test_check_result_omits_empty_fields() {
        let result = CheckResult {
            exit_status: 2,
            plugin_output: "PING CRITICAL - Packet loss = 100%".into(),
            performance_data: vec!["rta=5000.000000ms;3000.000000;5000.000000;0.000000".into()],
            ..Default::default()
        };
        assert_eq!(
            Value::Object(to_map(&result).unwrap()),
            json!({
                "exit_status": 2,
                "plugin_output": "PING CRITICAL - Packet loss = 100%",
                "performance_data": ["rta=5000.000000ms;3000.000000;5000.000000;0.000000"]
            })
        );
    }

    #[test]
    fn test_acknowledgement_flags() {
        let ack = Acknowledgement {
            author: "icingaadmin".into(),
            comment: "working on it".into(),
            sticky: true,
            ..Default::default()
        };
        let mut payload = targeted(&Target::hosts("host.name==\"web01\"")).unwrap();
        payload.extend(to_map(&ack).unwrap());

        assert_eq!(
            Value::Object(payload),
            json!({
                "type": "Host",
                "filter": "host.name==\"web01\"",
                "author": "icingaadmin",
                "comment": "working on it",
                "sticky": true
            })
        );
    }

    #[test]
    fn test_removal_payload_uses_type_as_key() {
        assert_eq!(
            removal_payload("Downtime", Some("localhost!ping4!localhost-1458148978-14"), None),
            json!({"type": "Downtime", "downtime": "localhost!ping4!localhost-1458148978-14"})
        );
        assert_eq!(
            removal_payload("Service", None, Some("service.name==\"ping4\"")),
            json!({"type": "Service", "filter": "service.name==\"ping4\""})
        );
    }

    fn offline_client() -> Client {
        Client::new(crate::ClientConfig::new("https://127.0.0.1:9")).unwrap()
    }

    #[tokio::test]
    async fn test_check_result_only_for_hosts_and_services() {
        let client = offline_client();
        let result = client
            .actions()
            .process_check_result(ObjectType::Downtime, "web01", &CheckResult::default())
            .await;
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_remove_downtime_needs_name_or_filter() {
        let client = offline_client();
        let result = client.actions().remove_downtime("Downtime", None, None).await;
        assert!(matches!(result, Err(ApiError::Configuration(msg)) if msg == "name and filters is empty or none"));
    }
}
