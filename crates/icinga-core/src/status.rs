//! Status and statistics (`/v1/status`)

use reqwest::Method;
use serde_json::Value;

use crate::client::Client;
use crate::error::Result;

const BASE_URL_PATH: &str = "/v1/status";

pub struct Status<'a> {
    client: &'a Client,
}

impl<'a> Status<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Status of every component, or only `component` (e.g. `IcingaApplication`)
    pub async fn list(&self, component: Option<&str>) -> Result<Value> {
        self.client
            .request(Method::GET, &status_path(component), None)
            .await
    }
}

fn status_path(component: Option<&str>) -> String {
    match component {
        Some(component) => format!("{BASE_URL_PATH}/{component}"),
        None => BASE_URL_PATH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_path() {
        assert_eq!(status_path(None), "/v1/status");
        assert_eq!(
            status_path(Some("IcingaApplication")),
            "/v1/status/IcingaApplication"
        );
    }
}
