//! Config objects (`/v1/objects`)

mod types;

pub use types::ObjectType;

use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::client::Client;
use crate::error::Result;

const BASE_URL_PATH: &str = "/v1/objects";

/// Which joined objects to include in a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Joins {
    All,
    Named(Vec<String>),
}

/// Optional parts of an object query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Only return these attributes
    pub attrs: Vec<String>,
    /// Filter expression, e.g. `match("webserver*", host.name)`
    pub filter: Option<String>,
    pub joins: Option<Joins>,
}

/// Object CRUD endpoint
pub struct Objects<'a> {
    client: &'a Client,
}

impl<'a> Objects<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List objects of a type, or one object by name
    pub async fn list(
        &self,
        object_type: ObjectType,
        name: Option<&str>,
        options: &ListOptions,
    ) -> Result<Value> {
        let path = object_path(object_type, name);
        self.client
            .request(Method::GET, &path, Some(&list_payload(options)))
            .await
    }

    /// Create an object from templates and attributes
    pub async fn create(
        &self,
        object_type: ObjectType,
        name: &str,
        templates: &[String],
        attrs: Option<&Value>,
    ) -> Result<Value> {
        let path = object_path(object_type, Some(name));
        self.client
            .request(Method::PUT, &path, Some(&create_payload(templates, attrs)))
            .await
    }

    /// Change attributes of an existing object
    pub async fn update(&self, object_type: ObjectType, name: &str, attrs: &Value) -> Result<Value> {
        let path = object_path(object_type, Some(name));
        self.client
            .request(Method::POST, &path, Some(&update_payload(attrs)))
            .await
    }

    /// Delete one object by name, or every object matching `filter`
    pub async fn delete(
        &self,
        object_type: ObjectType,
        name: Option<&str>,
        filter: Option<&str>,
        cascade: bool,
    ) -> Result<Value> {
        let path = object_path(object_type, name);
        self.client
            .request(Method::DELETE, &path, Some(&delete_payload(filter, cascade)))
            .await
    }
}

fn object_path(object_type: ObjectType, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{}/{}/{}", BASE_URL_PATH, object_type.url_segment(), name),
        None => format!("{}/{}", BASE_URL_PATH, object_type.url_segment()),
    }
}

fn create_payload(templates: &[String], attrs: Option<&Value>) -> Value {
    let mut payload = Map::new();
    if let Some(attrs) = attrs {
        payload.insert("attrs".into(), attrs.clone());
    }
    if !templates.is_empty() {
        payload.insert("templates".into(), json!(templates));
    }
    Value::Object(payload)
}

fn update_payload(attrs: &Value) -> Value {
    json!({ "attrs": attrs })
}

fn delete_payload(filter: Option<&str>, cascade: bool) -> Value {
    let mut payload = Map::new();
    if let Some(filter) = filter {
        payload.insert("filter".into(), json!(filter));
    }
    if cascade {
        payload.insert("cascade".into(), json!(1));
    }
    Value::Object(payload)
}

fn list_payload(options: &ListOptions) -> Value {
    let mut payload = Map::new();
    if !options.attrs.is_empty() {
        payload.insert("attrs".into(), json!(options.attrs));
    }
    if let Some(filter) = &options.filter {
        payload.insert("filter".into(), json!(filter));
    }
    match &options.joins {
        Some(Joins::All) => {
            payload.insert("all_joins".into(), json!("1"));
        }
        Some(Joins::Named(joins)) => {
            payload.insert("joins".into(), json!(joins));
        }
        None => {}
    }
    Value::Object(payload)
}
