use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Token audience for a request. Fabric is the platform default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Fabric,
    /// Azure Resource Manager, used for capacity management.
    Azure,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Fabric => "fabric",
            Audience::Azure => "azure",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: String,
    pub method: HttpMethod,
    pub body: Option<Value>,
    pub audience: Option<Audience>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            audience: None,
            query: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = Some(audience);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Endpoint with query parameters appended.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.endpoint.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.endpoint, separator, query)
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path_and_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_and_query() {
        let request = ApiRequest::get("/subscriptions/s/capacities/c")
            .with_query("api-version", "2023-11-01");
        assert_eq!(
            request.path_and_query(),
            "/subscriptions/s/capacities/c?api-version=2023-11-01"
        );
        assert_eq!(request.to_string(), "GET /subscriptions/s/capacities/c?api-version=2023-11-01");
    }

    #[test]
    fn test_path_without_query_is_unchanged() {
        assert_eq!(ApiRequest::get("connections").path_and_query(), "connections");
    }

    #[test]
    fn test_builder_sets_fields() {
        let request = ApiRequest::post("workspaces/1/git/connect")
            .with_body(json!({"a": 1}))
            .with_audience(Audience::Azure);
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body, Some(json!({"a": 1})));
        assert_eq!(request.audience, Some(Audience::Azure));
    }
}
