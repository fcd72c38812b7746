use std::borrow::Cow;
use std::collections::BTreeMap;

use url::form_urlencoded;

/// Transport-agnostic view of an inbound request.
///
/// Holds only what the pipeline reads: host, path, query and headers. Header
/// names are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundRequest {
    host: String,
    path: String,
    query: Option<String>,
    headers: BTreeMap<String, String>,
}

impl InboundRequest {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            query: None,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Host as received, including any port.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn origin(&self) -> Option<&str> {
        self.header("origin")
    }

    /// First value of `name` in the query string, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        form_urlencoded::parse(self.query()?.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}
