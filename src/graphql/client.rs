//! GraphQL transport: the query/mutate seam and its HTTP implementation.

use serde_json::{Value, json};

use crate::error::GraphError;
use crate::graphql::gate::RequestGate;

/// Query/mutate seam to the backend. Implementations own their transport
/// policy; the pipeline only sees documents and variables.
pub(crate) trait Transport: Send + Sync {
    fn query(&self, document: &str, variables: Value) -> Result<Value, GraphError>;
    fn mutate(&self, document: &str, variables: Value) -> Result<Value, GraphError>;
}

/// HTTP client for the reporting backend. All requests run through the
/// process-wide request gate.
pub(crate) struct GraphClient {
    url: String,
    gate: RequestGate,
}

impl GraphClient {
    pub(crate) fn new(url: String, max_inflight: usize) -> Result<Self, GraphError> {
        Ok(GraphClient {
            url,
            gate: RequestGate::new(max_inflight)?,
        })
    }

    fn post(&self, document: &str, variables: Value) -> Result<Value, GraphError> {
        let payload = json!({ "query": document, "variables": variables });

        let body: Value = self.gate.run(|| {
            let response = ureq::post(&self.url).send_json(&payload)?;
            let mut body = response.into_body();
            Ok::<_, GraphError>(serde_json::from_reader(body.as_reader())?)
        })?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array)
            && !errors.is_empty()
        {
            let messages = errors
                .iter()
                .map(|e| {
                    e.get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string()
                })
                .collect();
            return Err(GraphError::Api { messages });
        }

        match body.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(GraphError::Malformed {
                context: "response has no data".to_string(),
            }),
        }
    }
}

impl Transport for GraphClient {
    fn query(&self, document: &str, variables: Value) -> Result<Value, GraphError> {
        self.post(document, variables)
    }

    fn mutate(&self, document: &str, variables: Value) -> Result<Value, GraphError> {
        self.post(document, variables)
    }
}
