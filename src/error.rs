use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Missing required --{name} argument")]
    MissingArgument { name: &'static str },

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: String, to: String },

    #[error("No stores given (use --store or --stores)")]
    NoStores,

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("No GraphQL endpoint configured (set GRAPHQL_URL or the endpoint config key)")]
    MissingEndpoint,

    #[error("Store \"{name}\" not found")]
    UnknownStore { name: String },

    #[error("{0}")]
    Graph(#[from] GraphError),
}

impl AppError {
    /// Upstream signals that should skip the store this run rather than
    /// count as a pipeline failure.
    pub(crate) fn is_transient(&self) -> bool {
        matches!(self, AppError::Graph(g) if g.is_transient())
    }
}

#[derive(Debug, Error)]
pub(crate) enum GraphError {
    #[error("Request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("GraphQL errors: {}", messages.join("; "))]
    Api { messages: Vec<String> },

    #[error("Malformed response: {context}")]
    Malformed { context: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to start request pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl GraphError {
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            GraphError::Api { messages } => messages.iter().any(|m| {
                let m = m.to_lowercase();
                m.contains("rate limit")
                    || m.contains("too many requests")
                    || m.contains("pending verification")
            }),
            _ => false,
        }
    }
}
