//! Error types for sf-bulk.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// The underlying transport error, when the failure came from HTTP.
    pub fn client_error(&self) -> Option<&salesforce_bulk_client::Error> {
        self.source.as_ref()?.downcast_ref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Client error: {0}")]
    Client(String),
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("XML error: {0}")]
    Xml(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Other(String),
}

impl From<salesforce_bulk_client::Error> for Error {
    fn from(err: salesforce_bulk_client::Error) -> Self {
        let kind = match err.kind {
            salesforce_bulk_client::ErrorKind::Xml(ref msg) => ErrorKind::Xml(msg.clone()),
            _ => ErrorKind::Client(err.to_string()),
        };
        Error { kind, source: Some(Box::new(err)) }
    }
}

impl From<salesforce_bulk_auth::Error> for Error {
    fn from(err: salesforce_bulk_auth::Error) -> Self {
        Error { kind: ErrorKind::Auth(err.to_string()), source: Some(Box::new(err)) }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error { kind: ErrorKind::Csv(err.to_string()), source: Some(Box::new(err)) }
    }
}
