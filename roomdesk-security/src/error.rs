/// Failures talking to the user directory.
///
/// Session resolution folds every variant into "no session"; the detail
/// only reaches the logs.
#[derive(Debug)]
pub enum DirectoryError {
    /// The request never produced a response (connection, DNS, TLS).
    Request(String),
    /// The directory answered with a non-success status.
    Status(u16),
    /// The response body was not the expected JSON array.
    Decode(String),
    /// A row was returned but does not match the user schema.
    InvalidRow(String),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::Request(msg) => write!(f, "Directory request failed: {msg}"),
            DirectoryError::Status(code) => write!(f, "Directory responded with status {code}"),
            DirectoryError::Decode(msg) => write!(f, "Directory response could not be decoded: {msg}"),
            DirectoryError::InvalidRow(msg) => write!(f, "Directory row rejected: {msg}"),
        }
    }
}

impl std::error::Error for DirectoryError {}
