use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageWithError {
    pub message: String,
    pub error: String,
}

impl MessageWithError {
    pub fn new(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            message: message.into(),
            error: error.to_string(),
        }
    }
}
