use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct ProcessResult {
    pub succeeded: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl ProcessResult {
    pub fn ok() -> Self {
        Self {
            succeeded: true,
            error: "".to_string(),
            id: None,
        }
    }

    pub fn created(id: u64) -> Self {
        Self {
            succeeded: true,
            error: "".to_string(),
            id: Some(id),
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            succeeded: false,
            error: error.to_string(),
            id: None,
        }
    }
}
