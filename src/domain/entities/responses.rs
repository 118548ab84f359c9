use serde::Serialize;
use uuid::Uuid;

/// Outcome of an admin action, `message` is what a UI would flash.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ActionResponse<T> {
    pub fn with_data(message: impl Into<String>, id: Uuid, data: T) -> Self {
        ActionResponse {
            message: message.into(),
            id: Some(id),
            data: Some(data),
        }
    }
}

impl ActionResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ActionResponse {
            message: message.into(),
            id: None,
            data: None,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_messages: usize,
    pub unread_messages: usize,
    pub featured_projects: usize,
}
