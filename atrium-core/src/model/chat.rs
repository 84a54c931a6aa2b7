use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::WorkspaceId;

/// Parent id carried by the first message of a new conversation.
pub const NO_PARENT: &str = "00000000-0000-0000-0000-000000000000";

/// Outgoing chat request as seen by the context-injection step.
///
/// Only the fields the workspace feature reads or writes are typed; everything
/// else passes through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(rename = "workspace_id", default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_prefix: Option<String>,

    /// Attached files, opaque to this crate
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ChatRequest {
    /// True for the first message of a new conversation.
    pub fn starts_conversation(&self) -> bool {
        self.parent_message_id.as_deref() == Some(NO_PARENT)
    }

    /// The workspace to inject, if this request qualifies for injection.
    pub fn injection_target(&self) -> Option<&str> {
        match self.workspace_id.as_deref() {
            Some(id) if !id.is_empty() && self.starts_conversation() => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_round_trip() {
        let body = json!({
            "text": "hello",
            "endpoint": "openAI",
            "workspace_id": "ws-1",
            "parentMessageId": NO_PARENT,
            "promptPrefix": "Be brief",
        });

        let request: ChatRequest = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(request.injection_target(), Some("ws-1"));
        assert_eq!(request.rest["text"], "hello");
        assert_eq!(serde_json::to_value(&request).unwrap(), body);
    }

    #[test]
    fn test_follow_up_messages_are_not_targets() {
        let request = ChatRequest {
            workspace_id: Some("ws-1".into()),
            parent_message_id: Some("msg-1".into()),
            ..Default::default()
        };
        assert_eq!(request.injection_target(), None);

        let request = ChatRequest {
            workspace_id: None,
            parent_message_id: Some(NO_PARENT.into()),
            ..Default::default()
        };
        assert_eq!(request.injection_target(), None);
    }
}
