//! Client events for the realtime side channel. Only the two event kinds the
//! control plane actually sends are modeled; inbound server events are
//! treated as opaque JSON by the connection.

/// The role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "input_text")]
    InputText { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageItem {
    role: MessageRole,
    content: Vec<ContentPart>,
}

impl MessageItem {
    pub fn new(role: MessageRole, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &[ContentPart] {
        &self.content
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Item {
    #[serde(rename = "message")]
    Message(MessageItem),
}

impl Item {
    /// A single-part user text message, the shape every control utterance
    /// takes on the wire.
    pub fn user_text(text: impl Into<String>) -> Self {
        Item::Message(MessageItem::new(
            MessageRole::User,
            vec![ContentPart::InputText { text: text.into() }],
        ))
    }
}

/// `conversation.item.create` event
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConversationItemCreateEvent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    event_id: Option<String>,
    pub item: Item,
}

impl ConversationItemCreateEvent {
    pub fn new(item: Item) -> Self {
        Self {
            event_id: None,
            item,
        }
    }

    pub fn with_event_id(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }
}

/// `response.create` event
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResponseCreateEvent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    event_id: Option<String>,
}

impl ResponseCreateEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_id(mut self, event_id: &str) -> Self {
        self.event_id = Some(event_id.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate(ConversationItemCreateEvent),
    #[serde(rename = "response.create")]
    ResponseCreate(ResponseCreateEvent),
}

impl ClientEvent {
    /// Wraps a user utterance as a conversation turn.
    pub fn user_message(text: impl Into<String>) -> Self {
        ClientEvent::ConversationItemCreate(ConversationItemCreateEvent::new(Item::user_text(
            text,
        )))
    }

    /// The kickoff event sent as soon as the side channel opens.
    pub fn begin_response() -> Self {
        ClientEvent::ResponseCreate(ResponseCreateEvent::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_matches_the_side_channel_protocol() {
        let event = ClientEvent::user_message("요약해줘");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "conversation.item.create");
        assert_eq!(json["item"]["type"], "message");
        assert_eq!(json["item"]["role"], "user");
        assert_eq!(json["item"]["content"][0]["type"], "input_text");
        assert_eq!(json["item"]["content"][0]["text"], "요약해줘");
    }

    #[test]
    fn kickoff_is_a_bare_response_create() {
        let json = serde_json::to_string(&ClientEvent::begin_response()).unwrap();
        assert_eq!(json, r#"{"type":"response.create"}"#);
    }
}
