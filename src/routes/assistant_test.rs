use super::*;

#[test]
fn request_deserializes_message() {
    let request: AssistantRequest = serde_json::from_str(r#"{"message":"show all faculty"}"#).unwrap();
    assert_eq!(request.message, "show all faculty");
}

#[test]
fn reply_serializes_reply_key() {
    let reply = AssistantReply { reply: "Hello".to_owned() };
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["reply"], "Hello");
}
