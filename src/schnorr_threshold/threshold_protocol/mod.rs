pub mod coordinator;
pub mod party;
pub mod protocol_messages;
