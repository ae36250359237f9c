//! Conversions from protobuf identifiers and values to row columns.

use super::errors::HandlerError;
use shared_types::proto::{self, FileId, TopicId};
use shared_types::EntityId;

pub fn file_entity(file_id: &FileId) -> Result<EntityId, HandlerError> {
    Ok(EntityId::from_parts(
        file_id.shard_num,
        file_id.realm_num,
        file_id.file_num,
    )?)
}

pub fn topic_entity(topic_id: &TopicId) -> Result<EntityId, HandlerError> {
    Ok(EntityId::from_parts(
        topic_id.shard_num,
        topic_id.realm_num,
        topic_id.topic_num,
    )?)
}

pub fn nanos(timestamp: &Option<proto::Timestamp>) -> Option<i64> {
    timestamp.as_ref().map(proto::Timestamp::to_nanos)
}

pub fn seconds(duration: &Option<proto::Duration>) -> Option<i64> {
    duration.as_ref().map(|d| d.seconds)
}

pub fn key(key: &Option<proto::Key>) -> Option<Vec<u8>> {
    key.as_ref().map(proto::key_bytes)
}

pub fn key_list(keys: &Option<proto::KeyList>) -> Option<Vec<u8>> {
    use prost::Message;
    keys.as_ref().map(|keys| keys.encode_to_vec())
}

/// The wrapped value of an optional string field.
pub fn string_value(value: &Option<proto::StringValue>) -> Option<String> {
    value.as_ref().map(|v| v.value.clone())
}

/// `None` for an empty string, so merging leaves the old value.
pub fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
