use crate::Entity;
use serde::Serialize;

/// The action of an NGSIv2 `/v2/op/update` batch
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, strum_macros::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ActionType {
    Append,
    Delete,
}

/// Body of an NGSIv2 `/v2/op/update` request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdate {
    pub action_type: ActionType,
    pub entities: Vec<Entity>,
}

impl BatchUpdate {
    pub fn append(entities: Vec<Entity>) -> Self {
        BatchUpdate {
            action_type: ActionType::Append,
            entities,
        }
    }

    pub fn delete(entities: Vec<Entity>) -> Self {
        BatchUpdate {
            action_type: ActionType::Delete,
            entities,
        }
    }
}

/// Decode a page of NGSIv2 entities, as returned by `GET /v2/entities`
pub fn decode_entities(body: &[u8]) -> Result<Vec<Entity>, serde_json::Error> {
    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn batch_append_payload() {
        let entities = decode_entities(
            br#"[{"id": "thing001", "type": "Thing", "abc": {"type": "Text", "value": "x", "metadata": {}}}]"#,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(BatchUpdate::append(entities)).unwrap(),
            json!({
                "actionType": "append",
                "entities": [
                    {"id": "thing001", "type": "Thing", "abc": {"type": "Text", "value": "x", "metadata": {}}}
                ]
            })
        );
    }

    #[test]
    fn batch_delete_payload() {
        let entities = decode_entities(br#"[{"id": "thing001", "type": "Thing"}]"#).unwrap();

        assert_eq!(
            serde_json::to_value(BatchUpdate::delete(entities)).unwrap(),
            json!({"actionType": "delete", "entities": [{"id": "thing001", "type": "Thing"}]})
        );
    }

    #[test]
    fn a_page_must_be_an_array_of_objects() {
        assert!(decode_entities(b"[]").unwrap().is_empty());
        assert!(decode_entities(br#"{"id": "thing001"}"#).is_err());
        assert!(decode_entities(b"[1, 2]").is_err());
    }
}
