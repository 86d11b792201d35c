//! Legacy NGSIv1 payloads.
//!
//! NGSIv1 has no count header: a `queryContext` sent with `details=on`
//! reports the number of matching entities in its `errorCode.details` field,
//! formatted as `"Count: <n>"`.

use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;
use std::num::ParseIntError;

const COUNT_PREFIX: &str = "Count: ";
const OK: &str = "200";

#[derive(thiserror::Error, Debug)]
pub enum V1Error {
    #[error("{code} {reason}")]
    Status { code: String, reason: String },

    #[error("count error")]
    CountFormat { details: String },

    #[error(transparent)]
    CountParse(#[from] ParseIntError),

    #[error("failed to decode NGSIv1 response: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum UpdateAction {
    Append,
    Delete,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusCode {
    pub code: String,
    pub reason_phrase: String,
    pub details: String,
}

impl StatusCode {
    fn is_ok(&self) -> bool {
        self.code == OK
    }

    fn into_error(self) -> V1Error {
        V1Error::Status {
            code: self.code,
            reason: self.reason_phrase,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    #[serde(default)]
    pub context_element: Map<String, Value>,
    #[serde(default)]
    pub status_code: StatusCode,
}

/// The response to a `queryContext` or an `updateContext` request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V1Response {
    #[serde(default)]
    pub context_responses: Vec<ContextResponse>,
    pub error_code: Option<StatusCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct V1UpdateRequest {
    pub context_elements: Vec<Map<String, Value>>,
    pub update_action: UpdateAction,
}

/// The body of a `queryContext` matching all the entities of a type
pub fn v1_query_payload(entity_type: &str) -> Value {
    json!({
        "entities": [
            {"type": entity_type, "isPattern": "true", "id": ".*"}
        ]
    })
}

/// Extract the total entity count from the `details` of a `queryContext` response
pub fn parse_count(details: &str) -> Result<usize, V1Error> {
    let count = details
        .strip_prefix(COUNT_PREFIX)
        .ok_or_else(|| V1Error::CountFormat {
            details: details.to_string(),
        })?;
    Ok(count.parse()?)
}

/// Turn a `queryContext` response into an `updateContext` request.
///
/// Returns the request along with the total count of matching entities
/// as reported by the source, which can be larger than the page.
pub fn make_v1_entities(
    body: &[u8],
    action: UpdateAction,
) -> Result<(V1UpdateRequest, usize), V1Error> {
    let response: V1Response = serde_json::from_slice(body).map_err(V1Error::Decode)?;
    let status = response.error_code.unwrap_or_default();
    if !status.is_ok() {
        return Err(status.into_error());
    }
    let count = parse_count(&status.details)?;

    let context_elements = response
        .context_responses
        .into_iter()
        .map(|response| match action {
            UpdateAction::Append => response.context_element,
            UpdateAction::Delete => entity_reference(response.context_element),
        })
        .collect();

    Ok((
        V1UpdateRequest {
            context_elements,
            update_action: action,
        },
        count,
    ))
}

/// Check the response to an `updateContext` request,
/// returning the number of entities acknowledged by the broker
pub fn check_v1_update_response(body: &[u8]) -> Result<usize, V1Error> {
    let response: V1Response = serde_json::from_slice(body).map_err(V1Error::Decode)?;
    if let Some(status) = response.error_code {
        if !status.is_ok() {
            return Err(status.into_error());
        }
    }
    let count = response.context_responses.len();
    for response in response.context_responses {
        if !response.status_code.is_ok() {
            return Err(response.status_code.into_error());
        }
    }
    Ok(count)
}

/// A DELETE only needs to name the entity
fn entity_reference(element: Map<String, Value>) -> Map<String, Value> {
    let mut reference = Map::new();
    for key in ["type", "id"] {
        if let Some(value) = element.get(key) {
            reference.insert(key.to_string(), value.clone());
        }
    }
    reference.insert("isPattern".into(), "false".into());
    reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    const QUERY_RESPONSE: &str = r#"{
        "contextResponses": [
            {
                "contextElement": {
                    "type": "Thing",
                    "isPattern": "false",
                    "id": "thing001",
                    "attributes": [{"name": "temperature", "type": "Number", "value": "21.5"}]
                },
                "statusCode": {"code": "200", "reasonPhrase": "OK"}
            },
            {
                "contextElement": {"type": "Thing", "isPattern": "false", "id": "thing002", "attributes": []},
                "statusCode": {"code": "200", "reasonPhrase": "OK"}
            }
        ],
        "errorCode": {"code": "200", "reasonPhrase": "OK", "details": "Count: 12"}
    }"#;

    #[test]
    fn query_response_is_repacked_for_append() {
        let (request, count) =
            make_v1_entities(QUERY_RESPONSE.as_bytes(), UpdateAction::Append).unwrap();

        assert_eq!(count, 12);
        assert_json_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "contextElements": [
                    {
                        "type": "Thing",
                        "isPattern": "false",
                        "id": "thing001",
                        "attributes": [{"name": "temperature", "type": "Number", "value": "21.5"}]
                    },
                    {"type": "Thing", "isPattern": "false", "id": "thing002", "attributes": []}
                ],
                "updateAction": "APPEND"
            })
        );
    }

    #[test]
    fn delete_only_names_the_entities() {
        let (request, _) =
            make_v1_entities(QUERY_RESPONSE.as_bytes(), UpdateAction::Delete).unwrap();

        assert_json_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "contextElements": [
                    {"type": "Thing", "id": "thing001", "isPattern": "false"},
                    {"type": "Thing", "id": "thing002", "isPattern": "false"}
                ],
                "updateAction": "DELETE"
            })
        );
    }

    #[test]
    fn empty_page() {
        let body = br#"{"errorCode": {"code": "200", "reasonPhrase": "OK", "details": "Count: 0"}}"#;

        let (request, count) = make_v1_entities(body, UpdateAction::Append).unwrap();

        assert_eq!(count, 0);
        assert!(request.context_elements.is_empty());
    }

    #[test]
    fn error_code_other_than_200() {
        let body = br#"{"errorCode": {"code": "404", "reasonPhrase": "No context element found"}}"#;

        let error = make_v1_entities(body, UpdateAction::Append).unwrap_err();

        assert_eq!(error.to_string(), "404 No context element found");
    }

    #[test]
    fn missing_error_code() {
        let body = br#"{"contextResponses": []}"#;

        assert_matches!(
            make_v1_entities(body, UpdateAction::Append),
            Err(V1Error::Status { code, .. }) if code.is_empty()
        );
    }

    #[test]
    fn details_without_count() {
        let body = br#"{"errorCode": {"code": "200", "reasonPhrase": "OK", "details": "12"}}"#;

        let error = make_v1_entities(body, UpdateAction::Append).unwrap_err();

        assert_eq!(error.to_string(), "count error");
    }

    #[test]
    fn count_is_not_a_number() {
        let body = br#"{"errorCode": {"code": "200", "reasonPhrase": "OK", "details": "Count: many"}}"#;

        assert_matches!(
            make_v1_entities(body, UpdateAction::Append),
            Err(V1Error::CountParse(_))
        );
    }

    #[test]
    fn query_response_is_not_json() {
        assert_matches!(
            make_v1_entities(b"<html>", UpdateAction::Append),
            Err(V1Error::Decode(_))
        );
    }

    #[test]
    fn update_response_counts_acknowledged_entities() {
        let body = br#"{
            "contextResponses": [
                {"contextElement": {"id": "thing001"}, "statusCode": {"code": "200", "reasonPhrase": "OK"}},
                {"contextElement": {"id": "thing002"}, "statusCode": {"code": "200", "reasonPhrase": "OK"}}
            ]
        }"#;

        assert_eq!(check_v1_update_response(body).unwrap(), 2);
    }

    #[test]
    fn update_response_with_a_failed_entity() {
        let body = br#"{
            "contextResponses": [
                {"contextElement": {"id": "thing001"}, "statusCode": {"code": "200", "reasonPhrase": "OK"}},
                {"contextElement": {"id": "thing002"}, "statusCode": {"code": "472", "reasonPhrase": "request parameter is invalid/not allowed"}}
            ]
        }"#;

        let error = check_v1_update_response(body).unwrap_err();

        assert_eq!(
            error.to_string(),
            "472 request parameter is invalid/not allowed"
        );
    }

    #[test]
    fn update_response_with_a_top_level_error() {
        let body = br#"{"errorCode": {"code": "400", "reasonPhrase": "Bad Request"}}"#;

        assert_matches!(
            check_v1_update_response(body),
            Err(V1Error::Status { code, reason }) if code == "400" && reason == "Bad Request"
        );
    }

    #[test]
    fn query_payload_matches_all_entities_of_a_type() {
        assert_eq!(
            v1_query_payload("Thing"),
            json!({"entities": [{"type": "Thing", "isPattern": "true", "id": ".*"}]})
        );
    }

    proptest! {
        #[test]
        fn count_round_trip(n in any::<usize>()) {
            prop_assert_eq!(parse_count(&format!("Count: {n}")).unwrap(), n);
        }
    }
}
