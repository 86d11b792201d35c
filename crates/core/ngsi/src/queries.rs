//! The broker requests used by the copy and remove strategies.

use crate::client::BrokerClient;
use crate::client::APPLICATION_JSON;
use crate::client::APPLICATION_LD_JSON;
use crate::error::Cause;
use crate::error::ReplicationError;
use crate::error::ResultExt;
use crate::error::Step;
use crate::error::Strategy;
use crate::pagination::Fetched;
use crate::pagination::Window;
use bytes::Bytes;
use ngsi_api::at_context::insert_at_context;
use ngsi_api::at_context::AtContext;
use ngsi_api::json_v1::check_v1_update_response;
use ngsi_api::json_v1::make_v1_entities;
use ngsi_api::json_v1::v1_query_payload;
use ngsi_api::json_v1::UpdateAction;
use ngsi_api::json_v1::V1UpdateRequest;
use ngsi_api::json_v2::BatchUpdate;
use ngsi_api::Dialect;
use ngsi_api::Entity;
use reqwest::StatusCode;

/// What is read from the source on each page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// All the attributes, the window moving forward by `offset`
    Full,
    /// Only ids and types, always reading the first page
    IdsOnly,
}

/// `GET /v2/entities` with the total count in the `Fiware-Total-Count` header
pub fn fetch_v2(
    source: &BrokerClient,
    strategy: Strategy,
    entity_type: &str,
    window: Window,
    skip_forwarding: bool,
    projection: Projection,
) -> Result<Fetched<Bytes>, ReplicationError> {
    let options = if skip_forwarding {
        "count,skipForwarding"
    } else {
        "count"
    };
    let mut query = vec![
        ("type", entity_type.to_string()),
        ("options", options.to_string()),
        ("limit", window.limit.to_string()),
    ];
    match projection {
        Projection::Full => query.push(("offset", window.offset.to_string())),
        Projection::IdsOnly => query.push(("attrs", "__NONE".to_string())),
    }

    let response = source
        .get(Dialect::V2, "/entities", &query)
        .and_then(|response| response.expect_status(StatusCode::OK))
        .at(strategy, Step::Fetch)?;
    let total = response.results_count(Dialect::V2).at(strategy, Step::Count)?;
    Ok(Fetched {
        total,
        page: response.body,
    })
}

/// `GET /ngsi-ld/v1/entities` with the total count in the `NGSILD-Results-Count` header
pub fn fetch_ld(
    source: &BrokerClient,
    strategy: Strategy,
    entity_type: &str,
    window: Window,
    projection: Projection,
) -> Result<Fetched<Bytes>, ReplicationError> {
    let mut query = vec![
        ("type", entity_type.to_string()),
        ("count", "true".to_string()),
        ("limit", window.limit.to_string()),
    ];
    if projection == Projection::Full {
        query.push(("offset", window.offset.to_string()));
    }

    let response = source
        .get(Dialect::Ld, "/entities", &query)
        .and_then(|response| response.expect_status(StatusCode::OK))
        .at(strategy, Step::Fetch)?;
    let total = response.results_count(Dialect::Ld).at(strategy, Step::Count)?;
    Ok(Fetched {
        total,
        page: response.body,
    })
}

/// `POST /v1/queryContext` with the total count in the `errorCode.details` of the response,
/// the entities being repacked as an update request with the given action
pub fn query_v1(
    source: &BrokerClient,
    strategy: Strategy,
    entity_type: &str,
    window: Window,
    action: UpdateAction,
) -> Result<Fetched<V1UpdateRequest>, ReplicationError> {
    let query = [
        ("details", "on".to_string()),
        ("limit", window.limit.to_string()),
        ("offset", window.offset.to_string()),
    ];
    let body = serde_json::to_vec(&v1_query_payload(entity_type)).at(strategy, Step::Encode)?;
    let response = source
        .post(Dialect::V1, "/v1/queryContext", &query, APPLICATION_JSON, body)
        .and_then(|response| response.expect_status(StatusCode::OK))
        .at(strategy, Step::Fetch)?;
    let (request, total) = make_v1_entities(&response.body, action).at(strategy, Step::Count)?;
    Ok(Fetched {
        total,
        page: request,
    })
}

/// `POST /v1/updateContext`, returning the number of entities acknowledged by the broker
pub fn update_v1(
    destination: &BrokerClient,
    strategy: Strategy,
    request: &V1UpdateRequest,
) -> Result<usize, ReplicationError> {
    let body = serde_json::to_vec(request).at(strategy, Step::Encode)?;
    let response = destination
        .post(Dialect::V1, "/v1/updateContext", &[], APPLICATION_JSON, body)
        .and_then(|response| response.expect_status(StatusCode::OK))
        .at(strategy, Step::Write)?;
    check_v1_update_response(&response.body).at(strategy, Step::Write)
}

/// `POST /v2/op/update`
pub fn batch_update_v2(
    destination: &BrokerClient,
    strategy: Strategy,
    batch: &BatchUpdate,
) -> Result<(), ReplicationError> {
    let body = serde_json::to_vec(batch).at(strategy, Step::Encode)?;
    destination
        .post(Dialect::V2, "/op/update", &[], APPLICATION_JSON, body)
        .and_then(|response| response.expect_status(StatusCode::NO_CONTENT))
        .at(strategy, Step::Write)?;
    Ok(())
}

/// `POST /ngsi-ld/v1/entityOperations/create`, the `@context` being set first if any
pub fn create_ld(
    destination: &BrokerClient,
    strategy: Strategy,
    entities: &[u8],
    context: Option<&AtContext>,
) -> Result<(), ReplicationError> {
    let body = match context {
        Some(context) => insert_at_context(entities, context).at(strategy, Step::AtContext)?,
        None => entities.to_vec(),
    };
    destination
        .post(
            Dialect::Ld,
            "/entityOperations/create",
            &[],
            APPLICATION_LD_JSON,
            body,
        )
        .and_then(|response| response.expect_status(StatusCode::CREATED))
        .at(strategy, Step::Write)?;
    Ok(())
}

/// `POST /ngsi-ld/v1/entityOperations/delete` with the ids of the given entities
pub fn delete_ld(
    destination: &BrokerClient,
    strategy: Strategy,
    entities: &[Entity],
) -> Result<(), ReplicationError> {
    let ids = entities
        .iter()
        .map(|entity| entity.get("id").and_then(|id| id.as_str()))
        .collect::<Option<Vec<_>>>()
        .ok_or(Cause::MissingId)
        .at(strategy, Step::Decode)?;
    let body = serde_json::to_vec(&ids).at(strategy, Step::Encode)?;
    destination
        .post(
            Dialect::Ld,
            "/entityOperations/delete",
            &[],
            APPLICATION_JSON,
            body,
        )
        .and_then(|response| response.expect_status(StatusCode::NO_CONTENT))
        .at(strategy, Step::Write)?;
    Ok(())
}
