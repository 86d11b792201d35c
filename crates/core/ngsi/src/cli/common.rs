use crate::client::Endpoint;
use crate::NgsiError;
use ngsi_api::at_context::AtContext;
use ngsi_api::NgsiType;
use ngsi_config::Broker;
use ngsi_config::NgsiConfig;
use ngsi_config::NgsiConfigLocation;
use reqwest::blocking;

/// The options selecting a broker endpoint, after the registry values
#[derive(Debug, Clone, Default)]
pub struct BrokerOverrides {
    pub ngsi_type: Option<NgsiType>,
    pub tenant: Option<String>,
    pub scope: Option<String>,
    pub token: Option<String>,
}

pub fn resolve_broker(
    config: &NgsiConfig,
    location: &NgsiConfigLocation,
    name: &str,
    overrides: BrokerOverrides,
) -> Result<Broker, NgsiError> {
    let mut broker = config.broker(name, location)?;
    if let Some(ngsi_type) = overrides.ngsi_type {
        broker.ngsi_type = ngsi_type;
    }
    broker.tenant = overrides.tenant.or(broker.tenant);
    broker.scope = overrides.scope.or(broker.scope);
    broker.token = overrides.token.or(broker.token);
    Ok(broker)
}

/// The endpoint of a broker, NGSIv2 brokers defaulting to the root scope
pub fn endpoint(broker: &Broker, link: Option<String>) -> Endpoint {
    let mut endpoint = Endpoint::new(broker, link);
    if broker.ngsi_type == NgsiType::V2 && endpoint.scope.is_none() {
        endpoint.scope = Some("/".to_string());
    }
    endpoint
}

/// The URL of the context sent as a `Link` header
pub fn link_url(
    config: &NgsiConfig,
    broker: &Broker,
    name: Option<String>,
) -> Result<Option<String>, NgsiError> {
    let Some(name) = name else {
        return Ok(None);
    };
    if broker.ngsi_type == NgsiType::V2 {
        return Err(NgsiError::LinkOnV2);
    }
    match config.at_context(&name)? {
        AtContext::Url(url) => Ok(Some(url)),
        AtContext::Inline(_) => Err(NgsiError::LinkNotUrl { name }),
    }
}

pub fn http_client() -> Result<blocking::Client, NgsiError> {
    Ok(blocking::Client::builder().build()?)
}
