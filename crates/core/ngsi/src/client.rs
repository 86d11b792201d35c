//! A blocking HTTP client bound to one broker endpoint.

use crate::error::Cause;
use bytes::Bytes;
use ngsi_api::Dialect;
use ngsi_config::Broker;
use reqwest::blocking;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_LD_JSON: &str = "application/ld+json";

const FIWARE_SERVICE: &str = "fiware-service";
const FIWARE_SERVICE_PATH: &str = "fiware-servicepath";
const NGSILD_TENANT: &str = "ngsild-tenant";
const LINK: &str = "link";
const FIWARE_TOTAL_COUNT: &str = "fiware-total-count";
const NGSILD_RESULTS_COUNT: &str = "ngsild-results-count";
const DEFAULT_SCOPE: &str = "/";

/// A broker endpoint: where it is and how to address a tenant on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: Url,
    pub tenant: Option<String>,
    pub scope: Option<String>,
    pub token: Option<String>,
    /// The JSON-LD context sent as a `Link` header to NGSI-LD brokers
    pub link: Option<String>,
}

impl Endpoint {
    pub fn new(broker: &Broker, link: Option<String>) -> Self {
        Endpoint {
            url: broker.url.clone(),
            tenant: broker.tenant.clone(),
            scope: broker.scope.clone(),
            token: broker.token.clone(),
            link,
        }
    }

    /// Two endpoints are the same when they address the same tenant and scope of the same broker
    pub fn same_as(&self, other: &Endpoint) -> bool {
        self.url == other.url && self.tenant == other.tenant && self.scope == other.scope
    }
}

pub struct BrokerClient {
    http: blocking::Client,
    endpoint: Endpoint,
}

/// A response whose body has been fully read
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl BrokerClient {
    pub fn new(http: blocking::Client, endpoint: Endpoint) -> Self {
        BrokerClient { http, endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The URL of a resource, prefixed by the API root of the dialect
    pub fn url(&self, dialect: Dialect, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.endpoint.url.clone();
        let root = match dialect {
            Dialect::V1 => "",
            Dialect::V2 => "/v2",
            Dialect::Ld => "/ngsi-ld/v1",
        };
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}{root}{path}"));
        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        url
    }

    /// The headers of a request, built from the endpoint configuration
    pub fn headers(&self, dialect: Dialect) -> Result<HeaderMap, Cause> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        match dialect {
            Dialect::V1 | Dialect::V2 => {
                if let Some(tenant) = &self.endpoint.tenant {
                    headers.insert(FIWARE_SERVICE, HeaderValue::from_str(tenant)?);
                }
                let scope = self.endpoint.scope.as_deref().unwrap_or(DEFAULT_SCOPE);
                headers.insert(FIWARE_SERVICE_PATH, HeaderValue::from_str(scope)?);
            }
            Dialect::Ld => {
                if let Some(tenant) = &self.endpoint.tenant {
                    headers.insert(NGSILD_TENANT, HeaderValue::from_str(tenant)?);
                }
                if let Some(link) = &self.endpoint.link {
                    let link = format!(
                        r#"<{link}>; rel="http://www.w3.org/ns/json-ld#context"; type="application/ld+json""#
                    );
                    headers.insert(HeaderName::from_static(LINK), HeaderValue::from_str(&link)?);
                }
            }
        }

        if let Some(token) = &self.endpoint.token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        }

        Ok(headers)
    }

    pub fn get(
        &self,
        dialect: Dialect,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response, Cause> {
        let url = self.url(dialect, path, query);
        let headers = self.headers(dialect)?;
        self.send(self.http.request(Method::GET, url).headers(headers))
    }

    pub fn post(
        &self,
        dialect: Dialect,
        path: &str,
        query: &[(&str, String)],
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Result<Response, Cause> {
        let url = self.url(dialect, path, query);
        let mut headers = self.headers(dialect)?;
        // JSON-LD payloads carry their own @context
        if content_type == APPLICATION_LD_JSON {
            headers.remove(LINK);
        }
        self.send(
            self.http
                .request(Method::POST, url)
                .headers(headers)
                .header(CONTENT_TYPE, content_type)
                .body(body),
        )
    }

    fn send(&self, request: blocking::RequestBuilder) -> Result<Response, Cause> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.http.execute(request)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?;
        debug!(%method, %url, %status, "{} bytes received", body.len());

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

impl Response {
    /// Fail with the status and body of the response if the status is not the expected one
    pub fn expect_status(self, expected: StatusCode) -> Result<Self, Cause> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(Cause::Status {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }

    /// The total number of matching entities, as reported by the broker
    pub fn results_count(&self, dialect: Dialect) -> Result<usize, Cause> {
        let header = match dialect {
            Dialect::Ld => NGSILD_RESULTS_COUNT,
            Dialect::V1 | Dialect::V2 => FIWARE_TOTAL_COUNT,
        };
        self.headers
            .get(header)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .ok_or(Cause::ResultsCount { header })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    fn client(url: &str, tenant: Option<&str>, scope: Option<&str>) -> BrokerClient {
        BrokerClient::new(
            blocking::Client::new(),
            Endpoint {
                url: url.parse().unwrap(),
                tenant: tenant.map(str::to_string),
                scope: scope.map(str::to_string),
                token: None,
                link: None,
            },
        )
    }

    #[test_case(Dialect::V2, "/entities", "http://orion:1026/v2/entities?type=Thing")]
    #[test_case(Dialect::Ld, "/entities", "http://orion:1026/ngsi-ld/v1/entities?type=Thing")]
    #[test_case(Dialect::V1, "/v1/queryContext", "http://orion:1026/v1/queryContext?type=Thing")]
    fn urls_are_prefixed_by_the_api_root(dialect: Dialect, path: &str, expected: &str) {
        let client = client("http://orion:1026", None, None);

        let url = client.url(dialect, path, &[("type", "Thing".to_string())]);

        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn broker_url_path_is_kept() {
        let client = client("http://gateway/orion/", None, None);

        let url = client.url(Dialect::V2, "/op/update", &[]);

        assert_eq!(url.as_str(), "http://gateway/orion/v2/op/update");
    }

    #[test]
    fn v2_headers_default_to_the_root_scope() {
        let client = client("http://orion:1026", Some("openiot"), None);

        let headers = client.headers(Dialect::V2).unwrap();

        assert_eq!(headers[FIWARE_SERVICE], "openiot");
        assert_eq!(headers[FIWARE_SERVICE_PATH], "/");
        assert!(headers.get(NGSILD_TENANT).is_none());
    }

    #[test]
    fn ld_headers() {
        let mut client = client("http://orion-ld:1026", Some("openiot"), Some("/ignored"));
        client.endpoint.link = Some("https://context/ctx.jsonld".into());
        client.endpoint.token = Some("abc".into());

        let headers = client.headers(Dialect::Ld).unwrap();

        assert_eq!(headers[NGSILD_TENANT], "openiot");
        assert_eq!(
            headers[LINK],
            r#"<https://context/ctx.jsonld>; rel="http://www.w3.org/ns/json-ld#context"; type="application/ld+json""#
        );
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert!(headers.get(FIWARE_SERVICE_PATH).is_none());
    }

    #[test]
    fn results_count_header_depends_on_the_dialect() {
        let mut headers = HeaderMap::new();
        headers.insert("Fiware-Total-Count", HeaderValue::from_static("150"));
        headers.insert("NGSILD-Results-Count", HeaderValue::from_static("7"));
        let response = Response {
            status: StatusCode::OK,
            headers,
            body: Bytes::new(),
        };

        assert_eq!(response.results_count(Dialect::V2).unwrap(), 150);
        assert_eq!(response.results_count(Dialect::Ld).unwrap(), 7);
    }

    #[test]
    fn missing_results_count() {
        let response = Response {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        };

        assert_matches!(
            response.results_count(Dialect::V2),
            Err(Cause::ResultsCount { header: FIWARE_TOTAL_COUNT })
        );
    }

    #[test]
    fn unexpected_status() {
        let response = Response {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{\"error\":\"Unprocessable\"}"),
        };

        let error = response.expect_status(StatusCode::NO_CONTENT).unwrap_err();

        assert_eq!(
            error.to_string(),
            "422 Unprocessable Entity {\"error\":\"Unprocessable\"}"
        );
    }
}
