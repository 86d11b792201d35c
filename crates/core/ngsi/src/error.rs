use ngsi_api::at_context::AtContextError;
use ngsi_api::json_ld::TranscodeError;
use ngsi_api::json_v1::V1Error;
use reqwest::StatusCode;

/// Errors detected while building a command, before any request is sent
#[derive(thiserror::Error, Debug)]
pub enum NgsiError {
    #[error(transparent)]
    FromConfig(#[from] ngsi_config::ConfigError),

    #[error("source and destination are same")]
    SameEndpoints,

    #[error("cannot copy entities from NGSI-LD to NGSI v2")]
    LdToV2,

    #[error("can't specify --link option on NGSIv2")]
    LinkOnV2,

    #[error("--link {name:?} is not the URL of a JSON-LD context")]
    LinkNotUrl { name: String },

    #[error("can't specify --ngsi-v1 option on NGSI-LD")]
    V1OnLd,

    #[error("missing entity type")]
    MissingEntityType,

    #[error("failed to build the HTTP client")]
    FromHttpClient(#[from] reqwest::Error),
}

/// The replication strategies, one per pair of wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Strategy {
    #[strum(serialize = "copy NGSIv2 entities to NGSIv2")]
    CopyV2,
    #[strum(serialize = "copy NGSIv2 entities to NGSI-LD")]
    CopyV2ToLd,
    #[strum(serialize = "copy NGSI-LD entities to NGSI-LD")]
    CopyLd,
    #[strum(serialize = "copy entities with NGSIv1")]
    CopyV1,
    #[strum(serialize = "remove NGSIv2 entities")]
    RemoveV2,
    #[strum(serialize = "remove NGSI-LD entities")]
    RemoveLd,
    #[strum(serialize = "remove entities with NGSIv1")]
    RemoveV1,
}

/// The step of a page transfer that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Step {
    #[strum(serialize = "fetch entities")]
    Fetch,
    #[strum(serialize = "read the results count")]
    Count,
    #[strum(serialize = "decode entities")]
    Decode,
    #[strum(serialize = "convert entities")]
    Transcode,
    #[strum(serialize = "set @context")]
    AtContext,
    #[strum(serialize = "encode entities")]
    Encode,
    #[strum(serialize = "write entities")]
    Write,
}

/// A page transfer failure.
///
/// Pages written before the failure are not rolled back.
#[derive(thiserror::Error, Debug)]
#[error("{strategy}: failed to {step}")]
pub struct ReplicationError {
    pub strategy: Strategy,
    pub step: Step,
    #[source]
    pub cause: Cause,
}

#[derive(thiserror::Error, Debug)]
pub enum Cause {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("{status} {body}")]
    Status { status: StatusCode, body: String },

    #[error("missing or invalid {header} header")]
    ResultsCount { header: &'static str },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    V1(#[from] V1Error),

    #[error(transparent)]
    AtContext(#[from] AtContextError),

    #[error("entity without a string id")]
    MissingId,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Attach the strategy and the step to a failure
pub trait ResultExt<T> {
    fn at(self, strategy: Strategy, step: Step) -> Result<T, ReplicationError>;
}

impl<T, E: Into<Cause>> ResultExt<T> for Result<T, E> {
    fn at(self, strategy: Strategy, step: Step) -> Result<T, ReplicationError> {
        self.map_err(|err| ReplicationError {
            strategy,
            step,
            cause: err.into(),
        })
    }
}
