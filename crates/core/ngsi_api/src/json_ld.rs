//! Translation of NGSIv2 normalized entities into NGSI-LD entities.
//!
//! Every NGSIv2 attribute `{type, value, metadata}` is turned into an NGSI-LD
//! Property, Relationship or GeoProperty depending on its `type`:
//!
//! ```
//! use ngsi_api::json_ld::transcode;
//! use serde_json::json;
//!
//! let v2 = json!({
//!     "id": "device001",
//!     "type": "Device",
//!     "temperature": {"type": "Number", "value": 21.5, "metadata": {}},
//!     "refRoom": {"type": "Relationship", "value": "room1", "metadata": {}}
//! });
//! let ld = transcode(v2.as_object().unwrap()).unwrap();
//!
//! assert_eq!(serde_json::Value::Object(ld), json!({
//!     "id": "urn:ngsi-ld:Device:device001",
//!     "type": "Device",
//!     "temperature": {"type": "Property", "value": 21.5},
//!     "refRoom": {"type": "Relationship", "object": "urn:ngsi-ld:Room:room1"}
//! }));
//! ```

use crate::geojson::to_geojson;
use crate::geojson::GeoJsonError;
use crate::geojson::GeoKind;
use crate::urn::ld_id;
use crate::urn::ld_relationship;
use crate::Entity;
use serde::Deserialize;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;

const ID: &str = "id";
const TYPE: &str = "type";
const VALUE: &str = "value";
const METADATA: &str = "metadata";
const TIMESTAMP_METADATA: &str = "timestamp";
const UNIT_CODE_METADATA: &str = "unitCode";

#[derive(thiserror::Error, Debug)]
pub enum TranscodeError {
    #[error("id missing")]
    MissingId,

    #[error("id not string")]
    IdNotString,

    #[error("type missing")]
    MissingType,

    #[error("type not string")]
    TypeNotString,

    #[error("{key}: attribute error")]
    AttributeNotObject { key: String },

    #[error("{key}: type not string")]
    AttributeTypeNotString { key: String },

    #[error("{key}: {kind}: value not string")]
    ValueNotString { key: String, kind: AttrKind },

    #[error("{key}: {kind}: value not an array of strings")]
    ValueNotStringArray { key: String, kind: AttrKind },

    #[error("{key}: {source}")]
    Geometry { key: String, source: GeoJsonError },

    #[error("{key}: metadata not an object")]
    MetadataNotObject { key: String },

    #[error("{key}: metadata error: {source}")]
    Metadata {
        key: String,
        source: serde_json::Error,
    },

    #[error("failed to decode NGSIv2 entities: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode NGSI-LD entities: {0}")]
    Encode(#[source] serde_json::Error),
}

/// NGSIv2 attribute types that drive the translation.
///
/// Any type not listed here is translated as a plain [AttrKind::Property].
#[derive(Debug, Clone, Copy, Eq, PartialEq, strum_macros::Display, strum_macros::EnumString)]
pub enum AttrKind {
    Relationship,
    DateTime,
    #[strum(serialize = "geo:point")]
    GeoPoint,
    #[strum(serialize = "geo:line")]
    GeoLine,
    #[strum(serialize = "geo:box")]
    GeoBox,
    #[strum(serialize = "geo:polygon")]
    GeoPolygon,
    #[strum(serialize = "geo:json")]
    GeoJson,
    Property,
}

type Transcoder = fn(&str, AttrKind, Value) -> Result<LdValue, TranscodeError>;

impl AttrKind {
    pub fn from_type_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(AttrKind::Property)
    }

    fn transcoder(self) -> Transcoder {
        match self {
            AttrKind::Relationship => relationship,
            AttrKind::DateTime => date_time,
            AttrKind::GeoPoint => geo_point,
            AttrKind::GeoLine => |key, kind, value| geo_shape(key, kind, GeoKind::Line, value),
            AttrKind::GeoBox => |key, kind, value| geo_shape(key, kind, GeoKind::Box, value),
            AttrKind::GeoPolygon => {
                |key, kind, value| geo_shape(key, kind, GeoKind::Polygon, value)
            }
            AttrKind::GeoJson => geo_json,
            AttrKind::Property => property,
        }
    }
}

/// The core of an NGSI-LD attribute
#[derive(Debug, Clone, PartialEq)]
pub enum LdValue {
    Property { value: Value },
    Relationship { object: String },
    GeoProperty { value: Value },
}

/// An NGSI-LD attribute, with the NGSIv2 metadata re-emitted as NGSI-LD members
#[derive(Debug, Clone, PartialEq)]
pub struct LdAttribute {
    pub value: LdValue,
    pub observed_at: Option<Value>,
    pub unit_code: Option<Value>,
    /// Other metadata, each one becoming a nested Property
    pub properties: Vec<(String, Value)>,
}

impl From<LdAttribute> for Value {
    fn from(attr: LdAttribute) -> Self {
        let mut json = Map::new();
        match attr.value {
            LdValue::Property { value } => {
                json.insert(TYPE.into(), "Property".into());
                json.insert(VALUE.into(), value);
            }
            LdValue::Relationship { object } => {
                json.insert(TYPE.into(), "Relationship".into());
                json.insert("object".into(), object.into());
            }
            LdValue::GeoProperty { value } => {
                json.insert(TYPE.into(), "GeoProperty".into());
                json.insert(VALUE.into(), value);
            }
        }
        if let Some(observed_at) = attr.observed_at {
            json.insert("observedAt".into(), observed_at);
        }
        if let Some(unit_code) = attr.unit_code {
            json.insert(UNIT_CODE_METADATA.into(), unit_code);
        }
        for (name, value) in attr.properties {
            json.insert(name, json!({ "type": "Property", "value": value }));
        }
        Value::Object(json)
    }
}

#[derive(Deserialize)]
struct Metadatum {
    #[serde(default)]
    value: Value,
}

/// Translate a JSON array of NGSIv2 entities into a JSON array of NGSI-LD entities,
/// returned along with the number of entities
pub fn normalized_to_ld(body: &[u8]) -> Result<(Vec<u8>, usize), TranscodeError> {
    let entities: Vec<Entity> = serde_json::from_slice(body).map_err(TranscodeError::Decode)?;
    let entities = entities
        .iter()
        .map(transcode)
        .collect::<Result<Vec<_>, _>>()?;
    let payload = serde_json::to_vec(&entities).map_err(TranscodeError::Encode)?;
    Ok((payload, entities.len()))
}

/// Translate one NGSIv2 entity into an NGSI-LD entity
pub fn transcode(v2: &Entity) -> Result<Entity, TranscodeError> {
    let id = match v2.get(ID) {
        Some(Value::String(id)) => id,
        Some(_) => return Err(TranscodeError::IdNotString),
        None => return Err(TranscodeError::MissingId),
    };
    let entity_type = match v2.get(TYPE) {
        Some(Value::String(entity_type)) => entity_type,
        Some(_) => return Err(TranscodeError::TypeNotString),
        None => return Err(TranscodeError::MissingType),
    };

    let mut ld = Entity::new();
    ld.insert(ID.into(), ld_id(id, entity_type).into());
    ld.insert(TYPE.into(), entity_type.clone().into());

    for (key, value) in v2 {
        if key == ID || key == TYPE {
            continue;
        }
        let Value::Object(attr) = value else {
            return Err(TranscodeError::AttributeNotObject { key: key.clone() });
        };
        ld.insert(key.clone(), ld_attribute(key, attr)?.into());
    }

    Ok(ld)
}

/// Translate one NGSIv2 attribute named `key`
pub fn ld_attribute(key: &str, attr: &Map<String, Value>) -> Result<LdAttribute, TranscodeError> {
    let kind = match attr.get(TYPE) {
        Some(Value::String(tag)) => AttrKind::from_type_tag(tag),
        Some(_) => {
            return Err(TranscodeError::AttributeTypeNotString {
                key: key.to_string(),
            })
        }
        None => AttrKind::Property,
    };
    let value = attr.get(VALUE).cloned().unwrap_or(Value::Null);

    let mut ld_attr = LdAttribute {
        value: kind.transcoder()(key, kind, value)?,
        observed_at: None,
        unit_code: None,
        properties: vec![],
    };

    if let Some(metadata) = attr.get(METADATA) {
        let Value::Object(metadata) = metadata else {
            return Err(TranscodeError::MetadataNotObject {
                key: key.to_string(),
            });
        };
        for (name, metadatum) in metadata {
            let Metadatum { value } =
                Metadatum::deserialize(metadatum).map_err(|source| TranscodeError::Metadata {
                    key: key.to_string(),
                    source,
                })?;
            match name.as_str() {
                TIMESTAMP_METADATA => ld_attr.observed_at = Some(value),
                UNIT_CODE_METADATA => ld_attr.unit_code = Some(value),
                _ => ld_attr.properties.push((name.clone(), value)),
            }
        }
    }

    Ok(ld_attr)
}

fn relationship(key: &str, kind: AttrKind, value: Value) -> Result<LdValue, TranscodeError> {
    let Value::String(entity_id) = value else {
        return Err(TranscodeError::ValueNotString {
            key: key.to_string(),
            kind,
        });
    };
    Ok(LdValue::Relationship {
        object: ld_relationship(key, &entity_id),
    })
}

fn date_time(key: &str, kind: AttrKind, value: Value) -> Result<LdValue, TranscodeError> {
    let Value::String(mut date) = value else {
        return Err(TranscodeError::ValueNotString {
            key: key.to_string(),
            kind,
        });
    };
    if !date.ends_with('Z') {
        date.push('Z');
    }
    Ok(LdValue::Property {
        value: json!({ "@type": "DateTime", "@value": date }),
    })
}

fn geo_point(key: &str, kind: AttrKind, value: Value) -> Result<LdValue, TranscodeError> {
    let Value::String(point) = value else {
        return Err(TranscodeError::ValueNotString {
            key: key.to_string(),
            kind,
        });
    };
    geometry(key, GeoKind::Point, &[point])
}

fn geo_shape(
    key: &str,
    kind: AttrKind,
    geo_kind: GeoKind,
    value: Value,
) -> Result<LdValue, TranscodeError> {
    let points: Vec<String> =
        serde_json::from_value(value).map_err(|_| TranscodeError::ValueNotStringArray {
            key: key.to_string(),
            kind,
        })?;
    geometry(key, geo_kind, &points)
}

fn geometry(key: &str, geo_kind: GeoKind, points: &[String]) -> Result<LdValue, TranscodeError> {
    let geometry = to_geojson(geo_kind, points).map_err(|source| TranscodeError::Geometry {
        key: key.to_string(),
        source,
    })?;
    let value = serde_json::to_value(geometry).map_err(TranscodeError::Encode)?;
    Ok(LdValue::GeoProperty { value })
}

fn geo_json(_key: &str, _kind: AttrKind, value: Value) -> Result<LdValue, TranscodeError> {
    Ok(LdValue::GeoProperty { value })
}

fn property(_key: &str, _kind: AttrKind, value: Value) -> Result<LdValue, TranscodeError> {
    Ok(LdValue::Property { value })
}
