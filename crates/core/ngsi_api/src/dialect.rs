use serde::Deserialize;
use serde::Serialize;

/// The API generation a broker is registered with
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
pub enum NgsiType {
    #[default]
    #[strum(serialize = "v2")]
    V2,
    #[strum(serialize = "ld")]
    Ld,
}

/// The wire format used to talk to a broker.
///
/// NGSIv2 brokers can also be driven with the legacy NGSIv1 endpoints.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, strum_macros::Display)]
pub enum Dialect {
    #[strum(serialize = "NGSIv1")]
    V1,
    #[strum(serialize = "NGSIv2")]
    V2,
    #[strum(serialize = "NGSI-LD")]
    Ld,
}

impl NgsiType {
    pub fn dialect(self, legacy_v1: bool) -> Dialect {
        match self {
            NgsiType::V2 if legacy_v1 => Dialect::V1,
            NgsiType::V2 => Dialect::V2,
            NgsiType::Ld => Dialect::Ld,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ngsi_types_are_lowercase_in_config_files() {
        #[derive(Deserialize)]
        struct Broker {
            ngsi_type: NgsiType,
        }

        let broker: Broker = serde_json::from_str(r#"{"ngsi_type": "ld"}"#).unwrap();
        assert_eq!(broker.ngsi_type, NgsiType::Ld);
        assert_eq!("v2".parse::<NgsiType>().unwrap(), NgsiType::V2);
    }

    #[test]
    fn legacy_wire_format_only_applies_to_v2() {
        assert_eq!(NgsiType::V2.dialect(true), Dialect::V1);
        assert_eq!(NgsiType::V2.dialect(false), Dialect::V2);
        assert_eq!(NgsiType::Ld.dialect(true), Dialect::Ld);
        assert_eq!(Dialect::Ld.to_string(), "NGSI-LD");
    }
}
