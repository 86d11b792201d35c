//! NGSI-LD identifiers.
//!
//! NGSI-LD requires entity ids and relationship targets to be URIs.
//! NGSIv2 ids that are not already URIs are wrapped as `urn:ngsi-ld:<Type>:<id>`.

use once_cell::sync::Lazy;
use regex::Regex;

const URN_PREFIX: &str = "urn:ngsi-ld:";
const RELATIONSHIP_PREFIX: &str = "ref";
const URI_SCHEMES: [&str; 3] = ["urn", "http", "https"];

static LEADING_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:[^:/?#]+)").unwrap());

/// The leading token of an identifier, i.e. everything up to the first `:`, `/`, `?` or `#`
fn leading_token(id: &str) -> &str {
    LEADING_TOKEN.find(id).map_or("", |token| token.as_str())
}

/// True if the identifier starts with one of the schemes NGSI-LD accepts as is
pub fn is_uri(id: &str) -> bool {
    URI_SCHEMES.contains(&leading_token(id))
}

/// Build `urn:ngsi-ld:<type>:<id>`, leaving out the `<type>:` segment
/// when the leading token of the id (everything up to the first `:`, `/`, `?` or `#`)
/// is the type itself, compared case-insensitively.
///
/// So `Thing:001` gives `urn:ngsi-ld:Thing:001`, and an id equal to the type gives `urn:ngsi-ld:Thing`.
pub fn ngsild_uri(entity_type: &str, id: &str) -> String {
    if leading_token(id).eq_ignore_ascii_case(entity_type) {
        format!("{URN_PREFIX}{id}")
    } else {
        format!("{URN_PREFIX}{entity_type}:{id}")
    }
}

/// The NGSI-LD id of an NGSIv2 entity
pub fn ld_id(id: &str, entity_type: &str) -> String {
    if is_uri(id) {
        id.to_string()
    } else {
        ngsild_uri(entity_type, id)
    }
}

/// The NGSI-LD object of an NGSIv2 relationship attribute.
///
/// The type of the target entity is derived from the attribute name,
/// stripping the conventional `ref` prefix: `refDevice` points to a `Device`.
pub fn ld_relationship(attr_name: &str, id: &str) -> String {
    if is_uri(id) {
        return id.to_string();
    }
    let entity_type = attr_name
        .strip_prefix(RELATIONSHIP_PREFIX)
        .unwrap_or(attr_name);
    ngsild_uri(entity_type, id)
}
