//! XML helpers for Bulk API payloads.
//!
//! Bulk API documents live in a single default namespace and carry no
//! prefixes, so they map directly onto serde structs through `quick-xml`.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Namespace of every Bulk API (async) document.
pub const BULK_NAMESPACE: &str = "http://www.force.com/2009/06/asyncapi/dataload";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Deserialize a Bulk API XML document.
pub fn from_str<T: DeserializeOwned>(xml: &str) -> Result<T> {
    let xml = xml.trim_start_matches('\u{feff}');
    quick_xml::de::from_str(xml).map_err(Into::into)
}

/// Serialize a value as a Bulk API XML document, including the declaration.
///
/// The root element name comes from the type's serde name; namespace
/// attributes are the caller's concern (an `@xmlns` field).
pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    let body = quick_xml::se::to_string(value)
        .map_err(|e| Error::with_source(ErrorKind::Xml(e.to_string()), e))?;
    Ok(format!("{}{}", XML_DECLARATION, body))
}

/// Escape text for inclusion in hand-built XML.
pub fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(rename = "jobInfo", rename_all = "camelCase")]
    struct Sample {
        #[serde(rename = "@xmlns")]
        xmlns: String,
        state: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        external_id_field_name: Option<String>,
    }

    #[test]
    fn test_to_string_has_declaration_and_namespace() {
        let sample = Sample {
            xmlns: BULK_NAMESPACE.to_string(),
            state: "Closed".to_string(),
            external_id_field_name: None,
        };
        let xml = to_string(&sample).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><jobInfo"#));
        assert!(xml.contains(r#"xmlns="http://www.force.com/2009/06/asyncapi/dataload""#));
        assert!(xml.contains("<state>Closed</state>"));
        assert!(!xml.contains("externalIdFieldName"));
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Info {
        id: String,
        #[serde(default)]
        state_message: Option<String>,
    }

    #[test]
    fn test_from_str_ignores_namespace_and_bom() {
        let xml = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
            <batchInfo xmlns=\"http://www.force.com/2009/06/asyncapi/dataload\">\
            <id>751x</id></batchInfo>";
        let info: Info = from_str(xml).unwrap();
        assert_eq!(info.id, "751x");
        assert!(info.state_message.is_none());
    }

    #[test]
    fn test_from_str_reports_malformed_documents() {
        let err = from_str::<Info>("<batchInfo><state>Queued</state></batchInfo>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Xml(_)));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a&b<c>'\""), "a&amp;b&lt;c&gt;&apos;&quot;");
    }
}
