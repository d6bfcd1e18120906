//! Per-row batch results.
//!
//! The result endpoint answers in CSV or XML depending on how the batch was
//! created, not on what the request asked for, so the body is sniffed with
//! [`BodyFormat::detect`] before parsing.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::ops::Deref;

use salesforce_bulk_client::BodyFormat;

use crate::error::Result;

/// Outcome of one uploaded row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Record ID; empty when the row failed
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Success", deserialize_with = "lenient_bool", default)]
    pub success: bool,
    /// True when the row created a new record (insert, or upsert on a new key)
    #[serde(rename = "Created", deserialize_with = "lenient_bool", default)]
    pub created: bool,
    /// Error text; empty on success
    #[serde(rename = "Error", default)]
    pub error: String,
}

impl BatchResult {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let text = String::deserialize(deserializer)?;
    Ok(text.trim().eq_ignore_ascii_case("true"))
}

/// Results of one batch, in the order the server returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResultCollection {
    pub job_id: String,
    pub batch_id: String,
    results: Vec<BatchResult>,
}

impl BatchResultCollection {
    pub fn new(
        job_id: impl Into<String>,
        batch_id: impl Into<String>,
        results: Vec<BatchResult>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            batch_id: batch_id.into(),
            results,
        }
    }

    /// Parse a result body, detecting CSV or XML from its content.
    pub fn parse(job_id: &str, batch_id: &str, body: &str) -> Result<Self> {
        let results = match BodyFormat::detect(body) {
            BodyFormat::Xml => parse_xml_results(body)?,
            BodyFormat::Csv => parse_csv(body)?,
        };
        Ok(Self::new(job_id, batch_id, results))
    }

    /// Rows that reported an error.
    pub fn failures(&self) -> impl Iterator<Item = &BatchResult> {
        self.results.iter().filter(|r| r.has_error() || !r.success)
    }

    pub fn into_vec(self) -> Vec<BatchResult> {
        self.results
    }
}

impl Deref for BatchResultCollection {
    type Target = [BatchResult];

    fn deref(&self) -> &Self::Target {
        &self.results
    }
}

impl IntoIterator for BatchResultCollection {
    type Item = BatchResult;
    type IntoIter = std::vec::IntoIter<BatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResultCollection {
    type Item = &'a BatchResult;
    type IntoIter = std::slice::Iter<'a, BatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Deserialize CSV rows with a header line.
pub(crate) fn parse_csv<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let body = body.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct XmlResults {
    #[serde(default)]
    result: Vec<XmlResult>,
}

#[derive(Debug, Deserialize)]
struct XmlResult {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    created: bool,
    #[serde(default)]
    errors: Vec<XmlResultError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XmlResultError {
    #[serde(default)]
    status_code: String,
    #[serde(default)]
    message: String,
}

impl From<XmlResult> for BatchResult {
    fn from(result: XmlResult) -> Self {
        let error = result
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.status_code, e.message))
            .collect::<Vec<_>>()
            .join("; ");

        BatchResult {
            id: result.id.unwrap_or_default(),
            success: result.success,
            created: result.created,
            error,
        }
    }
}

fn parse_xml_results(body: &str) -> Result<Vec<BatchResult>> {
    let results: XmlResults = salesforce_bulk_client::xml::from_str(body)?;
    Ok(results.result.into_iter().map(Into::into).collect())
}

/// Body of a query batch's `result` endpoint: the ids of its result sets.
#[derive(Debug, Deserialize)]
struct QueryResultList {
    #[serde(default)]
    result: Vec<String>,
}

pub(crate) fn parse_query_result_ids(body: &str) -> Result<Vec<String>> {
    let list: QueryResultList = salesforce_bulk_client::xml::from_str(body)?;
    Ok(list
        .result
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_csv_results() {
        let body = "\"Id\",\"Success\",\"Created\",\"Error\"\n\
                    \"a00E0000000l0MZIAY\",\"true\",\"false\",\"\"\n\
                    \"\",\"false\",\"false\",\"REQUIRED_FIELD_MISSING:Required fields are missing: [Name]:Name --\"\n";

        let results = BatchResultCollection::parse("750E00000004NRa", "751E00000004ZmK", body).unwrap();

        assert_eq!(results.job_id, "750E00000004NRa");
        assert_eq!(results.batch_id, "751E00000004ZmK");
        assert_eq!(results.len(), 2);

        let first = &results[0];
        assert_eq!(first.id, "a00E0000000l0MZIAY");
        assert!(first.success);
        assert!(!first.created);
        assert!(!first.has_error());
        assert_eq!(first.error, "");

        let second = &results[1];
        assert!(!second.success);
        assert!(second.has_error());
        assert!(second.error.starts_with("REQUIRED_FIELD_MISSING"));
        assert_eq!(results.failures().count(), 1);
    }

    #[test]
    fn test_parse_xml_results() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<results xmlns="http://www.force.com/2009/06/asyncapi/dataload">
 <result>
  <id>001D000000ISUr3IAH</id>
  <success>true</success>
  <created>true</created>
 </result>
 <result>
  <errors>
   <fields>Name</fields>
   <message>Required fields are missing: [Name]</message>
   <statusCode>REQUIRED_FIELD_MISSING</statusCode>
  </errors>
  <errors>
   <message>Bad value</message>
   <statusCode>INVALID_FIELD</statusCode>
  </errors>
  <success>false</success>
  <created>false</created>
 </result>
</results>"#;

        let results = BatchResultCollection::parse("750x", "751x", body).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].id, "001D000000ISUr3IAH");
        assert!(results[0].success && results[0].created);
        assert!(!results[0].has_error());

        assert_eq!(results[1].id, "");
        assert!(!results[1].success);
        assert_eq!(
            results[1].error,
            "REQUIRED_FIELD_MISSING: Required fields are missing: [Name]; INVALID_FIELD: Bad value"
        );
    }

    #[test]
    fn test_empty_bodies() {
        assert!(BatchResultCollection::parse("j", "b", "").unwrap().is_empty());
        assert!(BatchResultCollection::parse("j", "b", "\"Id\",\"Success\",\"Created\",\"Error\"\n")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_xml_error() {
        let err = BatchResultCollection::parse("j", "b", "<results><result>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Xml(_)));
    }

    #[test]
    fn test_collection_iteration_keeps_order() {
        let results = BatchResultCollection::new(
            "j",
            "b",
            vec![
                BatchResult { id: "1".into(), success: true, ..Default::default() },
                BatchResult { id: "2".into(), success: true, ..Default::default() },
            ],
        );

        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(results.first().map(|r| r.id.as_str()), Some("1"));

        let owned: Vec<BatchResult> = results.into_iter().collect();
        assert_eq!(owned.len(), 2);
    }

    #[test]
    fn test_parse_query_result_ids() {
        let body = r#"<result-list xmlns="http://www.force.com/2009/06/asyncapi/dataload"><result>752x00000004CJE</result><result>752x00000004CJF</result></result-list>"#;
        assert_eq!(
            parse_query_result_ids(body).unwrap(),
            vec!["752x00000004CJE", "752x00000004CJF"]
        );
    }
}
