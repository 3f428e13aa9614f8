//! Report data model for SiteCheck scan results.
//!
//! The scanner API answers with a single JSON object whose top-level keys are
//! upper-case section names (`SCAN`, `WEBAPP`, `BLACKLIST`, ...). Every section
//! is optional: an absent key or an explicit `null` decodes to an empty
//! collection, so the renderer never sees a missing value.
//!
//! Tuple-like entries (`[["title", "detail", "extra"], ...]`) decode into
//! named structs. Fields are positional and index 0 is always the label.
//! An entry shorter than its arity is a shape error.

use crate::error::{Result, SiteCheckError};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// Named groups of strings, such as system notes or link categories.
///
/// Categories iterate in lexicographic order.
pub type Groups = BTreeMap<String, Vec<String>>;

/// The decoded scan report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Report {
    /// Details about the scan target
    #[serde(rename = "SCAN", deserialize_with = "nullable")]
    pub target: ScanTarget,

    /// Scanner engine version information
    #[serde(rename = "VERSION", deserialize_with = "nullable")]
    pub engine: EngineVersion,

    /// Free-text notes grouped by category
    #[serde(rename = "SYSTEM", deserialize_with = "nullable_groups")]
    pub system_notes: Groups,

    /// Application-level findings
    #[serde(rename = "WEBAPP", deserialize_with = "nullable")]
    pub application: ApplicationDetails,

    /// Security hardening recommendations
    #[serde(rename = "RECOMMENDATIONS", deserialize_with = "nullable")]
    pub recommendations: Vec<Advisory>,

    /// Out-of-date software detected on the target
    #[serde(rename = "OUTDATEDSCAN", deserialize_with = "nullable")]
    pub outdated: Vec<Advisory>,

    /// Links found on the scanned pages, grouped by category
    #[serde(rename = "LINKS", deserialize_with = "nullable_groups")]
    pub links: Groups,

    /// Blacklist lookups
    #[serde(rename = "BLACKLIST", deserialize_with = "nullable")]
    pub blacklist: BlacklistStatus,

    /// Malware detections
    #[serde(rename = "MALWARE", deserialize_with = "nullable")]
    pub malware: MalwareStatus,
}

impl Report {
    /// Decode a report from the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::MalformedResponse`] if the body is not a JSON
    /// object with the expected shape. The error keeps the raw payload.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let first = raw.iter().find(|b| !b.is_ascii_whitespace());
        if first.is_some_and(|b| *b != b'{') {
            return Err(crate::err!(MalformedResponse {
                message: "expected a JSON object at the top level".to_string(),
                line: 1,
                column: 1,
                payload: String::from_utf8_lossy(raw).into_owned(),
            }));
        }

        serde_json::from_slice(raw)
            .map_err(|e| SiteCheckError::malformed(&e, raw, file!(), line!()))
    }

    /// Firewall status derived from the `WAF` flags.
    #[must_use]
    pub const fn firewall_status(&self) -> FirewallStatus {
        self.target.firewall.status()
    }
}

/// Details about the scanned target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanTarget {
    /// Site URLs that were scanned
    #[serde(rename = "SITE", deserialize_with = "nullable")]
    pub site: Vec<String>,

    /// Target domain names
    #[serde(rename = "DOMAIN", deserialize_with = "nullable")]
    pub domains: Vec<String>,

    /// Resolved IP addresses
    #[serde(rename = "IP", deserialize_with = "nullable")]
    pub ips: Vec<String>,

    /// Detected content management systems
    #[serde(rename = "CMS", deserialize_with = "nullable")]
    pub cms: Vec<String>,

    /// Raw firewall detection flags
    #[serde(rename = "WAF", deserialize_with = "nullable")]
    pub firewall: FirewallFlags,
}

/// Firewall detection flags as reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FirewallFlags {
    /// A generic web application firewall was detected
    #[serde(rename = "HASWAF", deserialize_with = "flag")]
    pub has_waf: bool,

    /// The vendor's own firewall was detected
    #[serde(rename = "HASSUCURIWAF", deserialize_with = "flag")]
    pub has_vendor_waf: bool,
}

impl FirewallFlags {
    /// Collapse the two flags into one status. The vendor flag wins.
    #[must_use]
    pub const fn status(self) -> FirewallStatus {
        if self.has_vendor_waf {
            FirewallStatus::VendorSpecific
        } else if self.has_waf {
            FirewallStatus::Generic
        } else {
            FirewallStatus::None
        }
    }
}

/// Firewall protection in front of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirewallStatus {
    /// No firewall detected
    None,
    /// Some web application firewall was detected
    Generic,
    /// The scanner vendor's firewall was detected
    VendorSpecific,
}

impl FirewallStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "No firewall detected",
            Self::Generic => "Generic Firewall",
            Self::VendorSpecific => "Vendor Firewall",
        }
    }

    /// Whether this status should be highlighted as a problem.
    #[must_use]
    pub const fn is_alert(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for FirewallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scanner engine version information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineVersion {
    #[serde(rename = "VERSION", deserialize_with = "nullable")]
    pub version: Vec<String>,

    #[serde(rename = "BUILDDATE", deserialize_with = "nullable")]
    pub build_date: Vec<String>,

    #[serde(rename = "DBDATE", deserialize_with = "nullable")]
    pub database_date: Vec<String>,

    #[serde(rename = "COMPILEDDATE", deserialize_with = "nullable")]
    pub compiled_date: Vec<String>,
}

/// Application-level findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplicationDetails {
    /// Plain warnings
    #[serde(rename = "WARN", deserialize_with = "nullable")]
    pub warnings: Vec<String>,

    /// Informational label/detail pairs
    #[serde(rename = "INFO", deserialize_with = "nullable")]
    pub info: Vec<LabeledDetail>,

    /// Detected software versions
    #[serde(rename = "VERSION", deserialize_with = "nullable")]
    pub versions: Vec<String>,

    /// Notices
    #[serde(rename = "NOTICE", deserialize_with = "nullable")]
    pub notices: Vec<String>,
}

impl ApplicationDetails {
    /// True when none of the four lists has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
            && self.info.is_empty()
            && self.versions.is_empty()
            && self.notices.is_empty()
    }
}

/// Blacklist lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlacklistStatus {
    /// Blacklists that flagged the target
    #[serde(rename = "WARN", deserialize_with = "nullable")]
    pub warnings: Vec<LabeledDetail>,

    /// Blacklists that were checked and found the target clean
    #[serde(rename = "INFO", deserialize_with = "nullable")]
    pub clean: Vec<LabeledDetail>,
}

impl BlacklistStatus {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.clean.is_empty()
    }

    /// True when at least one blacklist flagged the target.
    #[must_use]
    pub fn is_blacklisted(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Malware detections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MalwareStatus {
    /// Detected payloads
    #[serde(rename = "WARN", deserialize_with = "nullable")]
    pub payloads: Vec<MalwarePayload>,

    /// Informational notes from the malware engine
    #[serde(rename = "INFO", deserialize_with = "nullable")]
    pub notes: Vec<LabeledDetail>,
}

/// A `[label, detail]` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct LabeledDetail {
    pub label: String,
    pub detail: String,
}

impl TryFrom<Vec<String>> for LabeledDetail {
    type Error = String;

    fn try_from(fields: Vec<String>) -> std::result::Result<Self, Self::Error> {
        let [label, detail] = take_fields(fields, "label/detail pair")?;
        Ok(Self { label, detail })
    }
}

/// A `[title, detail, extra]` advisory, used for recommendations and
/// outdated software alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Advisory {
    pub title: String,
    pub detail: String,
    pub extra: String,
}

impl TryFrom<Vec<String>> for Advisory {
    type Error = String;

    fn try_from(fields: Vec<String>) -> std::result::Result<Self, Self::Error> {
        let [title, detail, extra] = take_fields(fields, "advisory")?;
        Ok(Self { title, detail, extra })
    }
}

/// A `[label, payload]` malware detection. The payload is raw page content
/// and may be very long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct MalwarePayload {
    pub label: String,
    pub payload: String,
}

impl TryFrom<Vec<String>> for MalwarePayload {
    type Error = String;

    fn try_from(fields: Vec<String>) -> std::result::Result<Self, Self::Error> {
        let [label, payload] = take_fields(fields, "malware entry")?;
        Ok(Self { label, payload })
    }
}

/// Take the first `N` positional fields, ignoring any extras.
fn take_fields<const N: usize>(
    fields: Vec<String>,
    what: &str,
) -> std::result::Result<[String; N], String> {
    let found = fields.len();
    fields
        .into_iter()
        .take(N)
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| format!("expected at least {N} elements for {what}, found {found}"))
}

/// Decode `null` as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decode a category map where both the map and its lists may be `null`.
fn nullable_groups<'de, D>(deserializer: D) -> std::result::Result<Groups, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<Vec<String>>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(category, items)| (category, items.unwrap_or_default()))
        .collect())
}

/// Decode a boolean-like flag sent as a number, boolean, or string.
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlagValue {
        Bool(bool),
        Integer(i64),
        Float(f64),
        String(String),
    }

    Ok(match Option::<FlagValue>::deserialize(deserializer)? {
        None => false,
        Some(FlagValue::Bool(b)) => b,
        Some(FlagValue::Integer(i)) => i != 0,
        Some(FlagValue::Float(f)) => f != 0.0,
        Some(FlagValue::String(s)) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(n) => n != 0,
                Err(_) => s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_decode_full_report() {
        let raw = br#"{
            "SCAN": {
                "SITE": ["http://example.com"],
                "DOMAIN": ["example.com"],
                "IP": ["93.184.216.34"],
                "CMS": ["WordPress"],
                "WAF": {"HASWAF": 1, "HASSUCURIWAF": 0}
            },
            "VERSION": {"VERSION": ["2.4"], "DBDATE": ["2024-01-01"]},
            "SYSTEM": {"notice": ["Running on nginx"]},
            "WEBAPP": {
                "WARN": ["Directory listing enabled"],
                "INFO": [["Server", "nginx"]],
                "VERSION": ["WordPress 6.4"],
                "NOTICE": ["Some notice"]
            },
            "RECOMMENDATIONS": [["Harden headers", "Add CSP", "https://example.com/csp"]],
            "OUTDATEDSCAN": [["WordPress outdated", "Installed 5.0", "Latest 6.4"]],
            "LINKS": {"internal": ["http://example.com/a"]},
            "BLACKLIST": {"INFO": [["Google", "https://safebrowsing.google.com"]]},
            "MALWARE": {"WARN": [["Injected script", "<script>evil()</script>"]]}
        }"#;

        let report = Report::from_slice(raw).unwrap();
        assert_eq!(report.target.site, vec!["http://example.com"]);
        assert_eq!(report.target.cms, vec!["WordPress"]);
        assert_eq!(report.firewall_status(), FirewallStatus::Generic);
        assert_eq!(report.engine.version, vec!["2.4"]);
        assert_eq!(report.system_notes["notice"], vec!["Running on nginx"]);
        assert_eq!(report.application.info[0].label, "Server");
        assert_eq!(report.application.info[0].detail, "nginx");
        assert_eq!(report.recommendations[0].extra, "https://example.com/csp");
        assert_eq!(report.outdated[0].title, "WordPress outdated");
        assert_eq!(report.links["internal"], vec!["http://example.com/a"]);
        assert!(!report.blacklist.is_blacklisted());
        assert_eq!(report.blacklist.clean.len(), 1);
        assert_eq!(report.malware.payloads[0].payload, "<script>evil()</script>");
    }

    #[test]
    fn test_empty_object_defaults_everything() {
        let report = Report::from_slice(b"{}").unwrap();
        assert_eq!(report, Report::default());
        assert!(report.application.is_empty());
        assert!(report.blacklist.is_empty());
        assert_eq!(report.firewall_status(), FirewallStatus::None);
    }

    #[test]
    fn test_nulls_decode_as_empty() {
        let raw = br#"{
            "SCAN": {"SITE": null, "WAF": null},
            "WEBAPP": null,
            "LINKS": {"iframes": null},
            "SYSTEM": null,
            "RECOMMENDATIONS": null
        }"#;

        let report = Report::from_slice(raw).unwrap();
        assert!(report.target.site.is_empty());
        assert!(report.application.is_empty());
        assert_eq!(report.links["iframes"], Vec::<String>::new());
        assert!(report.system_notes.is_empty());
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let report = Report::from_slice(br#"{"RATING": {"TOTAL": "A"}}"#).unwrap();
        assert_eq!(report, Report::default());
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let raw = br#"{"SCAN": {"SITE": ["http://exa"#;
        let err = Report::from_slice(raw).unwrap_err();
        assert!(err.is_malformed_response());
        assert_eq!(err.raw_payload(), Some(r#"{"SCAN": {"SITE": ["http://exa"#));
    }

    #[test]
    fn test_string_where_array_expected_is_malformed() {
        let err = Report::from_slice(br#"{"SCAN": {"SITE": "http://example.com"}}"#).unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn test_object_where_array_expected_is_malformed() {
        let err = Report::from_slice(br#"{"RECOMMENDATIONS": {"a": "b"}}"#).unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn test_non_object_top_level_is_malformed() {
        for raw in [&b"[]"[..], &b"null"[..], &b"42"[..], &b"\"report\""[..]] {
            let err = Report::from_slice(raw).unwrap_err();
            assert!(err.is_malformed_response());
        }
    }

    #[test]
    fn test_empty_body_is_malformed() {
        assert!(Report::from_slice(b"").unwrap_err().is_malformed_response());
    }

    #[test]
    fn test_short_tuple_is_malformed() {
        let err = Report::from_slice(br#"{"RECOMMENDATIONS": [["only title"]]}"#).unwrap_err();
        assert!(err.is_malformed_response());
        assert!(err.to_string().contains("expected at least 3 elements"));
    }

    #[test]
    fn test_extra_tuple_fields_ignored() {
        let report =
            Report::from_slice(br#"{"BLACKLIST": {"WARN": [["Spamhaus", "listed", "since 2024"]]}}"#)
                .unwrap();
        assert_eq!(report.blacklist.warnings[0].label, "Spamhaus");
        assert_eq!(report.blacklist.warnings[0].detail, "listed");
    }

    #[test_case(false, false => FirewallStatus::None ; "no flags")]
    #[test_case(true, false => FirewallStatus::Generic ; "generic only")]
    #[test_case(false, true => FirewallStatus::VendorSpecific ; "vendor only")]
    #[test_case(true, true => FirewallStatus::VendorSpecific ; "vendor takes precedence")]
    fn test_firewall_status(has_waf: bool, has_vendor_waf: bool) -> FirewallStatus {
        FirewallFlags { has_waf, has_vendor_waf }.status()
    }

    #[test_case(r#"{"HASWAF": 1}"#, true ; "integer one")]
    #[test_case(r#"{"HASWAF": 0}"#, false ; "integer zero")]
    #[test_case(r#"{"HASWAF": true}"#, true ; "boolean")]
    #[test_case(r#"{"HASWAF": "1"}"#, true ; "string one")]
    #[test_case(r#"{"HASWAF": "0"}"#, false ; "string zero")]
    #[test_case(r#"{"HASWAF": 2}"#, true ; "integer two")]
    #[test_case(r#"{"HASWAF": "2"}"#, true ; "string two")]
    #[test_case(r#"{"HASWAF": " 0 "}"#, false ; "padded string zero")]
    #[test_case(r#"{"HASWAF": "no"}"#, false ; "string no")]
    #[test_case(r#"{"HASWAF": null}"#, false ; "null")]
    fn test_flag_decoding(waf: &str, expected: bool) {
        let flags: FirewallFlags = serde_json::from_str(waf).unwrap();
        assert_eq!(flags.has_waf, expected);
    }

    #[test]
    fn test_firewall_labels() {
        assert_eq!(FirewallStatus::VendorSpecific.to_string(), "Vendor Firewall");
        assert_eq!(FirewallStatus::Generic.to_string(), "Generic Firewall");
        assert_eq!(FirewallStatus::None.to_string(), "No firewall detected");
        assert!(FirewallStatus::None.is_alert());
        assert!(!FirewallStatus::Generic.is_alert());
    }
}
