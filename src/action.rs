//! Extraction of embedded navigation directives from backend reply text
//!
//! The dialogue backend may embed one machine-actionable fragment inside an
//! otherwise free-form reply:
//!
//! ```text
//! Opening market insights. ACTION: {"type":"navigate","target":"market"}
//! ```
//!
//! Extraction is best-effort over untrusted text: a malformed or unhonored
//! fragment is left in the visible text untouched and yields no directive.
//! This module is the only place that knows the marker grammar, so the
//! convention can be hardened later without touching the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal that introduces a directive fragment.
pub const ACTION_MARKER: &str = "ACTION:";

/// The seven navigable destinations of the assistant UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavTarget {
    Dashboard,
    Profile,
    Irrigation,
    Crops,
    Market,
    Alerts,
    Sustainable,
}

impl NavTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            NavTarget::Dashboard => "dashboard",
            NavTarget::Profile => "profile",
            NavTarget::Irrigation => "irrigation",
            NavTarget::Crops => "crops",
            NavTarget::Market => "market",
            NavTarget::Alerts => "alerts",
            NavTarget::Sustainable => "sustainable",
        }
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavTarget {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(NavTarget::Dashboard),
            "profile" => Ok(NavTarget::Profile),
            "irrigation" => Ok(NavTarget::Irrigation),
            "crops" => Ok(NavTarget::Crops),
            "market" => Ok(NavTarget::Market),
            "alerts" => Ok(NavTarget::Alerts),
            "sustainable" => Ok(NavTarget::Sustainable),
            _ => Err(()),
        }
    }
}

/// A directive parsed out of backend text. Currently only navigation exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDirective {
    pub target: NavTarget,
}

/// Raw wire form of a directive fragment. The distilled contract names the
/// field `target`; older backend prompts emitted `page`. Both are accepted.
#[derive(Debug, Deserialize)]
struct RawDirective {
    #[serde(rename = "type")]
    kind: String,
    target: Option<String>,
    page: Option<String>,
}

/// Locate, validate, and strip one embedded directive.
///
/// Returns the visible text and the directive, if one was honored. Only
/// `type="navigate"` with a known target is honored; anything else leaves the
/// reply byte-for-byte intact. Never panics.
pub fn extract(reply: &str) -> (String, Option<ActionDirective>) {
    let Some(marker_idx) = reply.find(ACTION_MARKER) else {
        return (reply.to_string(), None);
    };

    let fragment = &reply[marker_idx + ACTION_MARKER.len()..];

    // Parse exactly one JSON value off the front of the fragment; anything
    // after it stays in the visible text.
    let mut stream = serde_json::Deserializer::from_str(fragment).into_iter::<RawDirective>();
    let raw = match stream.next() {
        Some(Ok(raw)) => raw,
        _ => return (reply.to_string(), None),
    };
    let fragment_end = marker_idx + ACTION_MARKER.len() + stream.byte_offset();

    if raw.kind != "navigate" {
        return (reply.to_string(), None);
    }
    let Some(target) = raw
        .target
        .or(raw.page)
        .and_then(|t| t.parse::<NavTarget>().ok())
    else {
        return (reply.to_string(), None);
    };

    let before = &reply[..marker_idx];
    let after = &reply[fragment_end..];
    let visible = format!("{}{}", before.trim_end(), after).trim().to_string();

    (visible, Some(ActionDirective { target }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_strips_directive() {
        let (visible, directive) =
            extract("ok. ACTION: {\"type\":\"navigate\",\"target\":\"market\"}");
        assert_eq!(visible, "ok.");
        assert_eq!(directive, Some(ActionDirective { target: NavTarget::Market }));
    }

    #[test]
    fn malformed_json_is_left_untouched() {
        let reply = "hello ACTION: {bad json";
        let (visible, directive) = extract(reply);
        assert_eq!(visible, reply);
        assert!(directive.is_none());
    }

    #[test]
    fn text_without_marker_passes_through() {
        let (visible, directive) = extract("plain farming advice");
        assert_eq!(visible, "plain farming advice");
        assert!(directive.is_none());
    }

    #[test]
    fn unknown_target_is_not_honored() {
        let reply = "go ACTION: {\"type\":\"navigate\",\"target\":\"settings\"}";
        let (visible, directive) = extract(reply);
        assert_eq!(visible, reply);
        assert!(directive.is_none());
    }

    #[test]
    fn non_navigate_type_is_not_honored() {
        let reply = "hm ACTION: {\"type\":\"delete\",\"target\":\"market\"}";
        let (visible, directive) = extract(reply);
        assert_eq!(visible, reply);
        assert!(directive.is_none());
    }

    #[test]
    fn legacy_page_key_is_accepted() {
        let (visible, directive) =
            extract("sure. ACTION: {\"type\": \"navigate\", \"page\": \"irrigation\"}");
        assert_eq!(visible, "sure.");
        assert_eq!(
            directive,
            Some(ActionDirective { target: NavTarget::Irrigation })
        );
    }

    #[test]
    fn text_after_the_fragment_survives() {
        let (visible, directive) = extract(
            "Opening it. ACTION: {\"type\":\"navigate\",\"target\":\"alerts\"} Anything else?",
        );
        assert_eq!(visible, "Opening it. Anything else?");
        assert_eq!(directive.unwrap().target, NavTarget::Alerts);
    }

    #[test]
    fn only_the_first_marker_is_considered() {
        let (visible, directive) = extract(
            "a ACTION: {\"type\":\"navigate\",\"target\":\"crops\"} b ACTION: {\"type\":\"navigate\",\"target\":\"market\"}",
        );
        assert_eq!(directive.unwrap().target, NavTarget::Crops);
        assert!(visible.contains("ACTION:"));
    }

    #[test]
    fn empty_input() {
        let (visible, directive) = extract("");
        assert!(visible.is_empty());
        assert!(directive.is_none());
    }

    #[test]
    fn nav_target_round_trips() {
        for target in [
            NavTarget::Dashboard,
            NavTarget::Profile,
            NavTarget::Irrigation,
            NavTarget::Crops,
            NavTarget::Market,
            NavTarget::Alerts,
            NavTarget::Sustainable,
        ] {
            assert_eq!(target.as_str().parse::<NavTarget>(), Ok(target));
        }
        assert!("elsewhere".parse::<NavTarget>().is_err());
    }
}
