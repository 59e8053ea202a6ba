use crate::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Reference to a charm or bundle: a name plus an optional revision.
///
/// The canonical text form is `name` or `name-<revision>`. Equality, ordering
/// and hashing all go through that text, so two URLs are the same key exactly
/// when they print the same. Nothing is normalized; callers hand in canonical
/// names.
#[derive(Clone, Debug)]
pub struct CharmUrl {
    name: String,
    revision: Option<u32>,
    canonical: String,
}

impl CharmUrl {
    /// Parse a canonical charm URL.
    ///
    /// A trailing `-<digits>` is only read as a revision when the digits are
    /// plain decimal without a leading zero, so `foo-01` stays a bare name.
    /// Text whose name would itself end in a revision suffix, like `foo-1-2`,
    /// is rejected: its revision-less form would print as `foo-1` and read
    /// back as a different URL.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if text.is_empty() {
            return Err(ParseError::EmptyName(text.to_string()));
        }
        match split_revision(text) {
            Some((name, _)) if split_revision(name).is_some() => {
                Err(ParseError::AmbiguousRevision(text.to_string()))
            }
            Some((name, revision)) => Ok(Self::from_parts(name, Some(revision))),
            None => Ok(Self::from_parts(text, None)),
        }
    }

    fn from_parts(name: &str, revision: Option<u32>) -> Self {
        let canonical = match revision {
            Some(rev) => format!("{name}-{rev}"),
            None => name.to_string(),
        };
        Self {
            name: name.to_string(),
            revision,
            canonical,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn revision(&self) -> Option<u32> {
        self.revision
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Same name, revision replaced.
    pub fn with_revision(&self, revision: u32) -> Self {
        Self::from_parts(&self.name, Some(revision))
    }

    /// Same name, revision dropped. Revision counters are keyed by this form.
    pub fn without_revision(&self) -> Self {
        Self::from_parts(&self.name, None)
    }
}

fn split_revision(text: &str) -> Option<(&str, u32)> {
    let (name, suffix) = text.rsplit_once('-')?;
    if name.is_empty() || !is_canonical_revision(suffix) {
        return None;
    }
    suffix.parse().ok().map(|revision| (name, revision))
}

fn is_canonical_revision(digits: &str) -> bool {
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

impl PartialEq for CharmUrl {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for CharmUrl {}

impl Hash for CharmUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for CharmUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CharmUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for CharmUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for CharmUrl {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CharmUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CharmUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Distribution track under which charms are published.
///
/// The set is closed; unknown names are rejected rather than carried along.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Channel {
    #[default]
    Stable,
    Candidate,
    Beta,
    Edge,
    Unpublished,
}

impl Channel {
    /// Every recognized channel, most stable first.
    pub const ORDERED: [Channel; 5] = [
        Channel::Stable,
        Channel::Candidate,
        Channel::Beta,
        Channel::Edge,
        Channel::Unpublished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Candidate => "candidate",
            Channel::Beta => "beta",
            Channel::Edge => "edge",
            Channel::Unpublished => "unpublished",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "stable" => Ok(Channel::Stable),
            "candidate" => Ok(Channel::Candidate),
            "beta" => Ok(Channel::Beta),
            "edge" => Ok(Channel::Edge),
            "unpublished" => Ok(Channel::Unpublished),
            other => Err(ParseError::UnknownChannel(other.to_string())),
        }
    }
}

impl Serialize for Channel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Channel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Model generation a label is attached to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum GenerationVersion {
    Current,
    Next,
}

impl GenerationVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationVersion::Current => "current",
            GenerationVersion::Next => "next",
        }
    }
}

impl FromStr for GenerationVersion {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "current" => Ok(GenerationVersion::Current),
            "next" => Ok(GenerationVersion::Next),
            other => Err(ParseError::UnknownGeneration(other.to_string())),
        }
    }
}

impl Serialize for GenerationVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GenerationVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trailing_revision() {
        let url = CharmUrl::parse("cs:trusty/mysql-12").unwrap();
        assert_eq!(url.name(), "cs:trusty/mysql");
        assert_eq!(url.revision(), Some(12));
        assert_eq!(url.to_string(), "cs:trusty/mysql-12");

        let bare = CharmUrl::parse("wordpress").unwrap();
        assert_eq!(bare.name(), "wordpress");
        assert_eq!(bare.revision(), None);
    }

    #[test]
    fn non_canonical_suffix_stays_in_name() {
        for text in ["foo-01", "foo-", "foo-bar", "-3", "foo--1"] {
            let url = CharmUrl::parse(text).unwrap();
            assert_eq!(url.to_string(), text, "display must round-trip {text}");
        }
        assert_eq!(CharmUrl::parse("foo-01").unwrap().revision(), None);
        assert_eq!(CharmUrl::parse("-3").unwrap().revision(), None);
        assert_eq!(CharmUrl::parse("foo-0").unwrap().revision(), Some(0));
        assert_eq!(
            CharmUrl::parse("").unwrap_err(),
            ParseError::EmptyName(String::new())
        );
    }

    #[test]
    fn equality_follows_canonical_text() {
        assert_eq!(
            CharmUrl::parse("foo-1").unwrap(),
            CharmUrl::parse("foo").unwrap().with_revision(1)
        );
        assert_ne!(
            CharmUrl::parse("Foo").unwrap(),
            CharmUrl::parse("foo").unwrap()
        );
        assert_ne!(
            CharmUrl::parse("foo/").unwrap(),
            CharmUrl::parse("foo").unwrap()
        );
    }

    #[test]
    fn nested_revision_suffix_is_rejected() {
        for text in ["foo-1-2", "cs:trusty/mysql-0-3", "a-10-10"] {
            assert_eq!(
                CharmUrl::parse(text).unwrap_err(),
                ParseError::AmbiguousRevision(text.to_string())
            );
        }
        assert!(serde_json::from_str::<CharmUrl>("\"foo-1-2\"").is_err());

        // Non-canonical inner digits are part of the name.
        let url = CharmUrl::parse("foo-01-2").unwrap();
        assert_eq!(url.name(), "foo-01");
        assert_eq!(url.revision(), Some(2));
    }

    #[test]
    fn revision_less_form_reads_back_unchanged() {
        for text in ["foo-2", "foo-01-2", "foo--1", "-3", "cs:trusty/mysql-12", "wiki-simple"] {
            let url = CharmUrl::parse(text).unwrap();
            let bare = url.without_revision();
            let reread = CharmUrl::parse(bare.as_str()).unwrap();
            assert_eq!(reread.revision(), None, "{text}");
            assert_eq!(reread.name(), url.name(), "{text}");
            assert_eq!(reread, bare);
        }
    }

    #[test]
    fn with_revision_replaces() {
        let url = CharmUrl::parse("mysql-3").unwrap();
        assert_eq!(url.with_revision(7).as_str(), "mysql-7");
        assert_eq!(url.without_revision().as_str(), "mysql");
    }

    #[test]
    fn channel_names_round_trip() {
        for channel in Channel::ORDERED {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json.trim_matches('"'), channel.as_str());
            let back: Channel = serde_json::from_str(&json).unwrap();
            assert_eq!(back, channel);
        }
        assert_eq!(Channel::default(), Channel::Stable);
        assert!(serde_json::from_str::<Channel>("\"nightly\"").is_err());
        assert_eq!(
            "nightly".parse::<Channel>().unwrap_err(),
            ParseError::UnknownChannel("nightly".into())
        );
    }

    #[test]
    fn charm_url_serde_uses_canonical_text() {
        let url = CharmUrl::parse("cs:bundle/wiki-4").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"cs:bundle/wiki-4\"");
        let back: CharmUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(back.revision(), Some(4));
        assert!(serde_json::from_str::<CharmUrl>("\"\"").is_err());
    }

    #[test]
    fn generation_versions_parse() {
        assert_eq!(
            "next".parse::<GenerationVersion>().unwrap(),
            GenerationVersion::Next
        );
        assert!("later".parse::<GenerationVersion>().is_err());
    }
}
