//! # Playable Identifier Classification
//!
//! Pure, synchronous parsing of provider URIs of the form
//! `spotify:<kind>:<id>`. Malformed input is never an error; it simply
//! fails to classify and yields `None`, leaving policy to the caller.

use std::fmt;

/// Expected length of the base62 identifier segment.
const ID_LENGTH: usize = 22;

/// The kind of content a playable identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Track,
    Album,
    Playlist,
    Artist,
    Show,
    Episode,
}

impl ContentKind {
    /// Parse the kind segment of a URI. Case-sensitive: the provider
    /// only emits lowercase kinds, so anything else fails to classify.
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "track" => Some(ContentKind::Track),
            "album" => Some(ContentKind::Album),
            "playlist" => Some(ContentKind::Playlist),
            "artist" => Some(ContentKind::Artist),
            "show" => Some(ContentKind::Show),
            "episode" => Some(ContentKind::Episode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Track => "track",
            ContentKind::Album => "album",
            ContentKind::Playlist => "playlist",
            ContentKind::Artist => "artist",
            ContentKind::Show => "show",
            ContentKind::Episode => "episode",
        }
    }

    /// Whether playback of this kind targets a single item rather than
    /// a context of items.
    pub fn is_single_item(&self) -> bool {
        matches!(self, ContentKind::Track | ContentKind::Episode)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully classified playable identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUri {
    pub kind: ContentKind,
    /// The 22-character base62 identifier segment.
    pub id: String,
    /// The full canonical URI, e.g. `spotify:track:<id>`.
    pub uri: String,
}

impl fmt::Display for ResolvedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Classify an identifier string as a playable reference.
///
/// Accepts exactly `spotify:<kind>:<22-char base62 id>`. Returns `None`
/// for anything else: wrong scheme, unknown kind, bad id length or
/// alphabet, extra segments, surrounding whitespace.
pub fn resolve(input: &str) -> Option<ResolvedUri> {
    let mut parts = input.split(':');

    if parts.next()? != "spotify" {
        return None;
    }
    let kind = ContentKind::from_segment(parts.next()?)?;
    let id = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if id.len() != ID_LENGTH || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ResolvedUri {
        kind,
        id: id.to_string(),
        uri: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: &str = "spotify:track:4uLU6hMCjMI75M1A2tKUQC";

    #[test]
    fn resolves_track_uri() {
        let resolved = resolve(TRACK).unwrap();
        assert_eq!(resolved.kind, ContentKind::Track);
        assert_eq!(resolved.id, "4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(resolved.uri, TRACK);
    }

    #[test]
    fn resolves_every_known_kind() {
        let id = "0123456789abcdefghijAB";
        for kind in ["track", "album", "playlist", "artist", "show", "episode"] {
            let uri = format!("spotify:{kind}:{id}");
            let resolved = resolve(&uri).unwrap();
            assert_eq!(resolved.kind.as_str(), kind);
        }
    }

    #[test]
    fn rejects_non_uri_input() {
        assert!(resolve("not-a-uri").is_none());
        assert!(resolve("").is_none());
        assert!(resolve("spotify:").is_none());
        assert!(resolve("spotify:track:").is_none());
        assert!(resolve("https://open.spotify.com/track/abc").is_none());
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(resolve("spotify:podcast:0123456789abcdefghijAB").is_none());
    }

    #[test]
    fn is_case_sensitive() {
        assert!(resolve("Spotify:track:0123456789abcdefghijAB").is_none());
        assert!(resolve("spotify:Track:0123456789abcdefghijAB").is_none());
    }

    #[test]
    fn rejects_bad_id() {
        // Too short, too long, non-alphanumeric.
        assert!(resolve("spotify:track:abc").is_none());
        assert!(resolve("spotify:track:0123456789abcdefghijABC").is_none());
        assert!(resolve("spotify:track:0123456789abcdefghij_B").is_none());
    }

    #[test]
    fn rejects_extra_segments_and_whitespace() {
        assert!(resolve("spotify:track:0123456789abcdefghijAB:extra").is_none());
        assert!(resolve(" spotify:track:0123456789abcdefghijAB").is_none());
    }

    #[test]
    fn classification_is_deterministic() {
        assert_eq!(resolve(TRACK), resolve(TRACK));
    }

    #[test]
    fn single_item_kinds() {
        assert!(ContentKind::Track.is_single_item());
        assert!(ContentKind::Episode.is_single_item());
        assert!(!ContentKind::Album.is_single_item());
        assert!(!ContentKind::Playlist.is_single_item());
    }
}
