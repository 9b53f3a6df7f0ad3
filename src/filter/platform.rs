//! Platform kinds and their variant filters.

use super::normalize::normalize_name;
use crate::error::Error;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Platform tag of a download group.
///
/// Each platform is bound to exactly one filter; adding a platform means
/// adding a match arm in [`Platform::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Android,
    Audio,
    Ebook,
    Linux,
    Mac,
    Windows,
}

impl Platform {
    /// Every platform, in tag order.
    pub const ALL: [Platform; 6] = [
        Platform::Android,
        Platform::Audio,
        Platform::Ebook,
        Platform::Linux,
        Platform::Mac,
        Platform::Windows,
    ];

    /// Storefront tag of the platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Audio => "audio",
            Platform::Ebook => "ebook",
            Platform::Linux => "linux",
            Platform::Mac => "mac",
            Platform::Windows => "windows",
        }
    }

    /// Normalise a raw variant name for this platform.
    pub fn normalize(&self, name: &str) -> String {
        normalize_name(name)
    }

    /// Narrow candidate variant names down to the ones worth fetching.
    ///
    /// Pure, total and idempotent.
    pub fn filter(&self, candidates: &BTreeSet<String>) -> BTreeSet<String> {
        match self {
            Platform::Android | Platform::Ebook => candidates.clone(),
            Platform::Mac => BTreeSet::new(),
            Platform::Audio => prefer_single(candidates, "FLAC"),
            Platform::Windows => prefer_single(candidates, "1080p"),
            Platform::Linux => filter_linux(candidates),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownPlatform(s.to_string()))
    }
}

fn prefer_single(candidates: &BTreeSet<String>, preferred: &str) -> BTreeSet<String> {
    if candidates.contains(preferred) {
        BTreeSet::from([preferred.to_string()])
    } else {
        candidates.clone()
    }
}

static PACKAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(zip|tar(\.(gz|bz2))?|deb|rpm)$").expect("valid regex"));
static ARCHIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(zip|tar(\.(gz|bz2))?)$").expect("valid regex"));
static TARBALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.tar(\.(gz|bz2))?$").expect("valid regex"));
static INSTALLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(mojo\.run|bin|sh)$|^Installer$").expect("valid regex"));
static DISTRO_PACKAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(deb|rpm)$").expect("valid regex"));

/// Linux preference order.
///
/// Each candidate may rule out others: a 64-bit build drops its 32-bit twin,
/// archives beat distro packages which beat installer scripts, `.deb` beats
/// `.rpm`, a tarball beats a zip, a Mojo installer beats a bare `.bin`.
/// Every rule is triggered by the full input set and only ever removes
/// names, so applying the filter twice changes nothing.
fn filter_linux(candidates: &BTreeSet<String>) -> BTreeSet<String> {
    if candidates.contains("1080p") {
        return BTreeSet::from(["1080p".to_string()]);
    }

    let has_package = candidates.iter().any(|f| PACKAGE.is_match(f));
    let has_archive = candidates.iter().any(|f| ARCHIVE.is_match(f));
    let has_deb = candidates.iter().any(|f| f.ends_with(".deb"));
    let has_tarball = candidates.iter().any(|f| TARBALL.is_match(f));
    let has_mojo = candidates.contains(".mojo.run");
    let superseded_32: BTreeSet<String> = candidates
        .iter()
        .filter_map(|f| f.strip_prefix("64"))
        .map(|rest| format!("32{}", rest))
        .collect();

    candidates
        .iter()
        .filter(|f| {
            let dropped = superseded_32.contains(*f)
                || (has_package && INSTALLER.is_match(f))
                || (has_archive && DISTRO_PACKAGE.is_match(f))
                || (has_deb && f.ends_with(".rpm"))
                || (has_tarball && f.ends_with(".zip"))
                || (has_mojo && f.as_str() == ".bin");
            !dropped
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_platform_round_trip_tags() {
        for p in Platform::ALL {
            assert_eq!(p.as_str().parse::<Platform>().unwrap(), p);
            assert_eq!(p.to_string(), p.as_str());
        }
        assert!(matches!(
            "amiga".parse::<Platform>(),
            Err(Error::UnknownPlatform(tag)) if tag == "amiga"
        ));
    }

    #[test]
    fn test_keep_all_platforms() {
        let x = set(&["PDF", "ePub", "MOBI"]);
        assert_eq!(Platform::Ebook.filter(&x), x);
        assert_eq!(Platform::Android.filter(&x), x);
    }

    #[test]
    fn test_mac_fetches_nothing() {
        assert!(Platform::Mac.filter(&set(&[".dmg", ".zip"])).is_empty());
    }

    #[test]
    fn test_audio_prefers_flac() {
        assert_eq!(Platform::Audio.filter(&set(&["MP3", "FLAC", "OGG"])), set(&["FLAC"]));
        assert_eq!(Platform::Audio.filter(&set(&["MP3", "OGG"])), set(&["MP3", "OGG"]));
    }

    #[test]
    fn test_windows_prefers_1080p() {
        assert_eq!(Platform::Windows.filter(&set(&["720p", "1080p"])), set(&["1080p"]));
        assert_eq!(Platform::Windows.filter(&set(&["Installer", ".zip"])), set(&["Installer", ".zip"]));
    }

    #[test]
    fn test_linux_prefers_64_bit() {
        let x = set(&["64-bit .tar.gz", "32-bit .tar.gz"]);
        assert_eq!(Platform::Linux.filter(&x), set(&["64-bit .tar.gz"]));
    }

    #[test]
    fn test_linux_prefers_archives_over_packages_and_installers() {
        let x = set(&[".tar.gz", ".deb", ".rpm", ".sh", ".mojo.run", "Installer", ".zip"]);
        assert_eq!(Platform::Linux.filter(&x), set(&[".tar.gz"]));
    }

    #[test]
    fn test_linux_deb_over_rpm() {
        let x = set(&["64-bit .deb", "64-bit .rpm", "32-bit .deb", "32-bit .rpm"]);
        assert_eq!(Platform::Linux.filter(&x), set(&["64-bit .deb"]));
    }

    #[test]
    fn test_linux_mojo_over_bin() {
        assert_eq!(Platform::Linux.filter(&set(&[".mojo.run", ".bin"])), set(&[".mojo.run"]));
    }

    #[test]
    fn test_linux_zip_without_tarball_kept() {
        assert_eq!(Platform::Linux.filter(&set(&[".zip", ".sh"])), set(&[".zip"]));
    }

    #[test]
    fn test_linux_video() {
        assert_eq!(Platform::Linux.filter(&set(&["720p", "1080p"])), set(&["1080p"]));
    }

    #[test]
    fn test_filters_are_idempotent_on_examples() {
        let samples = [
            set(&[]),
            set(&["64-bit .tar.gz", "32-bit .zip", ".deb", ".bin"]),
            set(&["32-bit .tar.gz", "64-bit .deb", ".mojo.run", ".bin"]),
            set(&["FLAC", "MP3"]),
        ];
        for p in Platform::ALL {
            for x in &samples {
                let once = p.filter(x);
                assert_eq!(p.filter(&once), once, "{} not idempotent on {:?}", p, x);
            }
        }
    }
}
