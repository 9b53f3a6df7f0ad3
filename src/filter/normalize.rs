//! Variant name normalisation.
//!
//! The storefront labels the same kind of file in many ways (`"x86_64 .deb"`,
//! `".x86_64.rpm"`, `"Download tar.gz"`). The rules below rewrite them into
//! one vocabulary before any filter looks at them. Order matters: later
//! rules expect the output of earlier ones.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered `(pattern, replacement)` rewrite rules.
pub const NAME_RULES: &[(&str, &str)] = &[
    (r"^\.i386\.", "32-bit ."),
    (r"^\.x86_64\.", "64-bit ."),
    (r"32-bit 32-bit", "32-bit"),
    (r"64-bit 64-bit", "64-bit"),
    (r"i386", ""),
    (r"x86_64", ""),
    (r"^AIR$", "Air"),
    (r"\.tgz", ".tar.gz"),
    (r"^Mojo Installer$", ".mojo.run"),
    (r"^tar\.gz$", ".tar.gz"),
    (r"^bin$", ".bin"),
    (r"^Download ", ""),
    (r"^Native ", ""),
    (r" Package$", ""),
    (r" \(beta\)$", ""),
];

static COMPILED_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    NAME_RULES
        .iter()
        .filter_map(|(pattern, replacement)| {
            Regex::new(pattern).ok().map(|re| (re, *replacement))
        })
        .collect()
});

/// Apply every rewrite rule, in order, to a variant name.
pub fn normalize_name(name: &str) -> String {
    COMPILED_RULES
        .iter()
        .fold(name.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}
