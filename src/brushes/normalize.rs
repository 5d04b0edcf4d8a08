//! Identifier Normalizer
//!
//! Paintings name their brushes in many historically incompatible ways:
//! raw GUIDs (in any case, sometimes braced), legacy prefixed ids such as
//! `material_<guid>` or `ob-<name>`, human-readable names with spaces and
//! parenthetical variants, and names mangled by third-party exporters.
//!
//! [`AliasIndex`] collapses all of them onto one catalog entry. It is built
//! once from the catalog and answers every query with a fixed, ordered list of
//! rules; the first rule that matches wins:
//!
//! 1. [`MatchRule::Exact`]: the identifier (or its trimmed, GUID-canonical
//!    form) is a canonical name, primary GUID or alias.
//! 2. [`MatchRule::Prefix`]: a known prefix is stripped and step 1 retried.
//! 3. [`MatchRule::EmbeddedGuid`]: a catalog GUID appears inside the string.
//! 4. [`MatchRule::CompactName`]: the name matches after removing spaces,
//!    parentheses, underscores and hyphens, ignoring case.
//! 5. [`MatchRule::Substring`]: an exporter-specific containment rule.

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::brushes::catalog::SubstringRule;
use crate::brushes::descriptor::BrushDescriptor;

/// Legacy prefixes stripped before retrying an exact match.
pub const KNOWN_PREFIXES: &[&str] = &["material_", "ob-", "brush_"];

const GUID_LEN: usize = 36;

/// Which normalization rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRule {
    Exact,
    Prefix,
    EmbeddedGuid,
    CompactName,
    Substring,
}

/// An identifier that two brushes both claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasCollision {
    /// The contested key; for [`MatchRule::CompactName`] this is the compact form.
    pub identifier: String,
    /// Which lookup table the clash happened in.
    pub rule: MatchRule,
    /// Catalog position of the brush the identifier resolves to.
    pub kept: usize,
    /// Catalog position of the brush that lost the identifier.
    pub dropped: usize,
}

/// Precomputed identifier → catalog position index.
#[derive(Debug, Default)]
pub struct AliasIndex {
    exact: FxHashMap<String, usize>,
    compact: FxHashMap<String, usize>,
    substring_rules: Vec<(String, usize)>,
    collisions: Vec<AliasCollision>,
}

impl AliasIndex {
    /// Builds the index.
    ///
    /// Canonical names and primary GUIDs are inserted before any alias, so an
    /// alias never takes an identifier away from the brush that owns it.
    /// Between two aliases the earlier brush in catalog order wins. Compact
    /// forms follow the same order. Every conflict in either table is
    /// recorded in [`collisions`](Self::collisions).
    #[must_use]
    pub fn build(
        descriptors: &[BrushDescriptor],
        rules: &[SubstringRule],
        by_name: &FxHashMap<String, usize>,
    ) -> Self {
        let mut index = Self::default();

        for (i, d) in descriptors.iter().enumerate() {
            index.claim(d.canonical_name.clone(), i);
            index.claim(d.guid.clone(), i);
            index.claim_compact(&d.canonical_name, i);
        }
        for (i, d) in descriptors.iter().enumerate() {
            for alias in &d.aliases {
                index.claim(alias.clone(), i);
                if !is_guid_shaped(alias) {
                    index.claim_compact(alias, i);
                }
            }
        }

        index.substring_rules = rules
            .iter()
            .filter_map(|r| by_name.get(&r.brush).map(|&i| (r.contains.clone(), i)))
            .collect();

        index
    }

    fn claim(&mut self, key: String, brush: usize) {
        match self.exact.get(&key) {
            None => {
                self.exact.insert(key, brush);
            }
            Some(&owner) if owner != brush => {
                self.collisions.push(AliasCollision {
                    identifier: key,
                    rule: MatchRule::Exact,
                    kept: owner,
                    dropped: brush,
                });
            }
            Some(_) => {}
        }
    }

    fn claim_compact(&mut self, name: &str, brush: usize) {
        let key = compact_key(name);
        if key.is_empty() {
            return;
        }
        match self.compact.get(&key) {
            None => {
                self.compact.insert(key, brush);
            }
            Some(&owner) if owner != brush => {
                self.collisions.push(AliasCollision {
                    identifier: key,
                    rule: MatchRule::CompactName,
                    kept: owner,
                    dropped: brush,
                });
            }
            Some(_) => {}
        }
    }

    /// Identifiers claimed by more than one brush.
    #[must_use]
    pub fn collisions(&self) -> &[AliasCollision] {
        &self.collisions
    }

    /// Number of exact keys (names, GUIDs and aliases) in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Resolves an identifier to a catalog position.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<(usize, MatchRule)> {
        if let Some(i) = self.lookup_exact(identifier) {
            return Some((i, MatchRule::Exact));
        }

        let trimmed = identifier.trim();
        let stripped = strip_known_prefix(trimmed);

        if let Some(rest) = stripped
            && let Some(i) = self.lookup_exact(rest)
        {
            return Some((i, MatchRule::Prefix));
        }

        if let Some(i) = embedded_guids(trimmed).find_map(|g| self.lookup_exact(g)) {
            return Some((i, MatchRule::EmbeddedGuid));
        }

        for candidate in stripped.into_iter().chain([trimmed]) {
            if let Some(&i) = self.compact.get(&compact_key(candidate)) {
                return Some((i, MatchRule::CompactName));
            }
        }

        self.substring_rules
            .iter()
            .find(|(needle, _)| identifier.contains(needle.as_str()))
            .map(|&(_, i)| (i, MatchRule::Substring))
    }

    fn lookup_exact(&self, key: &str) -> Option<usize> {
        if let Some(&i) = self.exact.get(key) {
            return Some(i);
        }
        let trimmed = key.trim();
        if let Some(&i) = self.exact.get(trimmed) {
            return Some(i);
        }
        let guid = Uuid::try_parse(trimmed).ok()?.hyphenated().to_string();
        self.exact.get(&guid).copied()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Strips the first matching legacy prefix, ignoring ASCII case.
#[must_use]
pub fn strip_known_prefix(identifier: &str) -> Option<&str> {
    KNOWN_PREFIXES.iter().find_map(|prefix| {
        let head = identifier.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix)
            .then(|| &identifier[prefix.len()..])
    })
}

/// Lowercased name with whitespace, parentheses, `_` and `-` removed.
#[must_use]
pub fn compact_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_guid_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == GUID_LEN
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

/// Every 8-4-4-4-12 hex window inside `s`, left to right.
pub fn embedded_guids(s: &str) -> impl Iterator<Item = &str> {
    let end = s.len().saturating_sub(GUID_LEN - 1);
    (0..end).filter_map(move |start| {
        let window = s.get(start..start + GUID_LEN)?;
        is_guid_shaped(window).then_some(window)
    })
}
