//! Record ID generation and resolution
//!
//! IDs use the format: `{8-char-hex}-{kind}-{slug}`
//! Example: `9f3c21ab-task-call-the-printer-vendor`

use std::collections::HashMap;

/// Longest slug kept in an ID
const MAX_SLUG_LEN: usize = 40;

/// Generate a record ID from its kind and a human title
///
/// The hex part comes from the random tail of a v7 UUID so that a batch of
/// records created in the same millisecond still gets distinct prefixes.
pub fn generate_id(kind: &str, title: &str) -> String {
    let uuid = uuid::Uuid::now_v7().simple().to_string();
    let hex = &uuid[uuid.len() - 8..];
    let slug = slugify(title);
    if slug.is_empty() {
        format!("{}-{}", hex, kind)
    } else {
        format!("{}-{}-{}", hex, kind, slug)
    }
}

/// Generate an opaque ID for records without a title (subtasks)
pub fn generate_opaque_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Slugify a title for use in IDs
fn slugify(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}

/// ID resolution for partial matches typed on the command line
pub struct IdResolver<'a> {
    ids: &'a HashMap<String, String>, // id -> display name
}

impl<'a> IdResolver<'a> {
    pub fn new(ids: &'a HashMap<String, String>) -> Self {
        Self { ids }
    }

    /// Resolve a partial reference to a full ID
    ///
    /// Returns:
    /// - Ok(Some(id)) if exactly one match
    /// - Ok(None) if no matches
    /// - Err with candidates if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<String>, Vec<String>> {
        // An exact hit wins even when it is also a prefix of another ID
        if self.ids.contains_key(reference) {
            return Ok(Some(reference.to_string()));
        }

        let mut matches: Vec<String> = self
            .ids
            .keys()
            .filter(|id| Self::matches(id, reference))
            .cloned()
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => {
                matches.sort();
                Err(matches)
            }
        }
    }

    /// Display name for an ID, if known
    pub fn name(&self, id: &str) -> Option<&str> {
        self.ids.get(id).map(String::as_str)
    }

    fn matches(id: &str, reference: &str) -> bool {
        if reference.is_empty() {
            return false;
        }

        // Hex prefix match
        if id.starts_with(reference) {
            return true;
        }

        // Slug contains match (skip the hex and kind parts)
        let mut parts = id.splitn(3, '-');
        parts.next();
        parts.next();
        parts.next().is_some_and(|slug| slug.contains(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ids() -> HashMap<String, String> {
        let mut ids = HashMap::new();
        ids.insert("1a2b3c4d-task-fix-printer".to_string(), "Fix printer".to_string());
        ids.insert("5e6f7a8b-task-shorter-meetings".to_string(), "Shorter meetings".to_string());
        ids.insert("9c0d1e2f-task-printer-maintenance".to_string(), "Printer maintenance".to_string());
        ids
    }

    #[test]
    fn test_generate_id() {
        let id = generate_id("task", "Call the Printer Vendor");
        assert!(id.contains("-task-"));
        assert!(id.ends_with("call-the-printer-vendor"));
        assert_eq!(id.split('-').next().unwrap().len(), 8);
    }

    #[test]
    fn test_generate_id_unique_in_batch() {
        let ids: std::collections::HashSet<_> = (0..200).map(|_| generate_id("task", "same title")).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_generate_id_without_slug() {
        let id = generate_id("vent", "!!!");
        assert!(id.ends_with("-vent"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Fix it NOW!"), "fix-it-now");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("don't stop"), "dont-stop");
        assert_eq!(slugify("my meetings run over"), "my-meetings-run-over");
    }

    #[test]
    fn test_slugify_truncates() {
        let slug = slugify(&"word ".repeat(30));
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_resolver_exact() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        assert_eq!(
            resolver.resolve("1a2b3c4d-task-fix-printer").unwrap(),
            Some("1a2b3c4d-task-fix-printer".to_string())
        );
    }

    #[test]
    fn test_resolver_hex_prefix() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        assert_eq!(
            resolver.resolve("5e6f").unwrap(),
            Some("5e6f7a8b-task-shorter-meetings".to_string())
        );
    }

    #[test]
    fn test_resolver_slug_match() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        assert_eq!(
            resolver.resolve("meetings").unwrap(),
            Some("5e6f7a8b-task-shorter-meetings".to_string())
        );
    }

    #[test]
    fn test_resolver_ambiguous() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        let candidates = resolver.resolve("printer").unwrap_err();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_resolver_no_match() {
        let ids = sample_ids();
        let resolver = IdResolver::new(&ids);
        assert_eq!(resolver.resolve("zzz").unwrap(), None);
        assert_eq!(resolver.resolve("").unwrap(), None);
        assert_eq!(resolver.name("1a2b3c4d-task-fix-printer"), Some("Fix printer"));
    }
}
