//! Parent-chain settings resolution.
//!
//! A stanza may carry a `parent` field whose value names another stanza in
//! the same file (only the first whitespace-delimited token is the parent's
//! name; anything after it, such as a sort priority, is ignored). The
//! chains this forms are walked root-first and each record's fields are
//! overlaid onto the result, so a descendant's values win over its
//! ancestors' for the same key.
//!
//! Resolution never mutates the underlying stanzas. A `parent` reference
//! that names no stanza in the file ends the chain; a `parent` cycle is a
//! fatal error rather than an endless walk.

use std::collections::{HashMap, HashSet};

use crate::ra::error::RaError;
use crate::ra::file::RaFile;

/// The name of a stanza's parent: the first token of its `parent` field.
fn parent_of<'a>(file: &'a RaFile, name: &str) -> Option<&'a str> {
    file.get(name)?
        .get("parent")?
        .split_whitespace()
        .next()
}

/// The chain of records from the root ancestor down to `name` itself,
/// root first.
///
/// Errors with `RecordNotFound` if `name` is not in the file and with
/// `CircularParentChain` if the `parent` references loop.
pub fn parent_chain(file: &RaFile, name: &str) -> Result<Vec<String>, RaError> {
    if !file.contains(name) {
        return Err(RaError::RecordNotFound(name.to_string()));
    }
    let mut chain = vec![name.to_string()];
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(name.to_string());
    let mut current = name.to_string();
    while let Some(parent) = parent_of(file, &current) {
        if !seen.insert(parent.to_string()) {
            return Err(RaError::CircularParentChain(parent.to_string()));
        }
        chain.push(parent.to_string());
        current = parent.to_string();
    }
    chain.reverse();
    Ok(chain)
}

/// The effective field set of a record: all of its entries plus those of
/// its ancestors, with closer entries overriding more distant ones.
///
/// The result is a plain key/value mapping with no ordering or comment
/// metadata.
pub fn resolved_settings(file: &RaFile, name: &str) -> Result<HashMap<String, String>, RaError> {
    let chain = parent_chain(file, name)?;
    let mut settings = HashMap::new();
    for ancestor in &chain {
        // A dangling parent reference contributes nothing
        if let Some(stanza) = file.get(ancestor) {
            for (key, value) in stanza.fields() {
                settings.insert(key.to_string(), value.to_string());
            }
        }
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_file() -> RaFile {
        RaFile::parse(
            "key1 root\ntype bigWig\ncolor 0,0,0\n\n\
             key1 middle\nparent root 2\ncolor 255,0,0\n\n\
             key1 leaf\nparent middle\nvisibility full\n",
        )
        .unwrap()
    }

    #[test]
    fn test_parent_chain_is_root_first() {
        let file = chain_file();
        assert_eq!(
            parent_chain(&file, "leaf").unwrap(),
            vec!["root", "middle", "leaf"]
        );
        assert_eq!(parent_chain(&file, "root").unwrap(), vec!["root"]);
    }

    #[test]
    fn test_parent_name_is_first_token_only() {
        let file = chain_file();
        // "parent root 2" names "root", the trailing priority is ignored
        assert_eq!(
            parent_chain(&file, "middle").unwrap(),
            vec!["root", "middle"]
        );
    }

    #[test]
    fn test_descendant_values_override_ancestors() {
        let file = chain_file();
        let settings = resolved_settings(&file, "leaf").unwrap();
        assert_eq!(settings.get("key1").map(String::as_str), Some("leaf"));
        assert_eq!(settings.get("type").map(String::as_str), Some("bigWig"));
        assert_eq!(settings.get("color").map(String::as_str), Some("255,0,0"));
        assert_eq!(
            settings.get("visibility").map(String::as_str),
            Some("full")
        );
        assert_eq!(settings.get("parent").map(String::as_str), Some("middle"));
    }

    #[test]
    fn test_unknown_record() {
        let file = chain_file();
        assert_eq!(
            resolved_settings(&file, "missing").unwrap_err(),
            RaError::RecordNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_dangling_parent_ends_the_chain() {
        let file = RaFile::parse("key1 orphan\nparent nowhere\n").unwrap();
        let settings = resolved_settings(&file, "orphan").unwrap();
        assert_eq!(settings.get("key1").map(String::as_str), Some("orphan"));
    }

    #[test]
    fn test_parent_cycle_is_an_error() {
        let file = RaFile::parse(
            "key1 a\nparent b\n\nkey1 b\nparent a\n",
        )
        .unwrap();
        assert_eq!(
            resolved_settings(&file, "a").unwrap_err(),
            RaError::CircularParentChain("a".to_string())
        );
    }

    #[test]
    fn test_self_parent_is_an_error() {
        let file = RaFile::parse("key1 a\nparent a\n").unwrap();
        assert_eq!(
            parent_chain(&file, "a").unwrap_err(),
            RaError::CircularParentChain("a".to_string())
        );
    }
}
