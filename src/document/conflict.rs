//! Path conflict detection across documents.
//!
//! Runs over a full document listing (store sync, `replay`) rather than a
//! single write, so every collision is reported at once.

use rustc_hash::FxHashMap;

use super::{DocumentId, LocalizedDocument};
use crate::core::{CanonicalPath, Locale, LocaleSet};
use crate::log;
use crate::utils::plural_s;

/// Path sources map: (locale, canonical path) -> documents claiming it.
pub type PathSourceMap = FxHashMap<(Locale, CanonicalPath), Vec<DocumentId>>;

/// Why a path is claimed illegally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Several documents in one locale share a canonical path
    Duplicate,
    /// The first segment equals a prefixed locale code
    LocaleShadowing,
}

/// A path conflict within one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConflict {
    pub kind: ConflictKind,
    pub locale: Locale,
    pub path: CanonicalPath,
    /// Documents claiming the path, sorted
    pub sources: Vec<DocumentId>,
}

/// Collect every (locale, canonical path) -> documents mapping.
pub fn collect_path_sources(docs: &[LocalizedDocument]) -> PathSourceMap {
    let mut sources = PathSourceMap::default();
    for doc in docs {
        sources
            .entry((doc.locale.clone(), doc.canonical_path.clone()))
            .or_default()
            .push(doc.id.clone());
    }
    sources
}

/// Detect paths claimed by more than one document, and paths that would be
/// mistaken for a locale prefix.
///
/// Output is sorted by locale, then path.
pub fn detect_conflicts(sources: &PathSourceMap, locales: &LocaleSet) -> Vec<PathConflict> {
    let mut conflicts: Vec<PathConflict> = sources
        .iter()
        .flat_map(|((locale, path), ids)| {
            let mut ids = ids.clone();
            ids.sort();

            let shadowed = path
                .first_segment()
                .and_then(|segment| locales.find_prefix(segment))
                .is_some();

            let duplicate = (ids.len() > 1).then(|| PathConflict {
                kind: ConflictKind::Duplicate,
                locale: locale.clone(),
                path: path.clone(),
                sources: ids.clone(),
            });
            let shadowing = shadowed.then(|| PathConflict {
                kind: ConflictKind::LocaleShadowing,
                locale: locale.clone(),
                path: path.clone(),
                sources: ids,
            });
            duplicate.into_iter().chain(shadowing)
        })
        .collect();

    conflicts.sort_by(|a, b| (&a.locale, &a.path).cmp(&(&b.locale, &b.path)));
    conflicts
}

/// Print conflicts using the standard log format.
///
/// Output format:
/// ```text
/// [error] path conflicts (2 paths, 4 documents)
/// [path] en /about (2 documents)
///   - page-1
///   - page-7
/// ```
pub fn print_conflicts(conflicts: &[PathConflict]) {
    if conflicts.is_empty() {
        return;
    }

    let total: usize = conflicts.iter().map(|c| c.sources.len()).sum();
    log!("error"; "path conflicts ({} path{}, {} document{})",
        conflicts.len(), plural_s(conflicts.len()),
        total, plural_s(total));

    for conflict in conflicts {
        eprintln!();
        log!("path"; "{}", headline(conflict));
        for source in &conflict.sources {
            eprintln!("  - {source}");
        }
    }
}

fn headline(conflict: &PathConflict) -> String {
    let n = conflict.sources.len();
    match conflict.kind {
        ConflictKind::Duplicate => {
            format!("{} {} ({} document{})", conflict.locale, conflict.path, n, plural_s(n))
        }
        ConflictKind::LocaleShadowing => {
            format!("{} {} (shadows a locale prefix)", conflict.locale, conflict.path)
        }
    }
}
