//! DOI enrichment boundary.
//!
//! Resolving a title/author query to a DOI is a network concern and lives
//! outside this crate; collaborators inject a [`DoiResolver`]. Failures are
//! absorbed: a resolver error is treated exactly like "no DOI found", the
//! field stays absent, and the pipeline continues. No retries happen here.

use crate::cite::ast::{Author, ReferenceEntry, ResolveError};

/// External lookup from bibliographic data to a DOI.
pub trait DoiResolver {
    /// Resolve a DOI for the given title and authors. `Ok(None)` means no
    /// match; errors are treated identically by the engine.
    fn resolve(&self, title: &str, authors: &[Author]) -> Result<Option<String>, ResolveError>;
}

/// Resolver for callers without a network collaborator: never finds
/// anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl DoiResolver for NullResolver {
    fn resolve(&self, _title: &str, _authors: &[Author]) -> Result<Option<String>, ResolveError> {
        Ok(None)
    }
}

/// Fill absent `doi` fields via the resolver. Entries without a title are
/// skipped (nothing to query with). Returns how many entries were enriched.
pub fn enrich_references(references: &mut [ReferenceEntry], resolver: &dyn DoiResolver) -> usize {
    let mut enriched = 0;
    for entry in references.iter_mut() {
        if entry.doi.is_some() {
            continue;
        }
        let Some(title) = entry.title.clone() else {
            continue;
        };
        match resolver.resolve(&title, &entry.authors) {
            Ok(Some(doi)) => {
                entry.doi = Some(normalize_doi(&doi));
                enriched += 1;
            }
            // Absent and failed are the same thing from in here.
            Ok(None) | Err(_) => {}
        }
    }
    enriched
}

/// DOIs come back from resolvers in bare or URL form; stored form is URL.
fn normalize_doi(doi: &str) -> String {
    if doi.starts_with("http://") || doi.starts_with("https://") {
        doi.to_string()
    } else {
        format!("https://doi.org/{}", doi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedResolver(Option<String>);

    impl DoiResolver for FixedResolver {
        fn resolve(
            &self,
            _title: &str,
            _authors: &[Author],
        ) -> Result<Option<String>, ResolveError> {
            Ok(self.0.clone())
        }
    }

    struct FailingResolver;

    impl DoiResolver for FailingResolver {
        fn resolve(
            &self,
            _title: &str,
            _authors: &[Author],
        ) -> Result<Option<String>, ResolveError> {
            Err(ResolveError("timeout".to_string()))
        }
    }

    fn entry_with_title(title: &str) -> ReferenceEntry {
        let mut entry = ReferenceEntry::bare(0, title);
        entry.title = Some(title.to_string());
        entry
    }

    #[test]
    fn test_bare_doi_is_normalized_to_url() {
        let mut refs = vec![entry_with_title("A study")];
        let resolver = FixedResolver(Some("10.1000/xyz".to_string()));
        assert_eq!(enrich_references(&mut refs, &resolver), 1);
        assert_eq!(refs[0].doi.as_deref(), Some("https://doi.org/10.1000/xyz"));
    }

    #[test]
    fn test_existing_doi_is_kept() {
        let mut refs = vec![entry_with_title("A study")];
        refs[0].doi = Some("https://doi.org/10.1/existing".to_string());
        let resolver = FixedResolver(Some("10.2/other".to_string()));
        assert_eq!(enrich_references(&mut refs, &resolver), 0);
        assert_eq!(refs[0].doi.as_deref(), Some("https://doi.org/10.1/existing"));
    }

    #[test]
    fn test_resolver_failure_is_absorbed() {
        let mut refs = vec![entry_with_title("A study")];
        assert_eq!(enrich_references(&mut refs, &FailingResolver), 0);
        assert!(refs[0].doi.is_none());
    }

    #[test]
    fn test_null_resolver_enriches_nothing() {
        let mut refs = vec![entry_with_title("A study")];
        assert_eq!(enrich_references(&mut refs, &NullResolver), 0);
    }
}
