//! engine::audit
//!
//! Read-only listing and classification of every tag in a store.

use crate::core::naming::NamingScheme;
use crate::core::report::{AuditReport, ClassifiedTag};
use crate::store::{StoreError, TagStore};

/// Classify every tag currently in `store`.
///
/// Tags are reported in the store's listing order, which is lexicographic,
/// so two audits of an unchanged store print identically.
///
/// # Errors
///
/// Returns the store's error if the tag list cannot be read.
pub fn audit(store: &dyn TagStore, scheme: &NamingScheme) -> Result<AuditReport, StoreError> {
    let tags = store
        .list_tags()?
        .into_iter()
        .map(|name| ClassifiedTag {
            classification: scheme.classify(&name),
            name,
        })
        .collect();

    Ok(AuditReport { tags })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::naming::Classification;
    use crate::core::types::Oid;
    use crate::store::mock::{FailOn, MockTagStore};

    fn oid(c: char) -> Oid {
        Oid::new(c.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn classifies_each_tag() {
        let store = MockTagStore::new()
            .with_tag("nWave_v1.1.21", oid('1'))
            .with_tag("v2.17.0", oid('2'));

        let report = audit(&store, &NamingScheme::default()).unwrap();
        assert_eq!(report.total(), 2);
        assert_eq!(report.tags[0].name, "nWave_v1.1.21");
        assert_eq!(report.tags[0].classification, Classification::Rename);
        assert_eq!(report.tags[1].classification, Classification::Delete);
    }

    #[test]
    fn empty_store() {
        let report = audit(&MockTagStore::new(), &NamingScheme::default()).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.rename_count(), 0);
        assert_eq!(report.delete_count(), 0);
    }

    #[test]
    fn does_not_mutate() {
        let store = MockTagStore::new().with_tag("v1", oid('1'));
        audit(&store, &NamingScheme::default()).unwrap();
        assert!(store.mutations().is_empty());
    }

    #[test]
    fn listing_failure_propagates() {
        let store = MockTagStore::new().fail_on(FailOn::ListTagsFrom(0));
        assert!(audit(&store, &NamingScheme::default()).is_err());
    }
}
