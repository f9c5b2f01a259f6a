//! engine::plan
//!
//! Change-set computation.
//!
//! # Invariants
//!
//! - Planning does not mutate the store
//! - `to_rename` and `to_delete` partition the listed tags
//! - Same tag list and scheme always produce an equal plan

use crate::core::naming::{Classification, NamingScheme};
use crate::core::report::{ClassifiedTag, CleanupPlan, RenameEntry};
use crate::store::{StoreError, TagStore};

/// Compute what an execute run would change, from the store's current tags.
///
/// # Errors
///
/// Returns the store's error if the tag list cannot be read.
pub fn plan(store: &dyn TagStore, scheme: &NamingScheme) -> Result<CleanupPlan, StoreError> {
    let tags = store.list_tags()?;
    Ok(plan_from_tags(&tags, scheme))
}

/// Partition a tag list into renames and deletions.
///
/// # Example
///
/// ```
/// use tagshift::core::naming::NamingScheme;
/// use tagshift::engine::plan::plan_from_tags;
///
/// let tags = vec!["nWave_v1.0.0".to_string(), "v0.9.0".to_string()];
/// let plan = plan_from_tags(&tags, &NamingScheme::default());
///
/// assert_eq!(plan.to_rename[0].new_name, "v1.0.0");
/// assert_eq!(plan.to_delete[0].name, "v0.9.0");
/// ```
pub fn plan_from_tags(tags: &[String], scheme: &NamingScheme) -> CleanupPlan {
    let mut plan = CleanupPlan::default();

    for name in tags {
        match scheme.classify(name) {
            Classification::Rename => plan.to_rename.push(RenameEntry {
                old_name: name.clone(),
                new_name: scheme.rename_target(name),
            }),
            Classification::Delete => plan.to_delete.push(ClassifiedTag {
                name: name.clone(),
                classification: Classification::Delete,
            }),
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Oid;
    use crate::store::mock::MockTagStore;

    fn oid(c: char) -> Oid {
        Oid::new(c.to_string().repeat(40)).unwrap()
    }

    fn store() -> MockTagStore {
        MockTagStore::new()
            .with_tag("nWave_v1.1.20", oid('1'))
            .with_tag("nWave_v1.1.21", oid('2'))
            .with_tag("v1.4.8", oid('3'))
            .with_tag("v2.17.0", oid('4'))
    }

    #[test]
    fn partitions_tags() {
        let plan = plan(&store(), &NamingScheme::default()).unwrap();

        assert_eq!(
            plan.to_rename,
            vec![
                RenameEntry {
                    old_name: "nWave_v1.1.20".into(),
                    new_name: "v1.1.20".into()
                },
                RenameEntry {
                    old_name: "nWave_v1.1.21".into(),
                    new_name: "v1.1.21".into()
                },
            ]
        );
        let deleted: Vec<&str> = plan.to_delete.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(deleted, vec!["v1.4.8", "v2.17.0"]);
    }

    #[test]
    fn repeated_plans_are_equal() {
        let store = store();
        let scheme = NamingScheme::default();
        assert_eq!(
            plan(&store, &scheme).unwrap(),
            plan(&store, &scheme).unwrap()
        );
        assert!(store.mutations().is_empty());
    }

    #[test]
    fn custom_scheme() {
        let scheme = NamingScheme::new("release-", "").unwrap();
        let tags = vec!["release-3.0".to_string(), "3.0".to_string()];
        let plan = plan_from_tags(&tags, &scheme);
        assert_eq!(plan.to_rename[0].new_name, "3.0");
        assert_eq!(plan.to_delete.len(), 1);
    }

    #[test]
    fn empty_plan() {
        let plan = plan(&MockTagStore::new(), &NamingScheme::default()).unwrap();
        assert!(plan.is_empty());
    }
}
