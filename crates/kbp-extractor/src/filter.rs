//! Relation eligibility by argument types

use kbp_core::{NerTag, RelationType};

/// Whether `relation` should be tried for this subject/object type pair
///
/// Requires rules for the relation, the relation's subject type, and an object
/// type among the relation's valid object types.
pub fn is_eligible(
    relation: &RelationType,
    subject_type: NerTag,
    object_type: NerTag,
    has_rules: bool,
) -> bool {
    has_rules && relation.subject_type() == subject_type && relation.accepts_object(object_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_of() -> RelationType {
        RelationType::from_canonical_name("per:employee_of").unwrap()
    }

    #[test]
    fn test_matching_types_with_rules() {
        assert!(is_eligible(
            &employee_of(),
            NerTag::Person,
            NerTag::Organization,
            true
        ));
    }

    #[test]
    fn test_no_rules_never_eligible() {
        assert!(!is_eligible(
            &employee_of(),
            NerTag::Person,
            NerTag::Organization,
            false
        ));
    }

    #[test]
    fn test_wrong_object_type() {
        assert!(!is_eligible(
            &employee_of(),
            NerTag::Person,
            NerTag::Location,
            true
        ));
    }

    #[test]
    fn test_wrong_subject_type() {
        assert!(!is_eligible(
            &employee_of(),
            NerTag::Organization,
            NerTag::Organization,
            true
        ));
    }
}
