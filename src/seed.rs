//! Default categories shipped with the application and the hash used to
//! detect when that list changes between releases.

use crate::domain::LedgerKind;

const INCOME_CATEGORIES: &[&str] = &["Salary", "Bonuses", "Gifts", "Passive income"];

const EXPENSE_CATEGORIES: &[&str] = &[
    "Rent",
    "Utilities",
    "Transport",
    "Entertainment",
    "Groceries",
    "Clothing",
    "Health",
    "Education",
    "Gifts",
    "Hobbies",
    "Charity",
    "Sports",
    "Electronics",
];

pub fn default_categories(kind: LedgerKind) -> Vec<String> {
    let source = match kind {
        LedgerKind::Income => INCOME_CATEGORIES,
        LedgerKind::Expense => EXPENSE_CATEGORIES,
    };
    source.iter().map(|name| name.to_string()).collect()
}

/// Order-sensitive, non-cryptographic fingerprint of a category list.
///
/// The list is joined with `", "` and hashed with the 31-multiplier string
/// hash over UTF-16 code units, rendered as signed decimal text. Values
/// persisted by earlier releases stay comparable.
pub fn categories_hash(categories: &[String]) -> String {
    let joined = categories.join(", ");
    let hash = joined
        .encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(categories_hash(&[]), "0");
        assert_eq!(categories_hash(&list(&["a", "b"])), "2933101");
        assert_eq!(
            categories_hash(&default_categories(LedgerKind::Income)),
            "672937558"
        );
        assert_eq!(
            categories_hash(&list(&["Заіірплата", "Бонуси"])),
            "-1076184839"
        );
    }

    #[test]
    fn hash_is_order_sensitive() {
        assert_ne!(
            categories_hash(&list(&["a", "b"])),
            categories_hash(&list(&["b", "a"]))
        );
    }

    #[test]
    fn defaults_are_unique_per_kind() {
        for kind in [LedgerKind::Income, LedgerKind::Expense] {
            let mut names = default_categories(kind);
            let before = names.len();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), before, "duplicate default in {kind}");
        }
    }
}
