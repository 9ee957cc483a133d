//! Short display labels derived from backend names

/// Names with more than this many words get truncated
pub const PROMO_WORD_LIMIT: usize = 5;
/// Words kept from a truncated name
pub const PROMO_KEPT_WORDS: usize = 3;

/// Truncate a promo name to its first three words plus "..." when it has
/// more than five words. Words are split on single spaces only.
pub fn truncate_promo_name(name: &str) -> String {
    let words: Vec<&str> = name.split(' ').collect();
    if words.len() > PROMO_WORD_LIMIT {
        format!("{}...", words[..PROMO_KEPT_WORDS].join(" "))
    } else {
        name.to_string()
    }
}

/// First two words of a full name, used for the greeting
pub fn short_name(full_name: &str) -> String {
    full_name.split(' ').take(2).collect::<Vec<_>>().join(" ")
}
