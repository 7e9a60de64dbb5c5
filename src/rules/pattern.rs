//! Single-character wildcard matching for rule patterns.
//!
//! A pattern is a sequence of literal segments separated by `*`. Each `*`
//! matches any run of characters, including the empty run; adjacent `*`
//! behave as one. There is no escaping and no other metacharacter.

/// The wildcard token.
pub const WILDCARD: char = '*';

/// Check whether `value` matches the wildcard `pattern`.
///
/// Interior segments are located leftmost-first without backtracking. A
/// pattern without any `*` only matches on exact equality.
pub fn matches(value: &str, pattern: &str) -> bool {
	if !is_wildcard(pattern) {
		return value == pattern;
	}

	let segments: Vec<&str> = pattern.split(WILDCARD).collect();
	let (first, rest) = match segments.split_first() {
		Some(split) => split,
		None => return true,
	};
	let (last, interior) = match rest.split_last() {
		Some(split) => split,
		None => return value == *first,
	};

	if !value.starts_with(first) {
		return false;
	}

	let mut cursor = first.len();
	for segment in interior {
		// Empty segments come from `**`
		if segment.is_empty() {
			continue;
		}
		match value[cursor..].find(segment) {
			Some(offset) => cursor += offset + segment.len(),
			None => return false,
		}
	}

	value.ends_with(last)
}

/// True if the pattern contains at least one `*`.
pub fn is_wildcard(pattern: &str) -> bool {
	pattern.contains(WILDCARD)
}

/// Number of literal (non-`*`) characters in a pattern.
///
/// This is the sort key used to order rules within an index tier.
pub fn literal_len(pattern: &str) -> usize {
	pattern.chars().filter(|&c| c != WILDCARD).count()
}
