//! Storage-key codec.
//!
//! A storage key is `<uploadTimestampMillis>_<originalFileName>`. The
//! timestamp prefix makes keys unique per upload instant; only the first
//! delimiter is structurally significant, so names that themselves contain
//! the delimiter survive the round trip.

/// Separates the timestamp prefix from the original file name.
pub const KEY_DELIMITER: char = '_';

/// Build a storage key from an upload instant (milliseconds since the Unix
/// epoch) and the original file name.
pub fn build_storage_key(timestamp_millis: i64, name: &str) -> String {
    format!("{}{}{}", timestamp_millis, KEY_DELIMITER, name)
}

/// Recover the display name from a storage key by stripping everything up to
/// and including the first delimiter.
///
/// A key that carries no delimiter is returned unchanged rather than mapped
/// to an empty name.
pub fn recover_display_name(key: &str) -> &str {
    match key.split_once(KEY_DELIMITER) {
        Some((_, name)) => name,
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn builds_timestamp_prefixed_key() {
        assert_eq!(
            build_storage_key(1_700_000_000_000, "resume.pdf"),
            "1700000000000_resume.pdf"
        );
    }

    #[test]
    fn recovers_name_past_first_delimiter_only() {
        assert_eq!(
            recover_display_name("1700000000000_my_resume_v2.pdf"),
            "my_resume_v2.pdf"
        );
    }

    #[test]
    fn key_without_delimiter_recovers_as_itself() {
        assert_eq!(recover_display_name("resume.pdf"), "resume.pdf");
    }

    #[test]
    fn distinct_names_at_same_instant_yield_distinct_keys() {
        let a = build_storage_key(1_700_000_000_000, "resume.pdf");
        let b = build_storage_key(1_700_000_000_000, "cover-letter.pdf");
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn round_trip_recovers_original_name(
            name in "[A-Za-z0-9 ._-]{1,48}",
            ts in 0i64..=4_102_444_800_000i64,
        ) {
            let key = build_storage_key(ts, &name);
            prop_assert_eq!(recover_display_name(&key), name.as_str());
        }
    }
}
