//! Id generation and name normalization helpers

/// Epoch for generated ids: 2024-01-01 00:00:00 UTC.
const ID_EPOCH_MS: i64 = 1_704_067_200_000;

/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an event id: 41 bits of milliseconds since [`ID_EPOCH_MS`]
/// followed by 12 random bits. The result stays within 53 bits so the id
/// survives a round trip through a JSON number.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    let elapsed = (now_millis() - ID_EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let entropy: i64 = rand::thread_rng().gen_range(0..0x1000);
    (elapsed << 12) | entropy
}

/// Canonical form of a custom item name used for merge matching:
/// whitespace-trimmed and lowercased, so "  Extra Cheese " and "extra cheese"
/// accumulate into one order line.
pub fn normalize_item_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_fits_in_a_json_number() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id <= 0x1F_FFFF_FFFF_FFFF); // 2^53 - 1
    }

    #[test]
    fn test_normalize_item_name() {
        assert_eq!(normalize_item_name("  Extra Cheese "), "extra cheese");
        assert_eq!(normalize_item_name("GARLIC BREAD"), "garlic bread");
        assert_eq!(normalize_item_name("tiramisu"), "tiramisu");
    }
}
