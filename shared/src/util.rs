/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at shop scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Generate an opaque kanban card token.
///
/// Format: 8 lowercase alphanumerics, a dash, then a numeric suffix.
/// The token is printed inside the card's QR code, so it has to be
/// short enough to scan reliably from a shop-floor terminal.
pub fn kanban_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let head: String = (0..8)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    let tail: u32 = rng.gen_range(0..10_000_000);
    format!("{head}-{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_are_positive_and_distinct() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        // Same millisecond collisions are possible but vanishingly rare
        // with 12 random bits; distinctness over two draws is expected.
        assert_ne!(a, b);
    }

    #[test]
    fn kanban_token_shape() {
        let token = kanban_token();
        let (head, tail) = token.split_once('-').expect("token has a dash");
        assert_eq!(head.len(), 8);
        assert!(head.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert!(tail.parse::<u32>().is_ok());
    }
}
