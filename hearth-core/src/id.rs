use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 9;
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate an offer identifier: `OFF-<epoch-millis>-<9-char-uppercase-alphanumeric>`.
///
/// Pure apart from the clock and RNG. Uniqueness is enforced by the store;
/// on a uniqueness conflict the caller generates a fresh token and retries.
pub fn generate_offer_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_ALPHABET.len());
            SUFFIX_ALPHABET[idx] as char
        })
        .collect();
    format!("OFF-{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// Check the persisted identifier format: `OFF-<13-digit-epoch-ms>-<9-char-uppercase-alphanumeric>`.
/// Existing stored records depend on this shape, so it is fixed.
pub fn is_valid_offer_id(id: &str) -> bool {
    let mut parts = id.splitn(3, '-');
    let (Some(prefix), Some(millis), Some(suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == "OFF"
        && millis.len() == 13
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == SUFFIX_LEN
        && suffix
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
