//! Batch identifiers and the placeholder chain hash.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngExt;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const HEX: &[u8] = b"0123456789abcdef";

/// Prefix of every generated batch id.
pub const BATCH_ID_PREFIX: &str = "HERB";

const RANDOM_SUFFIX_LEN: usize = 5;

/// Last timestamp handed out, so ids stay strictly increasing per process.
static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Generate a new batch id: `HERB` + base-36 millis + 5 random base-36 chars.
pub fn generate_batch_id() -> String {
    let millis = next_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{BATCH_ID_PREFIX}{}{suffix}", to_base36(millis))
}

/// Generate the cosmetic "blockchain hash" shown next to a batch.
///
/// This is random filler: it is not derived from the record and nothing
/// verifies or chains it. Do not treat it as an integrity check.
pub fn generate_placeholder_hash() -> String {
    let mut rng = rand::rng();
    let digits: String = (0..64)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect();
    format!("0x{digits}")
}

/// Whether `s` has the shape of a generated batch id.
pub fn is_batch_id(s: &str) -> bool {
    s.strip_prefix(BATCH_ID_PREFIX).is_some_and(|rest| {
        rest.len() > RANDOM_SUFFIX_LEN
            && rest
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
    })
}

fn next_millis() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
    let mut last = LAST_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_MILLIS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
