//! Uniform random strings drawn from the platform CSPRNG.
//!
//! Indices are sampled from 32-bit words with rejection sampling so every
//! alphabet character is equally likely regardless of the alphabet size.

/// Number of random words requested from the OS per refill.
const WORDS_PER_FILL: usize = 16;

/// Returns a string of `length` characters drawn uniformly from `alphabet`.
///
/// The caller guarantees `alphabet` is non-empty.
///
/// # Errors
///
/// Returns the underlying [`getrandom::Error`] if the platform CSPRNG is
/// unavailable.
pub(crate) fn random_string(length: usize, alphabet: &[char]) -> Result<String, getrandom::Error> {
    let n = u32::try_from(alphabet.len()).unwrap_or(u32::MAX);
    if n == 0 {
        return Ok(String::new());
    }
    // Largest multiple of n that fits in u32; words at or above it are
    // rejected to keep the distribution flat.
    let zone = u32::MAX - (u32::MAX % n);

    let mut out = String::with_capacity(length);
    let mut buf = [0u8; WORDS_PER_FILL * 4];
    let mut pos = buf.len();

    let mut produced = 0;
    while produced < length {
        if pos == buf.len() {
            getrandom::getrandom(&mut buf)?;
            pos = 0;
        }
        let word = u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]);
        pos += 4;
        if word >= zone {
            continue;
        }
        if let Some(&c) = alphabet.get((word % n) as usize) {
            out.push(c);
            produced += 1;
        }
    }
    Ok(out)
}
