use rand::Rng;

/// The 62-character alphanumeric alphabet codes are drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const CODE_MIN_LEN: usize = 6;
pub const CODE_MAX_LEN: usize = 8;

/// Draw one candidate code: a uniform length in [6, 8], each position a
/// uniform draw from the alphabet. Uniqueness is the caller's problem.
///
/// `ThreadRng` is a CSPRNG, so codes cannot be predicted from earlier ones.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let length = rng.random_range(CODE_MIN_LEN..=CODE_MAX_LEN);

    (0..length)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
