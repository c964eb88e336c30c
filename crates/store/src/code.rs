use runo_core::RngState;

const CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const CODE_LENGTH: usize = 8;

/// An 8-character alphanumeric room code. Uniqueness is the store's
/// business; callers retry on a collision.
pub fn generate_code(rng: &mut RngState) -> String {
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.pick_index(CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_eight_alphanumerics() {
        let mut rng = RngState::from_seed(5);
        for _ in 0..100 {
            let code = generate_code(&mut rng);
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }
}
