use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque identifier of the form `{prefix}_{9 base36 chars}`.
pub fn generate_id<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    format!("{}_{}", prefix, random_base36(rng, 9))
}

pub fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
