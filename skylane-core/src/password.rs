use crate::{CoreError, CoreResult};

/// One-way transform applied to every plaintext secret before it is
/// persisted. Bcrypt embeds a per-record salt in the hash itself.
pub fn hash(plaintext: &str) -> CoreResult<String> {
    bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
        .map_err(|e| CoreError::PasswordError(e.to_string()))
}

pub fn verify(plaintext: &str, hashed: &str) -> bool {
    bcrypt::verify(plaintext, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hashed = hash("pw").unwrap();
        assert_ne!(hashed, "pw");
        assert!(verify("pw", &hashed));
        assert!(!verify("other", &hashed));
    }

    #[test]
    fn two_hashes_of_the_same_secret_differ() {
        // Per-record salt: equal inputs must not produce equal hashes.
        let a = hash("pw").unwrap();
        let b = hash("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_tolerates_garbage_hashes() {
        assert!(!verify("pw", "not-a-bcrypt-hash"));
    }
}
