//! Argon2id password hashing and verification.
//!
//! Hashes are stored as PHC strings, so the salt and cost parameters travel
//! with the hash and verification works across cost changes. Digest
//! comparison is constant-time inside `password-hash`.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// Cheapest parameters argon2 accepts. Tests and benches only.
    pub fn minimal() -> Self {
        Self { memory_kib: 8, iterations: 1, parallelism: 1 }
    }

    fn hasher(&self) -> Result<Argon2<'static>, argon2::Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str, cost: HashCost) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let hasher = cost.hasher().map_err(|e| e.to_string())?;
    let hash = hasher
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC hash.
///
/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed = PasswordHash::new(hash).map_err(|e| e.to_string())?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct-horse", HashCost::minimal()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = hash_password("real-password", HashCost::minimal()).unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("pass", HashCost::minimal()).unwrap();
        let b = hash_password("pass", HashCost::minimal()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn cost_parameters_are_recorded_in_hash() {
        let cost = HashCost { memory_kib: 16, iterations: 3, parallelism: 1 };
        let hash = hash_password("pass", cost).unwrap();
        assert!(hash.contains("m=16,t=3,p=1"), "{}", hash);
        assert!(verify_password("pass", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("pass", "not-a-phc-string").is_err());
    }

    #[test]
    fn invalid_cost_is_rejected() {
        let cost = HashCost { memory_kib: 1, iterations: 0, parallelism: 1 };
        assert!(hash_password("pass", cost).is_err());
    }
}
