//! Argon2 hashing for the shared access codes.
//!
//! Codes are hashed once at startup (or supplied pre-hashed) and every login
//! attempt is verified against those hashes.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use academy_core::ports::{AuthError, PasswordService};

pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Argon2id with an explicit memory cost (KiB) and iteration count.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Cost from `ACCESS_CODE_MEMORY_KIB` and `ACCESS_CODE_ITERATIONS`,
    /// Argon2 defaults otherwise.
    pub fn from_env() -> Result<Self, AuthError> {
        let memory_kib = env_u32("ACCESS_CODE_MEMORY_KIB").unwrap_or(Params::DEFAULT_M_COST);
        let iterations = env_u32("ACCESS_CODE_ITERATIONS").unwrap_or(Params::DEFAULT_T_COST);
        Self::with_cost(memory_kib, iterations)
    }

    /// Reject a configured hash that no login could ever be verified against.
    pub fn check_hash(&self, hash: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;
        Algorithm::new(parsed.algorithm.as_str())
            .map(|_| ())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, code: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(code.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    // The parameters embedded in the hash win over this service's cost.
    fn verify(&self, code: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self.argon2.verify_password(code.as_bytes(), &parsed).is_ok())
    }
}
