//! Argon2 password hashing.
//!
//! Hashes are stored as PHC strings. A stored value starting with
//! [`UNUSABLE_PASSWORD_PREFIX`] marks an account that cannot log in with a
//! password; verification against it always fails without touching Argon2.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use yatube_core::ports::{AuthError, PasswordService};

pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordConfig {
    /// Load cost parameters from `PASSWORD_HASH_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, default: u32| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };
        Self {
            memory_kib: var("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib),
            iterations: var("PASSWORD_HASH_ITERATIONS", defaults.iterations),
            parallelism: var("PASSWORD_HASH_PARALLELISM", defaults.parallelism),
        }
    }

    /// Cheapest parameters Argon2 accepts; for tests only.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST.max(8),
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Argon2id password service.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    pub fn with_config(config: PasswordConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Stored value for an account without a usable password.
    pub fn unusable_hash() -> String {
        UNUSABLE_PASSWORD_PREFIX.to_string()
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        if hash.starts_with(UNUSABLE_PASSWORD_PREFIX) {
            return Ok(false);
        }

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        // Parameters come from the stored hash, so changing the configured
        // cost keeps old hashes verifiable.
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
