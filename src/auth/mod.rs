pub mod policy;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Role granting use of the cash card endpoints
pub const CARD_OWNER: &str = "CARD-OWNER";
/// Role for authenticated users who hold no cards
pub const NON_OWNER: &str = "NON-OWNER";

/// Hash checked when the username is unknown, so a miss costs the same Argon2
/// work as a wrong password.
static DUMMY_PASSWORD_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"cashcard-dummy-password", &salt)
        .map(|hash| hash.to_string())
        .ok()
});

fn verify_hash(password_hash: &str, password: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Burns one verification against the dummy hash. Never succeeds.
fn verify_unknown_user(password: &str) -> Result<bool, AuthError> {
    match DUMMY_PASSWORD_HASH.as_deref() {
        Some(hash) => verify_hash(hash, password).map(|_| false),
        None => Ok(false),
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("malformed authorization header: {0}")]
    MalformedHeader(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("user lookup failed: {0}")]
    Lookup(String),
}

/// An authenticated caller, attached to the request by the Basic auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: BTreeSet<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// A registered user with a salted Argon2 password hash (PHC string format)
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub username: String,
    pub password_hash: String,
    pub roles: BTreeSet<String>,
}

impl UserAccount {
    /// Create an account, hashing the plaintext password with a fresh salt.
    pub fn new<I, S>(username: impl Into<String>, password: &str, roles: I) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        Ok(Self {
            username: username.into(),
            password_hash,
            roles: roles.into_iter().map(Into::into).collect(),
        })
    }

    fn verify_password(&self, password: &str) -> Result<bool, AuthError> {
        verify_hash(&self.password_hash, password)
    }

    fn principal(&self) -> Principal {
        Principal {
            username: self.username.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Source of user accounts. Swap the in-memory registry for a real credential
/// store without touching handlers.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, AuthError>;
}

/// Fixed user list held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRegistry {
    users: HashMap<String, UserAccount>,
}

impl InMemoryUserRegistry {
    pub fn with_users(users: impl IntoIterator<Item = UserAccount>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// The three demo users: two card owners and one user without the capability.
    pub fn demo() -> Result<Self, AuthError> {
        Ok(Self::with_users([
            UserAccount::new("sarah1", "abc123", [CARD_OWNER])?,
            UserAccount::new("tim-owns-no-cards", "def456", [NON_OWNER])?,
            UserAccount::new("kumar2", "ghi789", [CARD_OWNER])?,
        ]))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserLookup for InMemoryUserRegistry {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, AuthError> {
        Ok(self.users.get(username).cloned())
    }
}

/// Checks username/password pairs against a `UserLookup`
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserLookup>,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserLookup>) -> Self {
        Self { users }
    }

    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let account = self.users.find_by_username(username).await?;

        // Argon2 is deliberately expensive; keep it off the async workers.
        let password = password.to_owned();
        let (account, verified) = tokio::task::spawn_blocking(move || {
            let verified = match &account {
                Some(account) => account.verify_password(&password),
                None => verify_unknown_user(&password),
            };
            (account, verified)
        })
        .await
        .map_err(|e| AuthError::Hash(e.to_string()))?;
        let verified = verified?;

        match account {
            Some(account) if verified => {
                debug!(roles = ?account.roles, "authenticated");
                Ok(account.principal())
            }
            Some(_) => {
                warn!("authentication failed: bad password");
                Err(AuthError::InvalidCredentials)
            }
            None => {
                warn!("authentication failed: unknown user");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
