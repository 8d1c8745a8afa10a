use crate::error::AppError;
use actix_web::web;
use bcrypt::{hash, verify};

/// Hashes a password with bcrypt. The salt is generated per call and stored in the hash.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks a password against a stored bcrypt hash.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}

/// Runs [`hash_password`] on actix's blocking thread pool.
pub async fn hash_password_blocking(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_owned();
    web::block(move || hash_password(&password, cost)).await?
}

/// Runs [`verify_password`] on actix's blocking thread pool.
pub async fn verify_password_blocking(
    password: &str,
    hashed_password: &str,
) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hashed_password = hashed_password.to_owned();
    web::block(move || verify_password(&password, &hashed_password)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password, TEST_COST).unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let first = hash_password("secret1", TEST_COST).unwrap();
        let second = hash_password("secret1", TEST_COST).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match verify_password("test_password123", "invalidhashformat") {
            Err(AppError::InternalServerError(msg)) => {
                assert!(msg.contains("Failed to verify password"));
            }
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    #[actix_rt::test]
    async fn test_blocking_variants_agree() {
        let hashed = hash_password_blocking("secret1", TEST_COST).await.unwrap();
        assert!(verify_password("secret1", &hashed).unwrap());
        assert!(verify_password_blocking("secret1", &hashed).await.unwrap());
        assert!(!verify_password_blocking("secret2", &hashed).await.unwrap());
    }
}
