//! Audience ID allocation
//!
//! IDs are `<type prefix><9 digits>`. The digits come from a SHA-256 of the
//! type and the normalized name, so they are stable across restarts and
//! never carry a sign.

use crate::error::{conflict_error, AppError};
use crate::models::AudienceType;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

const DIGITS_MODULUS: u64 = 1_000_000_000;

pub struct AudienceIdAllocator;

impl AudienceIdAllocator {
    /// Trim, lowercase and collapse internal whitespace
    pub fn normalize_name(name: &str) -> String {
        WHITESPACE
            .replace_all(name.trim(), " ")
            .to_lowercase()
    }

    /// Nine-digit suffix derived from the type and name
    pub fn suffix(audience_type: AudienceType, name: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(audience_type.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(Self::normalize_name(name).as_bytes());
        let digest = hasher.finalize();

        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        format!("{:09}", u64::from_be_bytes(head) % DIGITS_MODULUS)
    }

    /// Full audience ID, prefixed with the type letter
    pub fn allocate(audience_type: AudienceType, name: &str) -> String {
        format!("{}{}", audience_type.prefix(), Self::suffix(audience_type, name))
    }

    /// Reject an ID that is already persisted
    pub fn ensure_unique(id: &str, existing: &HashSet<String>) -> Result<(), AppError> {
        if existing.contains(id) {
            return Err(conflict_error(format!(
                "Audience ID {} already exists; choose a different name",
                id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_deterministic() {
        let first = AudienceIdAllocator::allocate(AudienceType::Audience, "Spring buyers");
        let second = AudienceIdAllocator::allocate(AudienceType::Audience, "Spring buyers");
        assert_eq!(first, second);
    }

    #[test]
    fn test_allocate_shape() {
        for audience_type in AudienceType::ALL {
            let id = AudienceIdAllocator::allocate(audience_type, "N1");
            assert_eq!(id.len(), 10);
            assert!(id.starts_with(audience_type.prefix()));
            assert!(id[1..].chars().all(|c| c.is_ascii_digit()), "{}", id);
        }
    }

    #[test]
    fn test_normalization_makes_spelling_variants_collide() {
        assert_eq!(
            AudienceIdAllocator::allocate(AudienceType::Audience, "  Spring   Buyers "),
            AudienceIdAllocator::allocate(AudienceType::Audience, "spring buyers"),
        );
    }

    #[test]
    fn test_type_participates_in_digits() {
        let audience = AudienceIdAllocator::suffix(AudienceType::Audience, "N1");
        let suppression = AudienceIdAllocator::suffix(AudienceType::SuppressionList, "N1");
        assert_ne!(audience, suppression);
    }

    #[test]
    fn test_ensure_unique() {
        let id = AudienceIdAllocator::allocate(AudienceType::Audience, "N1");
        let mut existing = HashSet::new();
        assert!(AudienceIdAllocator::ensure_unique(&id, &existing).is_ok());

        existing.insert(id.clone());
        let err = AudienceIdAllocator::ensure_unique(&id, &existing).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
