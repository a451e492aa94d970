//! Validation utilities for values entering the brewing core
//!
//! Helpers return `Result<(), &'static str>`; callers wrap the message in
//! the matching `EngineError` variant.

use rust_decimal::Decimal;

/// Largest dose the recommendation tables are meant for
pub const MAX_DOSE_GRAMS: i64 = 100;

/// Upper bound for a manually entered hardness (°dH)
pub const MAX_WATER_HARDNESS_DH: i64 = 50;

// ============================================================================
// Brewing Validations
// ============================================================================

/// Validate a coffee dose in grams
pub fn validate_dose(grams: i64) -> Result<(), &'static str> {
    if grams <= 0 {
        return Err("Dose must be a positive number of grams");
    }
    if grams > MAX_DOSE_GRAMS {
        return Err("Dose must be at most 100 grams");
    }
    Ok(())
}

/// Validate a manual water hardness reading, exclusive of zero
pub fn validate_water_hardness(value: Decimal) -> Result<(), &'static str> {
    if value <= Decimal::ZERO {
        return Err("Water hardness must be greater than 0 °dH");
    }
    if value > Decimal::from(MAX_WATER_HARDNESS_DH) {
        return Err("Water hardness must be at most 50 °dH");
    }
    Ok(())
}

/// Validate a German postal code (exactly five digits)
pub fn validate_postal_code(code: &str) -> Result<(), &'static str> {
    if code.len() != 5 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err("Postal code must be exactly 5 digits");
    }
    Ok(())
}

/// Validate the required fields of a manual coffee entry
pub fn validate_manual_entry(name: &str, origin: &str, process: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required");
    }
    if origin.trim().is_empty() {
        return Err("Origin is required");
    }
    if process.trim().is_empty() {
        return Err("Process is required");
    }
    Ok(())
}

// ============================================================================
// Account Validations
// ============================================================================

/// Validate a sync account username (3-32 chars, alphanumeric, `_`, `-`, `.`)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 32 {
        return Err("Username must be at most 32 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err("Username may only contain letters, digits, '_', '-' and '.'");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a device identifier sent by the app
pub fn validate_device_id(device_id: &str) -> Result<(), &'static str> {
    if device_id.trim().is_empty() {
        return Err("Device ID is required");
    }
    if device_id.len() > 128 {
        return Err("Device ID must be at most 128 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dose() {
        assert!(validate_dose(15).is_ok());
        assert!(validate_dose(1).is_ok());
        assert!(validate_dose(100).is_ok());
        assert!(validate_dose(0).is_err());
        assert!(validate_dose(-12).is_err());
        assert!(validate_dose(101).is_err());
    }

    #[test]
    fn test_validate_water_hardness() {
        assert!(validate_water_hardness(Decimal::new(125, 1)).is_ok());
        assert!(validate_water_hardness(Decimal::from(50)).is_ok());
        assert!(validate_water_hardness(Decimal::ZERO).is_err());
        assert!(validate_water_hardness(Decimal::from(-3)).is_err());
        assert!(validate_water_hardness(Decimal::new(501, 1)).is_err());
    }

    #[test]
    fn test_validate_postal_code() {
        assert!(validate_postal_code("10115").is_ok());
        assert!(validate_postal_code("03042").is_ok());
        assert!(validate_postal_code("1011").is_err());
        assert!(validate_postal_code("101155").is_err());
        assert!(validate_postal_code("1O115").is_err());
    }

    #[test]
    fn test_validate_manual_entry() {
        assert!(validate_manual_entry("Kochere", "Ethiopia", "Washed").is_ok());
        assert_eq!(validate_manual_entry(" ", "Ethiopia", "Washed"), Err("Name is required"));
        assert_eq!(validate_manual_entry("Kochere", "", "Washed"), Err("Origin is required"));
        assert_eq!(validate_manual_entry("Kochere", "Ethiopia", ""), Err("Process is required"));
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("barista_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_device_id() {
        assert!(validate_device_id("device-7f3a").is_ok());
        assert!(validate_device_id("").is_err());
        assert!(validate_device_id(&"d".repeat(129)).is_err());
    }
}
