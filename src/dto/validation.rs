//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a player display name has visible characters.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Ana")   // Ok
/// validate_player_name("   ")   // Err - blank
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must not be blank".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("Ana").is_ok());
        assert!(validate_player_name("José María").is_ok());
    }

    #[test]
    fn test_validate_player_name_blank() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_player_name_long() {
        assert!(validate_player_name("Maria Fernanda de los Angeles Gutierrez Lopez").is_ok());
        assert!(validate_player_name(&"x".repeat(200)).is_ok());
    }
}
