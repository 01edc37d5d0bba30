use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 12;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    TooShort,
    #[error("Password must contain an upper-case letter")]
    MissingUppercase,
    #[error("Password must contain a lower-case letter")]
    MissingLowercase,
    #[error("Password must contain a digit")]
    MissingDigit,
    #[error("Password must contain a symbol")]
    MissingSymbol,
}

/// Reports the first rule the password breaks, checked in declaration order.
pub fn validate_password(password: &str) -> Result<(), PasswordPolicyError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(PasswordPolicyError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordPolicyError::MissingDigit);
    }
    if !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        return Err(PasswordPolicyError::MissingSymbol);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_strong_password() {
        assert_eq!(validate_password("Correct-Horse-42"), Ok(()));
        assert_eq!(validate_password("Überlänge#2024x"), Ok(()));
    }

    #[test]
    fn names_the_violated_rule() {
        assert_eq!(validate_password("Sh0rt!"), Err(PasswordPolicyError::TooShort));
        assert_eq!(validate_password("no-upper-case-42"), Err(PasswordPolicyError::MissingUppercase));
        assert_eq!(validate_password("NO-LOWER-CASE-42"), Err(PasswordPolicyError::MissingLowercase));
        assert_eq!(validate_password("No-Digits-Here!"), Err(PasswordPolicyError::MissingDigit));
        assert_eq!(validate_password("NoSymbolsHere42"), Err(PasswordPolicyError::MissingSymbol));
    }
}
