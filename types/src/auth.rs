use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Identity provider failure, classified from the provider's string code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthErrorCode {
    InvalidCredential,
    UserNotFound,
    InvalidEmail,
    EmailInUse,
    WeakPassword,
    Other(String),
}

impl AuthErrorCode {
    /// Accepts both REST style (`EMAIL_EXISTS`, `WEAK_PASSWORD : ...`) and
    /// SDK style (`auth/email-already-in-use`) codes.
    pub fn parse(raw: &str) -> Self {
        let code = raw
            .split(" : ")
            .next()
            .unwrap_or(raw)
            .trim()
            .trim_start_matches("auth/");

        match code {
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "invalid-credential"
            | "wrong-password" => AuthErrorCode::InvalidCredential,
            "EMAIL_NOT_FOUND" | "user-not-found" => AuthErrorCode::UserNotFound,
            "INVALID_EMAIL" | "invalid-email" => AuthErrorCode::InvalidEmail,
            "EMAIL_EXISTS" | "email-already-in-use" => AuthErrorCode::EmailInUse,
            "WEAK_PASSWORD" | "weak-password" => AuthErrorCode::WeakPassword,
            _ => AuthErrorCode::Other(raw.to_string()),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AuthErrorCode::InvalidCredential => "Incorrect email or password.".into(),
            AuthErrorCode::UserNotFound => "No account exists for this email.".into(),
            AuthErrorCode::InvalidEmail => "Invalid email address.".into(),
            AuthErrorCode::EmailInUse => "An account with this email already exists.".into(),
            AuthErrorCode::WeakPassword => "The password is too weak.".into(),
            AuthErrorCode::Other(raw) => raw.clone(),
        }
    }
}

impl std::fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

/// Checks done before a sign-up request is sent.
pub fn validate_registration(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password != confirm {
        return Err("Passwords do not match.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rest_codes() {
        assert_eq!(
            AuthErrorCode::parse("INVALID_LOGIN_CREDENTIALS"),
            AuthErrorCode::InvalidCredential
        );
        assert_eq!(
            AuthErrorCode::parse("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthErrorCode::WeakPassword
        );
        assert_eq!(AuthErrorCode::parse("EMAIL_EXISTS"), AuthErrorCode::EmailInUse);
    }

    #[test]
    fn test_parse_sdk_codes() {
        assert_eq!(
            AuthErrorCode::parse("auth/user-not-found"),
            AuthErrorCode::UserNotFound
        );
        assert_eq!(
            AuthErrorCode::parse("auth/invalid-email"),
            AuthErrorCode::InvalidEmail
        );
    }

    #[test]
    fn test_unmapped_code_keeps_raw_message() {
        let code = AuthErrorCode::parse("TOO_MANY_ATTEMPTS_TRY_LATER");
        assert_eq!(code.user_message(), "TOO_MANY_ATTEMPTS_TRY_LATER");
    }

    #[test]
    fn test_registration_validation() {
        assert_eq!(
            validate_registration("secret1", "secret2"),
            Err("Passwords do not match.")
        );
        assert_eq!(
            validate_registration("abc", "abc"),
            Err("Password must be at least 6 characters.")
        );
        assert_eq!(validate_registration("secret", "secret"), Ok(()));
    }
}
