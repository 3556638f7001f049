use crate::models::auth::NewUser;
use anyhow::{bail, Result};

pub const MAX_NAME_LEN: usize = 100;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Loose `local@domain.tld` shape check. Deliverability is not our concern.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.ends_with('.'),
        None => false,
    }
}

/// Validates signup fields. All problems are reported together,
/// separated by `". "`.
pub fn validate_new_user(user: &NewUser) -> Result<()> {
    let mut problems: Vec<String> = Vec::new();

    let name = user.name.trim();
    if name.is_empty() {
        problems.push("Please tell us your name".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        problems.push(format!("Name must be at most {} characters", MAX_NAME_LEN));
    }

    let email = normalize_email(&user.email);
    if email.is_empty() {
        problems.push("Please provide your email".to_string());
    } else if !is_valid_email(&email) {
        problems.push("Please provide a valid email".to_string());
    }

    if user.password.is_empty() {
        problems.push("Please provide a password".to_string());
    } else if user.password.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
    }

    if user.password_confirm.is_empty() {
        problems.push("Please confirm your password".to_string());
    } else if user.password_confirm != user.password {
        problems.push("Passwords are not the same!".to_string());
    }

    if !problems.is_empty() {
        bail!("{}", problems.join(". "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> NewUser {
        NewUser {
            name: "Ada Lovelace".to_string(),
            email: "Ada@Example.com".to_string(),
            password: "analytical-engine".to_string(),
            password_confirm: "analytical-engine".to_string(),
        }
    }

    #[test]
    fn test_validate_valid_user() {
        assert!(validate_new_user(&valid_user()).is_ok());
    }

    #[test]
    fn test_validate_missing_name() {
        let mut user = valid_user();
        user.name = "   ".to_string();
        let err = validate_new_user(&user).unwrap_err().to_string();
        assert!(err.contains("name"), "got: {err}");
    }

    #[test]
    fn test_validate_name_too_long() {
        let mut user = valid_user();
        user.name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_new_user(&user).is_err());
    }

    #[test]
    fn test_validate_invalid_email() {
        let mut user = valid_user();
        user.email = "not-an-email".to_string();
        let err = validate_new_user(&user).unwrap_err().to_string();
        assert!(err.contains("valid email"), "got: {err}");
    }

    #[test]
    fn test_validate_short_password() {
        let mut user = valid_user();
        user.password = "short".to_string();
        user.password_confirm = "short".to_string();
        let err = validate_new_user(&user).unwrap_err().to_string();
        assert!(err.contains("at least 8"), "got: {err}");
    }

    #[test]
    fn test_validate_password_mismatch() {
        let mut user = valid_user();
        user.password_confirm = "different-password".to_string();
        let err = validate_new_user(&user).unwrap_err().to_string();
        assert!(err.contains("Passwords are not the same!"), "got: {err}");
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let err = validate_new_user(&NewUser::default())
            .unwrap_err()
            .to_string();
        assert!(err.contains("name"));
        assert!(err.contains("email"));
        assert!(err.contains("password"));
        assert!(err.contains("confirm"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("ada@localhost"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada lovelace@example.com"));
        assert!(!is_valid_email("ada@example."));
    }
}
