//! Sign-in and registration form checks.
//!
//! Credentials are verified by the external auth provider; this module
//! only gates incomplete forms and translates provider error codes.

use thiserror::Error;

use crate::i18n::Locale;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthValidationError {
    #[error("Email and password are required")]
    MissingLoginFields,

    #[error("All registration fields are required")]
    MissingRegisterFields,

    #[error("Password and confirmation differ")]
    PasswordMismatch,
}

impl AuthValidationError {
    pub fn user_message(&self, locale: Locale) -> &'static str {
        let s = locale.strings();
        match self {
            Self::MissingLoginFields => s.missing_login_fields,
            Self::MissingRegisterFields => s.missing_register_fields,
            Self::PasswordMismatch => s.password_mismatch,
        }
    }
}

/// Registration form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_login_fields(email: &str, password: &str) -> Result<(), AuthValidationError> {
    if blank(email) || password.is_empty() {
        return Err(AuthValidationError::MissingLoginFields);
    }
    Ok(())
}

pub fn validate_register_fields(form: &RegistrationForm) -> Result<(), AuthValidationError> {
    let any_missing = blank(&form.first_name)
        || blank(&form.last_name)
        || blank(&form.email)
        || form.password.is_empty()
        || form.confirm_password.is_empty();
    if any_missing {
        return Err(AuthValidationError::MissingRegisterFields);
    }
    if form.password != form.confirm_password {
        return Err(AuthValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Message for an auth-provider error code such as `auth/wrong-password`.
/// Unknown codes get a generic retry message.
pub fn auth_error_message(code: &str, locale: Locale) -> &'static str {
    let s = locale.strings();
    match code {
        "auth/invalid-email" => s.auth_invalid_email,
        "auth/user-not-found" => s.auth_user_not_found,
        "auth/wrong-password" => s.auth_wrong_password,
        "auth/email-already-in-use" => s.auth_email_in_use,
        _ => s.auth_generic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Layla".into(),
            last_name: "Haddad".into(),
            email: "layla@example.com".into(),
            password: "s3cret!".into(),
            confirm_password: "s3cret!".into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(
            validate_login_fields("", "pw"),
            Err(AuthValidationError::MissingLoginFields)
        );
        assert_eq!(
            validate_login_fields("a@b.c", ""),
            Err(AuthValidationError::MissingLoginFields)
        );
        assert!(validate_login_fields("a@b.c", "pw").is_ok());
    }

    #[test]
    fn registration_complete_form_passes() {
        assert!(validate_register_fields(&form()).is_ok());
    }

    #[test]
    fn registration_missing_field() {
        let mut f = form();
        f.last_name = "  ".into();
        assert_eq!(
            validate_register_fields(&f),
            Err(AuthValidationError::MissingRegisterFields)
        );
    }

    #[test]
    fn registration_checks_missing_before_mismatch() {
        let mut f = form();
        f.confirm_password = String::new();
        assert_eq!(
            validate_register_fields(&f),
            Err(AuthValidationError::MissingRegisterFields)
        );

        f.confirm_password = "other".into();
        assert_eq!(
            validate_register_fields(&f),
            Err(AuthValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn known_codes_map_to_specific_messages() {
        assert_eq!(
            auth_error_message("auth/wrong-password", Locale::En),
            "The password is incorrect."
        );
        assert_eq!(
            auth_error_message("auth/email-already-in-use", Locale::En),
            "This email is already in use."
        );
    }

    #[test]
    fn unknown_code_is_generic() {
        assert_eq!(
            auth_error_message("auth/too-many-requests", Locale::En),
            Locale::En.strings().auth_generic
        );
        assert_eq!(
            auth_error_message("", Locale::Ar),
            Locale::Ar.strings().auth_generic
        );
    }

    #[test]
    fn validation_messages_localized() {
        let en = AuthValidationError::PasswordMismatch.user_message(Locale::En);
        let tr = AuthValidationError::PasswordMismatch.user_message(Locale::Tr);
        assert_ne!(en, tr);
    }
}
