//! Input validation for credentials
//!
//! Lengths are measured in bytes.

/// Shortest accepted login
pub const LOGIN_MIN_LEN: usize = 5;
/// Longest accepted login
pub const LOGIN_MAX_LEN: usize = 100;
/// Shortest accepted password
pub const PASSWORD_MIN_LEN: usize = 5;
/// Longest accepted password
pub const PASSWORD_MAX_LEN: usize = 100;

/// Validate login
pub fn validate_login(login: &str) -> Result<(), String> {
    if login.is_empty() {
        return Err("Login is required".to_string());
    }

    if login.len() < LOGIN_MIN_LEN {
        return Err(format!(
            "Login must be at least {} characters long",
            LOGIN_MIN_LEN
        ));
    }

    if login.len() > LOGIN_MAX_LEN {
        return Err(format!(
            "Login must be at most {} characters long",
            LOGIN_MAX_LEN
        ));
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {} characters long",
            PASSWORD_MIN_LEN
        ));
    }

    if password.len() > PASSWORD_MAX_LEN {
        return Err(format!(
            "Password must be at most {} characters long",
            PASSWORD_MAX_LEN
        ));
    }

    Ok(())
}

/// Credentials presented at sign-up: both fields fully checked
pub fn validate_sign_up(login: &str, password: &str) -> Result<(), String> {
    validate_login(login)?;
    validate_password(password)
}

/// Credentials presented at sign-in: only the lower bounds apply, anything
/// longer simply fails to match a stored record
pub fn validate_sign_in(login: &str, password: &str) -> Result<(), String> {
    if login.len() < LOGIN_MIN_LEN {
        return Err(format!(
            "Login must be at least {} characters long",
            LOGIN_MIN_LEN
        ));
    }

    if password.len() < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {} characters long",
            PASSWORD_MIN_LEN
        ));
    }

    Ok(())
}
