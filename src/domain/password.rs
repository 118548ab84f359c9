use zxcvbn::zxcvbn;

use crate::errors::PasswordError;

const MIN_LENGTH: usize = 8;
const MIN_STRENGTH_SCORE: u8 = 3;

/// Account password policy: length, digit, lower and upper case letters and
/// a non-alphanumeric character.
pub fn check_password_policy(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_LENGTH {
        return Err(PasswordError::TooShort(MIN_LENGTH));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::MissingDigit);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PasswordError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(PasswordError::MissingUppercase);
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        return Err(PasswordError::MissingSymbol);
    }
    Ok(())
}

/// Advisory only: a policy-compliant password can still be guessable.
pub fn weak_password_warning(password: &str) -> Option<String> {
    let estimate = zxcvbn(password, &[]);
    let score = estimate.score() as u8;

    if score >= MIN_STRENGTH_SCORE {
        return None;
    }

    let feedback = estimate.feedback()
        .and_then(|f| f.warning().map(|w| w.to_string()))
        .unwrap_or_else(|| "Password is easy to guess".to_string());

    Some(format!("strength score {score}/4: {feedback}"))
}
