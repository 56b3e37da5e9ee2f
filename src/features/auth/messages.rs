//! User-facing messages for authentication failures.

pub const INCORRECT_CREDENTIALS: &str = "Incorrect email or password entered.";
pub const EMAIL_IN_USE: &str = "That email is already in use. Please use a different email or sign in.";
pub const WEAK_PASSWORD: &str = "Password is too weak. It should be at least 6 characters long.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const ACCOUNT_DISABLED: &str = "This user account has been disabled.";
pub const TOO_MANY_ATTEMPTS: &str = "Access temporarily disabled due to too many failed login attempts. You can reset your password or try again later.";
pub const INVALID_RESET_CODE: &str = "The verification code is invalid or has expired.";
pub const ADMIN_REQUIRED: &str = "Admin access required";
