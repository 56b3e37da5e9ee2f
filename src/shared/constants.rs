/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Regular user - submits and tracks own suggestions
pub const ROLE_USER: &str = "user";

/// Administrator - sees, edits and assigns every suggestion
pub const ROLE_ADMIN: &str = "admin";

/// Shown in place of an empty assignee
pub const UNASSIGNED_PLACEHOLDER: &str = "Unassigned";

pub const TITLE_MAX_LENGTH: u64 = 200;
pub const DESCRIPTION_MAX_LENGTH: u64 = 5000;
pub const MIN_PASSWORD_LENGTH: u64 = 6;
