//! Suggestion administration.
//!
//! | Method | Path | Purpose |
//! |---|---|---|
//! | GET | /api/admin/suggestions | filtered, sorted, paginated list |
//! | GET | /api/admin/suggestions/status-counts | per-status tally |
//! | GET | /api/admin/suggestions/{id} | single suggestion |
//! | PATCH | /api/admin/suggestions/{id} | edit fields or status |
//! | PUT | /api/admin/suggestions/{id}/assignee | set or clear the assignee |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
