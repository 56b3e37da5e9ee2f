//! In-memory fakes and auth shortcuts shared by unit tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::{IdentityProvider, IdentityUser};
use crate::features::auth::messages::EMAIL_IN_USE;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::{IssuedTokens, TokenIssuer};
use crate::features::files::models::{File, NewFile};
use crate::features::files::repositories::FileRepository;
use crate::features::suggestions::models::{
    NewSuggestion, Suggestion, SuggestionChanges, SuggestionStatus,
};
use crate::features::suggestions::repositories::{
    SuggestionFilter, SuggestionRepository, SuggestionSort, SuggestionSortField,
};
use crate::features::users::models::{Role, UserProfile};
use crate::features::users::repositories::UserRepository;
use crate::modules::llm::LlmProvider;
use crate::modules::storage::ObjectStorage;
use crate::shared::types::SortDirection;

pub const ADMIN_SUB: &str = "test-admin-sub";
pub const USER_SUB: &str = "test-user-sub";

pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: ADMIN_SUB.to_string(),
        session_uid: Some("test-session-uid".to_string()),
        role: Role::Admin,
    }
}

pub fn create_regular_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: USER_SUB.to_string(),
        session_uid: None,
        role: Role::User,
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

async fn inject_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_regular_user());
    next.run(request).await
}

pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

pub fn with_user_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_user_middleware))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryUserRepository {
    profiles: Mutex<HashMap<String, UserProfile>>,
    fail: bool,
}

impl InMemoryUserRepository {
    /// Every call fails with a database error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn insert_role(&self, user_id: &str, role: Role) {
        let now = Utc::now();
        self.profiles.lock().unwrap().insert(
            user_id.to_string(),
            UserProfile {
                id: user_id.to_string(),
                name: None,
                email: None,
                role,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        self.profiles.lock().unwrap().get(user_id).map(|p| p.role)
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_role(&self, user_id: &str) -> Result<Option<Role>> {
        self.check()?;
        Ok(self.role_of(user_id))
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.check()?;
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn upsert_profile(
        &self,
        user_id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserProfile> {
        self.check()?;
        let now = Utc::now();
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile {
                id: user_id.to_string(),
                name: None,
                email: None,
                role: Role::User,
                created_at: now,
                updated_at: now,
            });
        if let Some(name) = name {
            profile.name = Some(name.to_string());
        }
        if let Some(email) = email {
            profile.email = Some(email.to_string());
        }
        profile.updated_at = now;
        Ok(profile.clone())
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<UserProfile> {
        self.check()?;
        if self.role_of(user_id).is_none() {
            self.insert_role(user_id, role);
        }
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| AppError::Internal("profile vanished".to_string()))?;
        profile.role = role;
        Ok(profile.clone())
    }
}

// ---------------------------------------------------------------------------
// Identity provider and tokens
// ---------------------------------------------------------------------------

struct FakeAccount {
    user: IdentityUser,
    password: String,
}

#[derive(Default)]
pub struct FakeIdentityProvider {
    accounts: Mutex<Vec<FakeAccount>>,
    reset_codes_sent: Mutex<Vec<String>>,
}

impl FakeIdentityProvider {
    /// The only reset code the fake accepts
    pub const VALID_CODE: &'static str = "123456";

    pub fn add_account(&self, email: &str, password: &str, suspended: bool) -> IdentityUser {
        let mut accounts = self.accounts.lock().unwrap();
        let user = IdentityUser {
            id: format!("user-{}", accounts.len() + 1),
            name: None,
            email: Some(email.to_string()),
            is_suspended: suspended,
        };
        accounts.push(FakeAccount {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    pub fn reset_codes_sent(&self) -> Vec<String> {
        self.reset_codes_sent.lock().unwrap().clone()
    }

    pub fn password_matches(&self, user_id: &str, password: &str) -> bool {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.user.id == user_id && a.password == password)
    }

    fn find(&self, email: &str) -> Option<IdentityUser> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| {
                a.user
                    .email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .map(|a| a.user.clone())
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<IdentityUser> {
        if self.find(email).is_some() {
            return Err(AppError::Conflict(EMAIL_IN_USE.to_string()));
        }
        let mut user = self.add_account(email, password, false);
        user.name = name.map(String::from);
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<IdentityUser>> {
        Ok(self.find(email))
    }

    async fn verify_password(&self, user_id: &str, password: &str) -> Result<bool> {
        Ok(self.password_matches(user_id, password))
    }

    async fn send_reset_code(&self, email: &str) -> Result<()> {
        self.reset_codes_sent
            .lock()
            .unwrap()
            .push(email.to_string());
        Ok(())
    }

    async fn verify_reset_code(&self, _email: &str, code: &str) -> Result<bool> {
        Ok(code == Self::VALID_CODE)
    }

    async fn update_password(&self, user_id: &str, password: &str) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.user.id == user_id)
            .ok_or_else(|| AppError::NotFound("account".to_string()))?;
        account.password = password.to_string();
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTokenIssuer {
    issued: AtomicUsize,
    revoked: Mutex<Vec<String>>,
    fail_revocation: AtomicBool,
}

impl FakeTokenIssuer {
    pub fn issued_count(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }

    pub fn fail_revocation(&self) {
        self.fail_revocation.store(true, Ordering::SeqCst);
    }

    fn tokens(user_id: &str) -> IssuedTokens {
        IssuedTokens {
            access_token: format!("access-{}", user_id),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            refresh_token: Some(format!("refresh-{}", user_id)),
        }
    }
}

#[async_trait]
impl TokenIssuer for FakeTokenIssuer {
    async fn issue(&self, user_id: &str) -> Result<IssuedTokens> {
        self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(Self::tokens(user_id))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens> {
        refresh_token
            .strip_prefix("refresh-")
            .map(Self::tokens)
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired refresh token".to_string()))
    }

    async fn revoke(&self, refresh_token: &str) -> Result<()> {
        self.revoked
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        if self.fail_revocation.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError("revocation down".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Files and storage
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryFileRepository {
    files: Mutex<Vec<File>>,
}

impl InMemoryFileRepository {
    pub fn is_active(&self, id: Uuid) -> bool {
        self.files
            .lock()
            .unwrap()
            .iter()
            .any(|f| f.id == id && f.is_active)
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn create(&self, file: NewFile) -> Result<File> {
        let now = Utc::now();
        let file = File {
            id: Uuid::new_v4(),
            file_key: file.file_key,
            original_filename: file.original_filename,
            content_type: file.content_type,
            file_size: file.file_size,
            url: file.url,
            uploaded_by: file.uploaded_by,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.files.lock().unwrap().push(file.clone());
        Ok(file)
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<File>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id && f.is_active)
            .cloned())
    }

    async fn find_active_by_url(&self, url: &str) -> Result<Option<File>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.url == url && f.is_active)
            .cloned())
    }

    async fn deactivate(&self, id: Uuid) -> Result<()> {
        if let Some(file) = self.files.lock().unwrap().iter_mut().find(|f| f.id == id) {
            file.is_active = false;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryObjectStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStorage {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    fn key_prefix(&self) -> &str {
        "public"
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(format!("http://storage.test/bucket/{}", key))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemorySuggestionRepository {
    suggestions: Mutex<Vec<Suggestion>>,
    create_calls: AtomicUsize,
}

impl InMemorySuggestionRepository {
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn set_status(&self, id: Uuid, status: SuggestionStatus) {
        if let Some(s) = self.suggestions.lock().unwrap().iter_mut().find(|s| s.id == id) {
            s.status = status;
        }
    }

    fn matches(filter: &SuggestionFilter, s: &Suggestion) -> bool {
        let search = filter
            .search
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        filter.status.map_or(true, |st| st == s.status)
            && filter.category.map_or(true, |c| c == s.category)
            && filter.user_id.as_deref().map_or(true, |u| u == s.user_id)
            && search.map_or(true, |t| {
                s.title.to_lowercase().contains(&t) || s.description.to_lowercase().contains(&t)
            })
            && filter.date_from.map_or(true, |d| s.date >= d)
            && filter.date_before.map_or(true, |d| s.date < d)
    }
}

#[async_trait]
impl SuggestionRepository for InMemorySuggestionRepository {
    async fn create(&self, s: NewSuggestion) -> Result<Suggestion> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let suggestion = Suggestion {
            id: Uuid::new_v4(),
            user_id: s.user_id,
            title: s.title,
            category: s.category,
            description: s.description,
            status: s.status,
            date: now,
            assigned_to: None,
            attachment_file_id: s.attachment_file_id,
            attachment_name: s.attachment_name,
            attachment_url: s.attachment_url,
            updated_at: now,
        };
        self.suggestions.lock().unwrap().push(suggestion.clone());
        Ok(suggestion)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Suggestion>> {
        Ok(self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Suggestion>> {
        // Reverse insertion order first so equal timestamps stay newest-first
        let mut items: Vec<Suggestion> = self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(items)
    }

    async fn list(
        &self,
        filter: &SuggestionFilter,
        sort: SuggestionSort,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Suggestion>, i64)> {
        let mut items: Vec<Suggestion> = self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| Self::matches(filter, s))
            .cloned()
            .collect();

        items.sort_by(|a, b| {
            let ordering = match sort.field {
                SuggestionSortField::Date => a.date.cmp(&b.date),
                SuggestionSortField::Status => a.status.cmp(&b.status),
                SuggestionSortField::Title => a.title.cmp(&b.title),
            };
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, id: Uuid, changes: SuggestionChanges) -> Result<Option<Suggestion>> {
        let mut suggestions = self.suggestions.lock().unwrap();
        let Some(s) = suggestions.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            s.title = title;
        }
        if let Some(category) = changes.category {
            s.category = category;
        }
        if let Some(status) = changes.status {
            s.status = status;
        }
        if let Some(description) = changes.description {
            s.description = description;
        }
        s.updated_at = Utc::now();
        Ok(Some(s.clone()))
    }

    async fn set_assignee(
        &self,
        id: Uuid,
        assigned_to: Option<String>,
    ) -> Result<Option<Suggestion>> {
        let mut suggestions = self.suggestions.lock().unwrap();
        Ok(suggestions.iter_mut().find(|s| s.id == id).map(|s| {
            s.assigned_to = assigned_to;
            s.updated_at = Utc::now();
            s.clone()
        }))
    }

    async fn count_by_status(
        &self,
        filter: &SuggestionFilter,
    ) -> Result<Vec<(SuggestionStatus, i64)>> {
        let mut counts: HashMap<SuggestionStatus, i64> = HashMap::new();
        for s in self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| Self::matches(filter, s))
        {
            *counts.entry(s.status).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Language model
// ---------------------------------------------------------------------------

/// Returns a canned reply and records every prompt it receives
pub struct FakeLlmProvider {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlmProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the endpoint were unreachable
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for FakeLlmProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| AppError::ExternalServiceError("LLM request failed".to_string()))
    }
}
