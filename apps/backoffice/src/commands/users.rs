//! # User Commands
//!
//! User management. Creating and editing users (PIN, role, payment plan,
//! active flag) needs an admin session; listing only needs a session, since
//! every form picks a barber from the list.
//!
//! A fresh database has no users and therefore no admin to log in with;
//! [`bootstrap_admin`] creates the first one and refuses once any user exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ErrorCode};
use crate::state::{DbState, SessionState};
use barberia_core::validation::{validate_name, validate_pin, validate_uuid};
use barberia_core::{CoreError, PaymentPlan, Role, User};

/// A user as the UI sees it. The PIN never leaves the back-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub plan: PaymentPlan,
    pub plan_label: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        UserDto {
            id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            plan: user.plan,
            plan_label: user.plan.label().to_string(),
            active: user.active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub pin: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub plan: PaymentPlan,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: String,
    pub name: Option<String>,
    pub pin: Option<String>,
    pub role: Option<Role>,
    pub plan: Option<PaymentPlan>,
    pub active: Option<bool>,
}

/// Creates the first admin of an empty database.
pub async fn bootstrap_admin(db: &DbState, name: &str, pin: &str) -> Result<UserDto, ApiError> {
    if db.inner().users().count().await? > 0 {
        return Err(ApiError::new(
            ErrorCode::BusinessRule,
            "Users already exist; ask an admin to create your account",
        ));
    }

    let user = build_user(CreateUserRequest {
        name: name.to_string(),
        pin: pin.to_string(),
        role: Role::Admin,
        plan: PaymentPlan::Undefined,
    })?;
    db.inner().users().insert(&user).await?;

    info!(user_id = %user.id, name = %user.name, "First admin created");
    Ok(UserDto::from(&user))
}

/// Creates a user.
///
/// ## Errors
/// - `FORBIDDEN` without an admin session
/// - `VALIDATION_ERROR` for a bad name, PIN or plan, or a PIN already in use
pub async fn create_user(
    db: &DbState,
    session: &SessionState,
    request: CreateUserRequest,
) -> Result<UserDto, ApiError> {
    let admin = session.require_admin("create user")?;

    let user = build_user(request)?;
    db.inner().users().insert(&user).await?;

    info!(
        by = %admin.user_id,
        user_id = %user.id,
        name = %user.name,
        role = ?user.role,
        plan = user.plan.label(),
        "User created"
    );
    Ok(UserDto::from(&user))
}

/// Edits a user.
///
/// An admin cannot deactivate or demote themself, so the shop always keeps
/// the admin that is logged in.
pub async fn update_user(
    db: &DbState,
    session: &SessionState,
    request: UpdateUserRequest,
) -> Result<UserDto, ApiError> {
    let admin = session.require_admin("update user")?;
    validate_uuid(&request.id)?;

    let mut user = db
        .inner()
        .users()
        .get_by_id(&request.id)
        .await?
        .ok_or_else(|| CoreError::UserNotFound(request.id.clone()))?;

    if let Some(name) = &request.name {
        user.name = validate_name(name)?;
    }
    if let Some(pin) = request.pin {
        validate_pin(&pin)?;
        user.pin = pin;
    }
    if let Some(role) = request.role {
        user.role = role;
    }
    if let Some(plan) = request.plan {
        plan.validate()?;
        user.plan = plan;
    }
    if let Some(active) = request.active {
        user.active = active;
    }

    if user.id == admin.user_id && (!user.active || user.role != Role::Admin) {
        return Err(ApiError::new(
            ErrorCode::BusinessRule,
            "You cannot deactivate or demote your own account",
        ));
    }

    db.inner().users().update(&user).await?;

    info!(
        by = %admin.user_id,
        user_id = %user.id,
        role = ?user.role,
        plan = user.plan.label(),
        active = user.active,
        "User updated"
    );
    Ok(UserDto::from(&user))
}

/// Users ordered by name.
pub async fn list_users(
    db: &DbState,
    session: &SessionState,
    include_inactive: bool,
) -> Result<Vec<UserDto>, ApiError> {
    session.require()?;
    let users = db.inner().users().list(include_inactive).await?;
    Ok(users.iter().map(UserDto::from).collect())
}

fn build_user(request: CreateUserRequest) -> Result<User, ApiError> {
    let name = validate_name(&request.name)?;
    validate_pin(&request.pin)?;
    request.plan.validate()?;

    Ok(User {
        id: Uuid::new_v4().to_string(),
        name,
        role: request.role,
        pin: request.pin,
        plan: request.plan,
        active: true,
        created_at: Utc::now(),
    })
}
