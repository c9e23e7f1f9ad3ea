//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: define the strongly typed sleep-tracking model used by the HTTP,
//! CSV and persistence adapters, and the services that implement the driving
//! ports on top of the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - SleepSession / SleepGoal: validated aggregates and their drafts,
//!   inputs and patches.
//! - SessionView / GoalAttainment: read-time derivations.
//! - DashboardSummary, Page / PageRequest, SessionRange: read models.
//! - SleepSessionService / SleepGoalService / AccountService: port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod sleep;
pub mod sleep_goal_service;
pub mod sleep_session_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, SignupCredentials,
    SignupValidationError,
};
pub use self::dashboard::{DASHBOARD_WINDOW, DashboardSummary};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::pagination::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, PageRequestError,
};
pub use self::sleep::{
    DEFAULT_QUALITY, DEFAULT_TARGET_HOURS, GoalAttainment, GoalPatch, ParseSleepStageError,
    SessionPatch, SessionRange, SessionView, SleepGoal, SleepGoalDraft, SleepGoalInput,
    SleepSession, SleepSessionDraft, SleepSessionInput, SleepStage, SleepValidationError,
    StageSample, TAGS_MAX, Tags, duration_hours, round_hundredths,
};
pub use self::sleep_goal_service::SleepGoalService;
pub use self::sleep_session_service::SleepSessionService;
pub use self::trace_id::TraceId;
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};
