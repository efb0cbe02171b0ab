//! Shared types and the HTTP data-access layer for the EJAT admin client.
//!
//! The same crate is compiled into the browser app (`ui`) and into native
//! tooling (`test-helpers`, `dev-server`), so nothing here may depend on a
//! particular async runtime.

pub mod api_client;
pub mod query;
pub mod requests;
pub mod resource;
pub mod responses;

pub use api_client::{APIClient, ClientConfig, ClientError, TokenProvider};
pub use query::{
    ItemState, PageState, PaginatedQuery, QueryOutcome, QueryStatus,
    QueryTicket, RequestSlot, SingleQuery,
};
pub use requests::{ListParams, PaginationUpdate};
pub use resource::{CancelHandle, PendingRequest, Resource, Upload};
pub use responses::{Paginated, Single};

use derive_more::Display;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(
                Debug,
                Clone,
                Copy,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                Display,
                Serialize,
                Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub Uuid);
        )*
    };
}

entity_id!(
    CategoryId,
    AwardId,
    CriterionId,
    MediaChannelId,
    UserId,
    ApplicationId,
    ScoreId,
);

/// Account role. Each role gets its own dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[display("super-admin")]
    SuperAdmin,
    #[display("admin")]
    Admin,
    #[display("journalist")]
    Journalist,
    #[display("judge")]
    Judge,
}

impl Role {
    pub const ALL: [Role; 4] =
        [Self::SuperAdmin, Self::Admin, Self::Journalist, Self::Judge];

    /// Super-admins and admins manage programs, categories and accounts.
    pub fn is_administrator(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// An award program, e.g. "EJAT 2025".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub id: AwardId,
    pub name: String,
    pub year: i32,
    pub is_open: bool,
    pub created_at: Timestamp,
}

/// A judging criterion within a category. Weights are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: CriterionId,
    pub category_id: CategoryId,
    pub name: String,
    pub weight: u32,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaChannel {
    pub id: MediaChannelId,
    pub name: String,
    pub website: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Shortlisted,
    Rejected,
}

/// A journalist's entry for an award in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub award_id: AwardId,
    pub category_id: CategoryId,
    pub journalist_id: UserId,
    pub title: String,
    pub status: ApplicationStatus,
    pub created_at: Timestamp,
}

/// A judge's score of one application against one criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: ScoreId,
    pub application_id: ApplicationId,
    pub criterion_id: CriterionId,
    pub judge_id: UserId,
    pub value: u32,
    pub comment: Option<String>,
}
