//! Client-side view of the catalog's comment/notification/moderation API.
//!
//! The [`api::CatalogApi`] trait is the seam: [`gateway::ApiGateway`] is the
//! reqwest-backed implementation, and the stores in [`comments`],
//! [`notifications`], and [`moderation`] are written against the trait so
//! they can be driven by an in-memory fake in tests.
//!
//! Every store follows the same consistency model: the server is
//! authoritative, mutations are followed by a full re-fetch, and local
//! state is only ever replaced wholesale.

pub mod api;
pub mod comments;
pub mod gateway;
pub mod moderation;
pub mod notifications;
pub mod session;

pub use api::{AdminOverview, AdminQuery, CatalogApi};
pub use comments::CommentThreadStore;
pub use gateway::ApiGateway;
pub use moderation::{ModerationStore, OVERVIEW_POLL_INTERVAL};
pub use notifications::{BellFeed, NavigationTarget, NotificationPage, BELL_POLL_INTERVAL};
pub use session::Session;
