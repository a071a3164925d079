pub mod capabilities;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod paging;
pub mod token;

pub use capabilities::Capabilities;
pub use config::ArcadeConfig;
pub use content::{is_image_url, validate_content, MAX_COMMENT_LEN};
pub use error::{ArcadeError, Result};
pub use models::{
    AdminPagination, AdminSort, Comment, Notification, Reply, Role, SessionUser, SortOrder,
    StatusFilter, UserRef,
};
pub use paging::{page_window, PageToken, ReplyWindow, REPLY_PAGE_SIZE};
pub use token::{decode_jwt_identity, TokenStore};
