//! Marquee Domain - Core storefront types
//!
//! This crate defines the domain model for the Marquee storefront client.
//! All types here are pure Rust with no I/O dependencies.

pub mod catalog;
pub mod error;
pub mod forms;
pub mod id;
pub mod movie;
pub mod notice;
pub mod order;
pub mod pricing;
pub mod route;
pub mod search;
pub mod token;
pub mod user;

pub use catalog::{Catalog, FEATURED_CATEGORY};
pub use error::{DomainError, DomainResult};
pub use forms::{LoginCredentials, PasswordReset, Registration, validate_email};
pub use id::{NoticeId, generate_notice_id};
pub use movie::{MovieDetail, MovieId, MovieSummary, WatchlistEntry, resolve_media_url};
pub use notice::{Notice, NoticeLevel};
pub use order::{Order, OrderStatus};
pub use pricing::{CheckoutDraft, CoinPlan, PaymentMethod, PurchaseRequest, Screenshot};
pub use route::Route;
pub use search::{PAGE_SIZE, SearchPage, SearchQuery, total_pages};
pub use token::AuthToken;
pub use user::UserProfile;
