//! # Lectern
//!
//! Multi-Tenant Education Console - the Rust core behind Lectern's admin
//! surfaces: the browser console, the landing pages and the ops CLI.
//!
//! ## Features
//!
//! - **One client boundary**: every screen talks to trait objects, so the
//!   REST client, the browser client and the in-memory fake are
//!   interchangeable
//! - **Tenant-aware services**: org-scoped queries, role gates and the
//!   org onboarding saga
//! - **Live session plumbing**: poll tallies and chat feeds reconciled
//!   from realtime row changes
//! - **Soft degradation**: reads of unprovisioned tenant tables render
//!   as empty screens instead of errors
//!
//! ## Modules
//!
//! - [`backend`]: client boundary, REST dialect, in-memory fake
//! - [`model`]: entities stored in the hosted backend's tables
//! - [`auth`]: session gate and the role/surface access matrix
//! - [`service`]: one service per console area
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lectern::backend::MemoryBackend;
//! use lectern::model::PlanType;
//! use lectern::service::OrgDirectory;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Offline backend; swap in RestBackend for a live environment
//!     let backend = Arc::new(MemoryBackend::new());
//!
//!     let orgs = OrgDirectory::new(backend);
//!     let org = orgs
//!         .create("Horizon Academy", None, PlanType::Premium)
//!         .await?;
//!
//!     println!("Created {} ({})", org.name, org.slug);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod backend;
#[cfg(feature = "native")]
pub mod config;
pub mod model;
pub mod service;

// Re-export top-level types for convenience
pub use backend::{
    AuthApi, BackendError, BackendResult, FetchOutcome, Filter, MemoryBackend, MemoryProvisioner,
    Order, OrgProvisioner, ProvisionedCredentials, Realtime, Row, RowChange, RowChanges,
    SelectQuery, Session, TableWatch, Tables,
};

#[cfg(feature = "native")]
pub use backend::{RestBackend, RestConfig, RestProvisioner};

pub use model::{AccountStatus, Organization, OrgStatus, PlanType, Role, User};

pub use auth::{AccessGate, GateDecision, Surface};

pub use service::{
    Announcer, BannerRail, BlogDesk, ChatFeed, ChatOps, ContentLibrary, CouponBook,
    CourseCatalog, FlagBoard, LiveOps, OmrDesk, OrgDirectory, OrgOnboarding, PlatformStats,
    PollBoard, PollTally, QuizBank, ServiceError, ServiceResult, StatsSnapshot, UserDirectory,
};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LoggingConfig};
