//! Shared UI components

pub mod badge;
pub mod connection;
pub mod guard;
pub mod loading;
pub mod modal;
pub mod sidebar;
pub mod toast;

pub use badge::{account_tone, course_tone, org_tone, role_tone, stream_tone, StatusBadge, Tone};
pub use connection::ConnectionSettings;
pub use guard::Guarded;
pub use loading::{EmptyState, ListSkeleton, Loading};
pub use modal::Modal;
pub use sidebar::{surface_path, Sidebar};
pub use toast::Toast;
