//! Pages
//!
//! Top-level page components for each route.

pub mod content;
pub mod coupons;
pub mod courses;
pub mod dashboard;
pub mod flags;
pub mod landing;
pub mod live;
pub mod login;
pub mod marketing;
pub mod notifications;
pub mod omr;
pub mod org_detail;
pub mod orgs;
pub mod quizzes;
pub mod session;
pub mod settings;
pub mod users;

pub use content::Library;
pub use coupons::Coupons;
pub use courses::Courses;
pub use dashboard::Dashboard;
pub use flags::Flags;
pub use landing::Landing;
pub use live::Live;
pub use login::Login;
pub use marketing::Marketing;
pub use notifications::Notifications;
pub use omr::Omr;
pub use org_detail::OrgDetail;
pub use orgs::Organizations;
pub use quizzes::Quizzes;
pub use session::SessionRoom;
pub use settings::Settings;
pub use users::Users;
