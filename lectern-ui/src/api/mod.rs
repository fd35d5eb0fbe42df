//! Backend Access
//!
//! One `Backend` handle bundles the browser client, the change feed and
//! the provisioner, and hands out the core crate's services wired to
//! them. The handle is provided through Leptos context at the app root;
//! pages never construct a transport themselves.

pub mod client;
pub mod feed;

pub use client::{
    get_api_base, get_anon_key, get_provisioner_base, set_api_base, set_anon_key,
    set_provisioner_base, BrowserClient, BrowserProvisioner, DEFAULT_API_BASE,
    DEFAULT_PROVISIONER_BASE,
};
pub use feed::ChangeFeed;

use std::sync::Arc;

use leptos::*;

use lectern::auth::AccessGate;
use lectern::service::{
    Announcer, BannerRail, BlogDesk, ChatOps, ContentLibrary, CouponBook, CourseCatalog,
    FlagBoard, LiveOps, OmrDesk, OrgDirectory, OrgOnboarding, PlatformStats, PollBoard, QuizBank,
    UserDirectory,
};

/// Shared handle to the hosted backend
#[derive(Clone)]
pub struct Backend {
    client: Arc<BrowserClient>,
    feed: Arc<ChangeFeed>,
    provisioner: Arc<BrowserProvisioner>,
}

impl Backend {
    fn new(feed_connected: RwSignal<bool>) -> Self {
        Self {
            client: Arc::new(BrowserClient::new()),
            feed: Arc::new(ChangeFeed::new(feed_connected)),
            provisioner: Arc::new(BrowserProvisioner::new()),
        }
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.client.clone(), self.client.clone())
    }

    pub fn auth(&self) -> Arc<BrowserClient> {
        self.client.clone()
    }

    pub fn orgs(&self) -> OrgDirectory {
        OrgDirectory::new(self.client.clone())
    }

    pub fn onboarding(&self) -> OrgOnboarding {
        OrgOnboarding::new(self.client.clone(), self.provisioner.clone())
    }

    pub fn users(&self) -> UserDirectory {
        UserDirectory::new(self.client.clone())
    }

    pub fn courses(&self) -> CourseCatalog {
        CourseCatalog::new(self.client.clone())
    }

    pub fn content(&self) -> ContentLibrary {
        ContentLibrary::new(self.client.clone())
    }

    pub fn quizzes(&self) -> QuizBank {
        QuizBank::new(self.client.clone())
    }

    pub fn live(&self) -> LiveOps {
        LiveOps::new(self.client.clone())
    }

    pub fn polls(&self) -> PollBoard {
        PollBoard::new(self.client.clone(), self.feed.clone())
    }

    pub fn chat(&self) -> ChatOps {
        ChatOps::new(self.client.clone(), self.feed.clone())
    }

    pub fn banners(&self) -> BannerRail {
        BannerRail::new(self.client.clone())
    }

    pub fn blog(&self) -> BlogDesk {
        BlogDesk::new(self.client.clone())
    }

    pub fn coupons(&self) -> CouponBook {
        CouponBook::new(self.client.clone())
    }

    pub fn flags(&self) -> FlagBoard {
        FlagBoard::new(self.client.clone())
    }

    pub fn announcer(&self) -> Announcer {
        Announcer::new(self.client.clone())
    }

    pub fn omr(&self) -> OmrDesk {
        OmrDesk::new(self.client.clone())
    }

    pub fn stats(&self) -> PlatformStats {
        PlatformStats::new(self.client.clone())
    }
}

/// Create the backend handle and provide it to the component tree
pub fn provide_backend(feed_connected: RwSignal<bool>) {
    provide_context(Backend::new(feed_connected));
}

/// The backend handle from context
pub fn use_backend() -> Backend {
    use_context::<Backend>().expect("Backend not provided")
}
