//! Domain Entities
//!
//! Typed shapes of the backend tables, decoded at the client boundary.
//! Statuses and other closed vocabularies are enums with explicit wire
//! forms; `*Draft` types are insert payloads where the backend fills
//! generated columns.

mod content;
mod course;
mod flags;
mod live;
mod marketing;
mod omr;
mod org;
mod slug;
mod user;

pub use content::{ContentDraft, ContentItem, ContentKind, Question, QuestionDraft, Quiz, QuizDraft};
pub use course::{AssignmentDraft, Course, CourseAssignment, CourseDraft, CourseStatus};
pub use flags::{Audience, FeatureFlag, FlagDraft, Notification, NotificationDraft};
pub use live::{
    LiveEvent, LiveEventDraft, MessageDraft, Poll, PollDraft, PollVote, Stream, StreamDraft,
    StreamMessage, StreamStatus,
};
pub use marketing::{Banner, BannerDraft, BlogDraft, BlogPost, Coupon, CouponDraft};
pub use omr::{OmrResult, OmrTemplate, OmrTemplateDraft};
pub use org::{OrgDraft, OrgSettingsPatch, OrgStatus, Organization, PlanType, ORG_FEATURE_KEYS};
pub use slug::slugify;
pub use user::{AccountStatus, Role, User, UserDraft};
