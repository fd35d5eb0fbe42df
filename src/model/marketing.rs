//! Marketing Entities
//!
//! Platform-level content shown on the public landing surface: banner
//! rail, blog posts and discount coupons. None of these are org-scoped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// Banners
// ============================================

/// A promotional banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub active: bool,
    /// Rail position, lowest first
    pub sort_order: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a banner
#[derive(Debug, Clone, Serialize)]
pub struct BannerDraft {
    pub title: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

// ============================================
// Blog posts
// ============================================

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for drafting a post
#[derive(Debug, Clone, Serialize)]
pub struct BlogDraft {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub published: bool,
}

// ============================================
// Coupons
// ============================================

/// A discount coupon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub percent_off: u32,
    pub active: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub max_redemptions: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// Whether the coupon can be redeemed at the given instant. Open
    /// ends count as unbounded.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        if let Some(from) = self.valid_from {
            if now < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if now > until {
                return false;
            }
        }
        true
    }
}

/// Payload for creating a coupon
#[derive(Debug, Clone, Serialize)]
pub struct CouponDraft {
    pub code: String,
    pub percent_off: u32,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_redemptions: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn coupon(active: bool, from: Option<&str>, until: Option<&str>) -> Coupon {
        let parse = |s: &str| s.parse::<DateTime<Utc>>().unwrap();
        Coupon {
            id: Uuid::new_v4(),
            code: "WELCOME20".to_string(),
            percent_off: 20,
            active,
            valid_from: from.map(parse),
            valid_until: until.map(parse),
            max_redemptions: None,
            created_at: None,
        }
    }

    #[test]
    fn test_coupon_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let live = coupon(true, Some("2026-03-01T00:00:00Z"), Some("2026-03-31T00:00:00Z"));
        assert!(live.is_live_at(now));

        let not_yet = coupon(true, Some("2026-04-01T00:00:00Z"), None);
        assert!(!not_yet.is_live_at(now));

        let expired = coupon(true, None, Some("2026-02-01T00:00:00Z"));
        assert!(!expired.is_live_at(now));

        let inactive = coupon(false, None, None);
        assert!(!inactive.is_live_at(now));

        let open_ended = coupon(true, None, None);
        assert!(open_ended.is_live_at(now));
    }
}
