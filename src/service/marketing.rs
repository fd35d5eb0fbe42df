//! Marketing Operations
//!
//! Banner rail, blog desk and coupon book. The landing surface reads
//! the public subsets (`active`, `published`, `live_now`); the console
//! reads everything.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::backend::{decode_row, decode_rows, to_row, Filter, Order, Row, SelectQuery, Tables};
use crate::model::{slugify, Banner, BannerDraft, BlogDraft, BlogPost, Coupon, CouponDraft};

use super::{fetch_soft, ServiceError, ServiceResult};

const BANNERS: &str = "banners";
const BLOGS: &str = "blog_posts";
const COUPONS: &str = "coupons";

// ============================================
// Banners
// ============================================

pub struct BannerRail {
    tables: Arc<dyn Tables>,
}

impl BannerRail {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    /// Everything, for the console
    pub async fn all(&self) -> ServiceResult<Vec<Banner>> {
        let query = SelectQuery::from(BANNERS).order(Order::asc("sort_order"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    /// Only what the landing page shows
    pub async fn active(&self) -> ServiceResult<Vec<Banner>> {
        let query = SelectQuery::from(BANNERS)
            .filter(Filter::eq("active", true))
            .order(Order::asc("sort_order"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn create(&self, draft: BannerDraft) -> ServiceResult<Banner> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Invalid("banner title is required".into()));
        }
        if draft.image_url.trim().is_empty() {
            return Err(ServiceError::Invalid("banner image URL is required".into()));
        }
        let row = self.tables.insert(BANNERS, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    /// Show/hide, computed from the banner the caller is looking at
    pub async fn toggle(&self, banner: &Banner) -> ServiceResult<Banner> {
        let mut patch = Row::new();
        patch.insert("active".to_string(), json!(!banner.active));
        let updated = self
            .tables
            .update(BANNERS, &[Filter::eq("id", banner.id)], patch)
            .await?;
        let mut banners: Vec<Banner> = decode_rows(updated)?;
        if banners.is_empty() {
            return Err(ServiceError::NotFound(format!("banner {}", banner.id)));
        }
        Ok(banners.remove(0))
    }

    pub async fn remove(&self, id: Uuid) -> ServiceResult<()> {
        let gone = self.tables.delete(BANNERS, &[Filter::eq("id", id)]).await?;
        if gone == 0 {
            return Err(ServiceError::NotFound(format!("banner {id}")));
        }
        Ok(())
    }
}

// ============================================
// Blog
// ============================================

pub struct BlogDesk {
    tables: Arc<dyn Tables>,
}

impl BlogDesk {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub async fn all(&self) -> ServiceResult<Vec<BlogPost>> {
        let query = SelectQuery::from(BLOGS).order(Order::desc("created_at"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    /// Published posts, newest first, for the landing page
    pub async fn published(&self) -> ServiceResult<Vec<BlogPost>> {
        let query = SelectQuery::from(BLOGS)
            .filter(Filter::eq("published", true))
            .order(Order::desc("published_at"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    /// Create a draft post; the slug derives from the title
    pub async fn draft(&self, title: &str, body: &str) -> ServiceResult<BlogPost> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServiceError::Invalid("post title is required".into()));
        }
        let slug = slugify(title);
        if slug.is_empty() {
            return Err(ServiceError::Invalid("post title yields an empty slug".into()));
        }
        let draft = BlogDraft {
            title: title.to_string(),
            slug,
            body: body.to_string(),
            published: false,
        };
        let row = self.tables.insert(BLOGS, to_row(&draft)?).await?;
        let post: BlogPost = decode_row(row)?;
        info!(post_id = %post.id, slug = %post.slug, "blog post drafted");
        Ok(post)
    }

    pub async fn set_published(&self, id: Uuid, published: bool) -> ServiceResult<BlogPost> {
        let mut patch = Row::new();
        patch.insert("published".to_string(), json!(published));
        let updated = self
            .tables
            .update(BLOGS, &[Filter::eq("id", id)], patch)
            .await?;
        let mut posts: Vec<BlogPost> = decode_rows(updated)?;
        if posts.is_empty() {
            return Err(ServiceError::NotFound(format!("blog post {id}")));
        }
        Ok(posts.remove(0))
    }
}

// ============================================
// Coupons
// ============================================

pub struct CouponBook {
    tables: Arc<dyn Tables>,
}

impl CouponBook {
    pub fn new(tables: Arc<dyn Tables>) -> Self {
        Self { tables }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Coupon>> {
        let query = SelectQuery::from(COUPONS).order(Order::desc("created_at"));
        fetch_soft(self.tables.as_ref(), &query).await
    }

    pub async fn create(&self, draft: CouponDraft) -> ServiceResult<Coupon> {
        if draft.code.trim().is_empty() {
            return Err(ServiceError::Invalid("coupon code is required".into()));
        }
        if draft.percent_off == 0 || draft.percent_off > 100 {
            return Err(ServiceError::Invalid(format!(
                "discount must be 1-100 percent, got {}",
                draft.percent_off
            )));
        }
        let row = self.tables.insert(COUPONS, to_row(&draft)?).await?;
        Ok(decode_row(row)?)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> ServiceResult<Coupon> {
        let mut patch = Row::new();
        patch.insert("active".to_string(), json!(active));
        let updated = self
            .tables
            .update(COUPONS, &[Filter::eq("id", id)], patch)
            .await?;
        let mut coupons: Vec<Coupon> = decode_rows(updated)?;
        if coupons.is_empty() {
            return Err(ServiceError::NotFound(format!("coupon {id}")));
        }
        Ok(coupons.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    #[tokio::test]
    async fn test_active_rail_is_a_subset() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            BANNERS,
            vec![
                json!({"id": "11111111-0000-4000-8000-000000000001", "title": "Board exam prep", "image_url": "https://cdn.test/a.png", "active": true, "sort_order": 2}),
                json!({"id": "11111111-0000-4000-8000-000000000002", "title": "Summer camp", "image_url": "https://cdn.test/b.png", "active": false, "sort_order": 1}),
                json!({"id": "11111111-0000-4000-8000-000000000003", "title": "New courses", "image_url": "https://cdn.test/c.png", "active": true, "sort_order": 1}),
            ],
        );
        let rail = BannerRail::new(backend);

        let all = rail.all().await.unwrap();
        assert_eq!(all.len(), 3);

        let active = rail.active().await.unwrap();
        assert_eq!(active.len(), 2);
        // Rail order respects sort_order
        assert_eq!(active[0].title, "New courses");
    }

    #[tokio::test]
    async fn test_toggle_flips_visibility() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            BANNERS,
            vec![json!({"id": "11111111-0000-4000-8000-000000000001", "title": "Board exam prep", "image_url": "https://cdn.test/a.png", "active": true})],
        );
        let rail = BannerRail::new(backend);
        let banner = rail.all().await.unwrap().remove(0);
        let after = rail.toggle(&banner).await.unwrap();
        assert!(!after.active);
    }

    #[tokio::test]
    async fn test_blog_draft_slug_and_publish() {
        let desk = BlogDesk::new(Arc::new(MemoryBackend::new()));

        let post = desk
            .draft("How We Run Mock Tests", "Long form body")
            .await
            .unwrap();
        assert_eq!(post.slug, "how-we-run-mock-tests");
        assert!(!post.published);

        let live = desk.set_published(post.id, true).await.unwrap();
        assert!(live.published);

        let published = desk.published().await.unwrap();
        assert_eq!(published.len(), 1);
    }

    #[tokio::test]
    async fn test_coupon_discount_bounds() {
        let book = CouponBook::new(Arc::new(MemoryBackend::new()));
        for bad in [0u32, 101] {
            let draft = CouponDraft {
                code: "WELCOME".to_string(),
                percent_off: bad,
                active: true,
                valid_from: None,
                valid_until: None,
                max_redemptions: None,
            };
            assert!(matches!(
                book.create(draft).await,
                Err(ServiceError::Invalid(_))
            ));
        }
    }
}
