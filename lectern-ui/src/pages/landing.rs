//! Landing Page
//!
//! Public marketing surface: active banners and published blog posts.
//! No session required; fetch failures leave the sections empty rather
//! than surfacing errors to visitors.

use futures_util::future::join;
use leptos::*;
use leptos_router::A;

use lectern::model::{Banner, BlogPost};

use crate::api::use_backend;
use crate::state::format_timestamp;

/// First 160 characters of a post body for the card preview
fn excerpt(body: &str) -> String {
    let mut text: String = body.chars().take(160).collect();
    if body.chars().count() > 160 {
        text.push('…');
    }
    text
}

#[component]
pub fn Landing() -> impl IntoView {
    let backend = use_backend();

    let (banners, set_banners) = create_signal(Vec::<Banner>::new());
    let (posts, set_posts) = create_signal(Vec::<BlogPost>::new());

    create_effect(move |_| {
        let backend = backend.clone();
        spawn_local(async move {
            let (banners, posts) =
                join(backend.banners().active(), backend.blog().published()).await;
            match banners {
                Ok(list) => set_banners.set(list),
                Err(err) => {
                    web_sys::console::warn_1(&format!("banner fetch failed: {err}").into())
                }
            }
            match posts {
                Ok(list) => set_posts.set(list),
                Err(err) => {
                    web_sys::console::warn_1(&format!("blog fetch failed: {err}").into())
                }
            }
        });
    });

    view! {
        <div class="min-h-screen bg-gray-900 text-gray-100">
            <header class="border-b border-gray-800">
                <div class="max-w-5xl mx-auto px-6 py-4 flex items-center justify-between">
                    <span class="text-xl font-bold text-white">"Lectern"</span>
                    <A href="/login" class="btn-secondary text-sm">"Console sign in"</A>
                </div>
            </header>

            <section class="max-w-5xl mx-auto px-6 py-16 text-center">
                <h1 class="text-4xl font-bold text-white mb-4">
                    "Run your whole teaching platform from one desk"
                </h1>
                <p class="text-gray-400 max-w-2xl mx-auto">
                    "Courses, live classes, quizzes and announcements for every
                    organization on the platform."
                </p>
            </section>

            {move || {
                let rail = banners.get();
                (!rail.is_empty()).then(|| view! {
                    <section class="max-w-5xl mx-auto px-6 pb-12">
                        <div class="grid gap-4 md:grid-cols-3">
                            {rail.into_iter().map(|banner| view! {
                                <a
                                    href=banner.link_url.clone().unwrap_or_else(|| "#".to_string())
                                    class="block bg-gray-800 rounded-lg overflow-hidden hover:ring-2 hover:ring-indigo-500"
                                >
                                    <img src=banner.image_url.clone() alt=banner.title.clone() class="w-full h-36 object-cover" />
                                    <p class="px-4 py-3 text-sm text-gray-200">{banner.title.clone()}</p>
                                </a>
                            }).collect_view()}
                        </div>
                    </section>
                })
            }}

            <section class="max-w-5xl mx-auto px-6 pb-16">
                <h2 class="text-2xl font-semibold text-white mb-6">"From the blog"</h2>
                {move || {
                    let published = posts.get();
                    if published.is_empty() {
                        view! {
                            <p class="text-gray-500">"Nothing published yet."</p>
                        }.into_view()
                    } else {
                        published.into_iter().map(|post| view! {
                            <article class="bg-gray-800 rounded-lg p-6 mb-4">
                                <h3 class="text-lg font-semibold text-white">{post.title.clone()}</h3>
                                <p class="text-xs text-gray-500 mb-2">
                                    {format_timestamp(post.published_at)}
                                </p>
                                <p class="text-sm text-gray-300">{excerpt(&post.body)}</p>
                            </article>
                        }).collect_view().into_view()
                    }
                }}
            </section>

            <footer class="border-t border-gray-800 py-6 text-center text-sm text-gray-500">
                "Lectern"
            </footer>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_leaves_short_bodies_alone() {
        assert_eq!(excerpt("short post"), "short post");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let body = "x".repeat(200);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), 161);
        assert!(cut.ends_with('…'));
    }
}
