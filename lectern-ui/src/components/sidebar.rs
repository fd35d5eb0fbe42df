//! Sidebar Component
//!
//! Admin navigation. Links are filtered through the same role policy the
//! route gate enforces, so nothing shows up that a click would bounce.

use leptos::*;
use leptos_router::{use_navigate, A};

use lectern::auth::{can_access, Surface};
use lectern::backend::AuthApi;

use crate::api::use_backend;
use crate::state::{initials, use_console_state};

const NAV_ITEMS: [(Surface, &str, &str); 12] = [
    (Surface::Dashboard, "/admin", "Dashboard"),
    (Surface::Organizations, "/admin/orgs", "Organizations"),
    (Surface::Users, "/admin/users", "Users"),
    (Surface::Courses, "/admin/courses", "Courses"),
    (Surface::Content, "/admin/content", "Content"),
    (Surface::Quizzes, "/admin/quizzes", "Quizzes"),
    (Surface::LiveSessions, "/admin/live", "Live sessions"),
    (Surface::Marketing, "/admin/marketing", "Marketing"),
    (Surface::Coupons, "/admin/coupons", "Coupons"),
    (Surface::FeatureFlags, "/admin/flags", "Feature flags"),
    (Surface::Notifications, "/admin/notifications", "Notifications"),
    (Surface::Omr, "/admin/omr", "OMR capture"),
];

/// Route for a surface, used by the sidebar and the post-login redirect
pub fn surface_path(surface: Surface) -> &'static str {
    NAV_ITEMS
        .iter()
        .find(|(s, _, _)| *s == surface)
        .map(|(_, path, _)| *path)
        .unwrap_or("/admin")
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();
    let navigate = use_navigate();

    let sign_out = move |_| {
        let backend = backend.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            if let Err(err) = backend.auth().sign_out().await {
                state.show_error(&format!("Sign-out failed: {err}"));
                return;
            }
            state.reset();
            navigate("/login", Default::default());
        });
    };

    view! {
        <aside class="w-60 shrink-0 bg-gray-800 border-r border-gray-700 flex flex-col min-h-screen">
            <div class="px-4 py-5 border-b border-gray-700">
                <A href="/admin" class="text-xl font-bold text-white">"Lectern"</A>
            </div>

            <nav class="flex-1 px-2 py-4 space-y-1 overflow-y-auto">
                {move || {
                    let role = state.role();
                    NAV_ITEMS
                        .iter()
                        .filter(|(surface, _, _)| {
                            role.map(|r| can_access(r, *surface)).unwrap_or(false)
                        })
                        .map(|(_, href, label)| view! {
                            <A
                                href=*href
                                exact={*href == "/admin"}
                                class="block px-3 py-2 rounded text-sm text-gray-300 hover:bg-gray-700 hover:text-white"
                                active_class="bg-gray-700 text-white"
                            >
                                {*label}
                            </A>
                        })
                        .collect_view()
                }}
            </nav>

            <div class="px-4 py-3 border-t border-gray-700 space-y-3">
                <div class="flex items-center gap-2 text-xs">
                    <span class=move || if state.feed_connected.get() {
                        "w-2 h-2 rounded-full bg-green-500"
                    } else {
                        "w-2 h-2 rounded-full bg-red-500"
                    } />
                    <span class="text-gray-400">
                        {move || if state.feed_connected.get() { "Live feed" } else { "Feed offline" }}
                    </span>
                </div>

                {move || state.profile.get().map(|user| view! {
                    <div class="flex items-center gap-3">
                        <div class="w-8 h-8 rounded-full bg-indigo-600 flex items-center justify-center text-sm font-semibold text-white">
                            {initials(&user.full_name)}
                        </div>
                        <div class="min-w-0">
                            <p class="text-sm text-white truncate">{user.full_name.clone()}</p>
                            <p class="text-xs text-gray-400">{user.role.label()}</p>
                        </div>
                    </div>
                })}

                {move || {
                    let may_configure = state
                        .role()
                        .map(|role| can_access(role, Surface::Dashboard))
                        .unwrap_or(false);
                    may_configure.then(|| view! {
                        <A
                            href="/admin/settings"
                            class="block text-sm text-gray-400 hover:text-white"
                            active_class="text-white"
                        >
                            "Settings"
                        </A>
                    })
                }}

                <button
                    class="w-full text-left text-sm text-gray-400 hover:text-white"
                    on:click=sign_out
                >
                    "Sign out"
                </button>
            </div>
        </aside>
    }
}
