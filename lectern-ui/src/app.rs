//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::api::provide_backend;
use crate::components::{Sidebar, Toast};
use crate::pages::{
    Coupons, Courses, Dashboard, Flags, Landing, Library, Live, Login, Marketing, Notifications,
    Omr, OrgDetail, Organizations, Quizzes, SessionRoom, Settings, Users,
};
use crate::state::provide_console_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    let state = provide_console_state();
    provide_backend(state.feed_connected);

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white">
                <Routes>
                    <Route path="/" view=Landing />
                    <Route path="/login" view=Login />
                    <Route path="/admin" view=AdminShell>
                        <Route path="" view=Dashboard />
                        <Route path="orgs" view=Organizations />
                        <Route path="orgs/:id" view=OrgDetail />
                        <Route path="users" view=Users />
                        <Route path="courses" view=Courses />
                        <Route path="content" view=Library />
                        <Route path="quizzes" view=Quizzes />
                        <Route path="live" view=Live />
                        <Route path="live/:id" view=SessionRoom />
                        <Route path="marketing" view=Marketing />
                        <Route path="coupons" view=Coupons />
                        <Route path="flags" view=Flags />
                        <Route path="notifications" view=Notifications />
                        <Route path="omr" view=Omr />
                        <Route path="settings" view=Settings />
                    </Route>
                    <Route path="/*any" view=NotFound />
                </Routes>

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Console frame: sidebar plus the routed page
#[component]
fn AdminShell() -> impl IntoView {
    view! {
        <div class="flex min-h-screen">
            <Sidebar />
            <main class="flex-1 overflow-x-auto">
                <Outlet />
            </main>
        </div>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-indigo-600 hover:bg-indigo-700 rounded-lg font-medium transition-colors"
            >
                "Back to the landing page"
            </A>
        </div>
    }
}
