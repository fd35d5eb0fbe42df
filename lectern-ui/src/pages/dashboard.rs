//! Dashboard Page
//!
//! Headline counts over whatever tables exist. Org admins see their own
//! tenant's numbers; platform staff see everything.

use leptos::*;

use lectern::auth::Surface;
use lectern::service::StatsSnapshot;

use crate::api::use_backend;
use crate::components::{Guarded, Loading};
use crate::state::use_console_state;

#[component]
pub fn Dashboard() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Dashboard>
            <Overview />
        </Guarded>
    }
}

#[component]
fn StatCard(label: &'static str, value: usize) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-6">
            <p class="text-3xl font-bold text-white">{value}</p>
            <p class="text-sm text-gray-400 mt-1">{label}</p>
        </div>
    }
}

#[component]
fn Overview() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (snapshot, set_snapshot) = create_signal(None::<StatsSnapshot>);
    let (version, set_version) = create_signal(0u32);

    create_effect(move |_| {
        version.track();
        let backend = backend.clone();
        let org = state.org_scope();
        spawn_local(async move {
            match backend.stats().snapshot(org).await {
                Ok(snap) => set_snapshot.set(Some(snap)),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let scope_line = move || {
        if state.org_scope().is_some() {
            "Your organization"
        } else {
            "All organizations"
        }
    };

    view! {
        <div class="p-8">
            <div class="flex items-center justify-between mb-6">
                <div>
                    <h1 class="text-2xl font-bold text-white">"Dashboard"</h1>
                    <p class="text-sm text-gray-400">{scope_line}</p>
                </div>
                <button
                    class="btn-secondary"
                    on:click=move |_| set_version.update(|n| *n += 1)
                >
                    "Refresh"
                </button>
            </div>

            {move || match snapshot.get() {
                Some(snap) => view! {
                    <div class="grid gap-4 md:grid-cols-4">
                        <StatCard label="Organizations" value=snap.organizations />
                        <StatCard label="Users" value=snap.users />
                        <StatCard label="Courses" value=snap.courses />
                        <StatCard label="Live streams" value=snap.streams />
                    </div>
                }.into_view(),
                None => view! { <Loading /> }.into_view(),
            }}
        </div>
    }
}
