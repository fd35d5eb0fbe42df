//! Courses Page
//!
//! Catalog per organization: create drafts, publish and archive, and
//! enroll users. Single assignments write real rows; the bulk planner is
//! a dry run that only reports what it would write.

use futures_util::future::join;
use leptos::*;
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{Course, CourseAssignment, CourseDraft, CourseStatus, User};
use lectern::service::CourseQuery;

use crate::api::use_backend;
use crate::components::{
    course_tone, EmptyState, Guarded, ListSkeleton, Loading, Modal, StatusBadge,
};
use crate::state::{format_timestamp, use_console_state};

#[component]
pub fn Courses() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Courses>
            <CourseList />
        </Guarded>
    }
}

#[component]
fn CourseList() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (courses, set_courses) = create_signal(Vec::<Course>::new());
    let (loaded, set_loaded) = create_signal(false);
    let (version, set_version) = create_signal(0u32);

    let (search, set_search) = create_signal(String::new());
    let (status_filter, set_status_filter) = create_signal(String::new());
    let (show_create, set_show_create) = create_signal(false);
    let (assigning, set_assigning) = create_signal(None::<Course>);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let search = search.get();
        let status = match status_filter.get().as_str() {
            "draft" => Some(CourseStatus::Draft),
            "published" => Some(CourseStatus::Published),
            "archived" => Some(CourseStatus::Archived),
            _ => None,
        };
        let org = state.org_scope();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            let mut query = CourseQuery::new();
            if !search.trim().is_empty() {
                query = query.search(search.trim());
            }
            if let Some(status) = status {
                query = query.status(status);
            }
            if let Some(org) = org {
                query = query.org(org);
            }
            match backend.courses().list(&query).await {
                Ok(list) => set_courses.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            set_loaded.set(true);
        });
    });

    let step_backend = backend.clone();
    let step_status = move |course: Course| {
        let target = match course.status {
            CourseStatus::Draft | CourseStatus::Archived => CourseStatus::Published,
            CourseStatus::Published => CourseStatus::Archived,
        };
        let backend = step_backend.clone();
        spawn_local(async move {
            match backend.courses().set_status(course.id, target).await {
                Ok(updated) => {
                    state.show_success(&format!(
                        "{} is now {}",
                        updated.title,
                        updated.status.label().to_lowercase()
                    ));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold text-white">"Courses"</h1>
                <button class="btn-primary" on:click=move |_| set_show_create.set(true)>
                    "New course"
                </button>
            </div>

            <div class="flex gap-3 mb-4">
                <input
                    type="text"
                    class="input-field flex-1"
                    placeholder="Search by title"
                    on:change=move |ev| set_search.set(event_target_value(&ev))
                />
                <select
                    class="input-field"
                    on:change=move |ev| set_status_filter.set(event_target_value(&ev))
                >
                    <option value="">"All statuses"</option>
                    <option value="draft">"Draft"</option>
                    <option value="published">"Published"</option>
                    <option value="archived">"Archived"</option>
                </select>
            </div>

            {move || {
                if !loaded.get() {
                    return view! { <ListSkeleton count=4 /> }.into_view();
                }
                let list = courses.get();
                if list.is_empty() {
                    return view! { <EmptyState message="No courses match" /> }.into_view();
                }
                let step_status = step_status.clone();
                view! {
                    <table class="w-full text-left">
                        <thead>
                            <tr class="text-xs uppercase text-gray-500 border-b border-gray-700">
                                <th class="py-2">"Title"</th>
                                <th>"Status"</th>
                                <th>"Created"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {list.into_iter().map(|course| {
                                let step_status = step_status.clone();
                                let row = course.clone();
                                let for_assign = course.clone();
                                let action_label = match course.status {
                                    CourseStatus::Draft => "Publish",
                                    CourseStatus::Published => "Archive",
                                    CourseStatus::Archived => "Republish",
                                };
                                view! {
                                    <tr class="border-b border-gray-800 text-sm text-gray-300">
                                        <td class="py-3">
                                            <p class="text-white">{course.title.clone()}</p>
                                            {course.description.clone().map(|text| view! {
                                                <p class="text-xs text-gray-500">{text}</p>
                                            })}
                                        </td>
                                        <td>
                                            <StatusBadge
                                                label=course.status.label()
                                                tone=course_tone(course.status)
                                            />
                                        </td>
                                        <td>{format_timestamp(course.created_at)}</td>
                                        <td class="text-right space-x-3 whitespace-nowrap">
                                            <button
                                                class="text-indigo-400 hover:text-indigo-300"
                                                on:click=move |_| set_assigning.set(Some(for_assign.clone()))
                                            >
                                                "Enroll"
                                            </button>
                                            <button
                                                class="text-gray-400 hover:text-white"
                                                on:click=move |_| step_status(row.clone())
                                            >
                                                {action_label}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view()}
                        </tbody>
                    </table>
                }.into_view()
            }}

            {move || show_create.get().then(|| view! {
                <CreateCourseModal
                    on_close=Callback::new(move |changed: bool| {
                        set_show_create.set(false);
                        if changed {
                            set_version.update(|n| *n += 1);
                        }
                    })
                />
            })}

            {move || assigning.get().map(|course| view! {
                <AssignModal
                    course=course
                    on_close=Callback::new(move |_| set_assigning.set(None))
                />
            })}
        </div>
    }
}

#[component]
fn CreateCourseModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (title, set_title) = create_signal(String::new());
    let (description, set_description) = create_signal(String::new());
    let (org_input, set_org_input) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let scoped = state.org_scope();

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let org_id = match scoped {
            Some(org) => org,
            None => match Uuid::parse_str(org_input.get_untracked().trim()) {
                Ok(id) => id,
                Err(_) => {
                    state.show_error("Organization id must be a UUID");
                    return;
                }
            },
        };
        let mut draft = CourseDraft::new(org_id, title.get_untracked());
        let text = description.get_untracked();
        if !text.trim().is_empty() {
            draft = draft.description(text.trim());
        }
        let backend = backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.courses().create(draft).await {
                Ok(created) => {
                    state.show_success(&format!("{} created as draft", created.title));
                    on_close.call(true);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <Modal title="New course" on_close=Callback::new(move |_| on_close.call(false))>
            <form class="space-y-4" on:submit=submit>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Title"</label>
                    <input
                        type="text"
                        class="input-field w-full"
                        required
                        prop:value=title
                        on:input=move |ev| set_title.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Description (optional)"</label>
                    <textarea
                        class="input-field w-full h-24"
                        prop:value=description
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    />
                </div>
                {scoped.is_none().then(|| view! {
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Organization id"</label>
                        <input
                            type="text"
                            class="input-field w-full font-mono text-xs"
                            required
                            prop:value=org_input
                            on:input=move |ev| set_org_input.set(event_target_value(&ev))
                        />
                    </div>
                })}
                <button type="submit" class="btn-primary w-full" disabled=busy>
                    {move || if busy.get() { "Creating…" } else { "Create draft" }}
                </button>
            </form>
        </Modal>
    }
}

/// Enrollment dialog for one course. Individual assignment writes a row;
/// the bulk section runs the planner and reports without writing.
#[component]
fn AssignModal(course: Course, on_close: Callback<()>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let course_id = course.id;
    let org_id = course.org_id;

    let (users, set_users) = create_signal(Vec::<User>::new());
    let (org_courses, set_org_courses) = create_signal(Vec::<Course>::new());
    let (existing, set_existing) = create_signal(Vec::<CourseAssignment>::new());
    let (loaded, set_loaded) = create_signal(false);
    let (version, set_version) = create_signal(0u32);

    let (chosen_user, set_chosen_user) = create_signal(String::new());
    let checked_users = create_rw_signal(Vec::<Uuid>::new());
    let checked_courses = create_rw_signal(vec![course_id]);
    let (plan_summary, set_plan_summary) = create_signal(None::<String>);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            let catalog = backend.courses();
            let (basis, assignments) = join(
                catalog.assignment_basis(org_id),
                catalog.existing_assignments(&[course_id]),
            )
            .await;
            match basis {
                Ok((people, catalog_courses)) => {
                    set_users.set(people);
                    set_org_courses.set(catalog_courses);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            match assignments {
                Ok(rows) => set_existing.set(rows),
                Err(err) => state.show_error(&err.to_string()),
            }
            set_loaded.set(true);
        });
    });

    let assigned_here = move |user_id: Uuid| {
        existing.with(|rows| {
            rows.iter()
                .any(|a| a.user_id == user_id && a.course_id == course_id)
        })
    };

    let assign_backend = backend.clone();
    let assign_one = move |_| {
        let Ok(user_id) = Uuid::parse_str(chosen_user.get_untracked().trim()) else {
            state.show_error("Pick a user first");
            return;
        };
        let backend = assign_backend.clone();
        spawn_local(async move {
            match backend.courses().assign(user_id, course_id).await {
                Ok(_) => {
                    state.show_success("Assignment written");
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let simulate_backend = backend.clone();
    let simulate = move |_| {
        let user_ids = checked_users.get_untracked();
        let course_ids = checked_courses.get_untracked();
        if user_ids.is_empty() || course_ids.is_empty() {
            state.show_error("Pick at least one user and one course");
            return;
        }
        let backend = simulate_backend.clone();
        spawn_local(async move {
            match backend.courses().simulate_bulk(&user_ids, &course_ids).await {
                Ok(plan) => set_plan_summary.set(Some(plan.describe())),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let toggle_in = |list: RwSignal<Vec<Uuid>>, id: Uuid| {
        list.update(|items| {
            if let Some(pos) = items.iter().position(|x| *x == id) {
                items.remove(pos);
            } else {
                items.push(id);
            }
        });
    };

    view! {
        <Modal title=format!("Enroll: {}", course.title) on_close=on_close>
            {move || {
                if !loaded.get() {
                    return view! { <Loading /> }.into_view();
                }
                view! {
                    <div class="space-y-6">
                        <div>
                            <h3 class="text-sm font-semibold text-white mb-2">"Assign one user"</h3>
                            <div class="flex gap-2">
                                <select
                                    class="input-field flex-1"
                                    on:change=move |ev| set_chosen_user.set(event_target_value(&ev))
                                >
                                    <option value="">"Choose a user"</option>
                                    {users.get().into_iter().map(|user| {
                                        let taken = assigned_here(user.id);
                                        view! {
                                            <option value=user.id.to_string() disabled=taken>
                                                {user.full_name.clone()}
                                                {taken.then_some(" (enrolled)")}
                                            </option>
                                        }
                                    }).collect_view()}
                                </select>
                                <button class="btn-primary" on:click=assign_one.clone()>
                                    "Assign"
                                </button>
                            </div>
                        </div>

                        <div>
                            <h3 class="text-sm font-semibold text-white mb-2">"Bulk enrollment (dry run)"</h3>
                            <p class="text-xs text-gray-500 mb-3">
                                "Plans the cross product and reports what it would write.
                                Nothing is saved."
                            </p>
                            <div class="grid grid-cols-2 gap-4">
                                <div class="space-y-1 max-h-48 overflow-y-auto">
                                    <p class="text-xs uppercase text-gray-500">"Users"</p>
                                    {users.get().into_iter().map(|user| {
                                        let id = user.id;
                                        view! {
                                            <label class="flex items-center gap-2 text-sm text-gray-300">
                                                <input
                                                    type="checkbox"
                                                    prop:checked=move || checked_users.with(|l| l.contains(&id))
                                                    on:change=move |_| toggle_in(checked_users, id)
                                                />
                                                {user.full_name.clone()}
                                            </label>
                                        }
                                    }).collect_view()}
                                </div>
                                <div class="space-y-1 max-h-48 overflow-y-auto">
                                    <p class="text-xs uppercase text-gray-500">"Courses"</p>
                                    {org_courses.get().into_iter().map(|entry| {
                                        let id = entry.id;
                                        view! {
                                            <label class="flex items-center gap-2 text-sm text-gray-300">
                                                <input
                                                    type="checkbox"
                                                    prop:checked=move || checked_courses.with(|l| l.contains(&id))
                                                    on:change=move |_| toggle_in(checked_courses, id)
                                                />
                                                {entry.title.clone()}
                                            </label>
                                        }
                                    }).collect_view()}
                                </div>
                            </div>
                            <button class="btn-secondary mt-3" on:click=simulate.clone()>
                                "Preview plan"
                            </button>
                            {move || plan_summary.get().map(|summary| view! {
                                <div class="mt-3 bg-amber-900/50 border border-amber-700 text-amber-200 text-sm rounded px-4 py-3">
                                    {summary} " (dry run)"
                                </div>
                            })}
                        </div>
                    </div>
                }.into_view()
            }}
        </Modal>
    }
}
