//! OMR Page
//!
//! Answer-sheet templates and scan results. Templates always belong to
//! one organization; platform staff type the organization in, org
//! admins get their own. The results panel can swap in fixture data
//! for environments with no scanner.

use leptos::*;
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{OmrResult, OmrTemplate, OmrTemplateDraft};
use lectern::service::sample_results;

use crate::api::use_backend;
use crate::components::{EmptyState, Guarded};
use crate::state::{format_timestamp, use_console_state};

#[component]
pub fn Omr() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Omr>
            <OmrDeskView />
        </Guarded>
    }
}

#[component]
fn OmrDeskView() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let scoped = state.org_scope();

    let (org_text, set_org_text) = create_signal(String::new());
    let (templates, set_templates) = create_signal(Vec::<OmrTemplate>::new());
    let (results, set_results) = create_signal(Vec::<OmrResult>::new());
    let (filter, set_filter) = create_signal(String::new());
    let (use_sample, set_use_sample) = create_signal(false);
    let (version, set_version) = create_signal(0u32);

    let (name, set_name) = create_signal(String::new());
    let (questions, set_questions) = create_signal(String::new());
    let (choices, set_choices) = create_signal(String::new());

    let target_org = move || match scoped {
        Some(org_id) => Some(org_id),
        None => org_text.with(|raw| Uuid::parse_str(raw.trim()).ok()),
    };

    let templates_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let Some(org_id) = target_org() else {
            set_templates.set(Vec::new());
            return;
        };
        let backend = templates_backend.clone();
        spawn_local(async move {
            match backend.omr().templates(org_id).await {
                Ok(list) => set_templates.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let results_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        if use_sample.get() {
            set_results.set(sample_results());
            return;
        }
        let template_id = filter.with(|raw| Uuid::parse_str(raw).ok());
        let backend = results_backend.clone();
        spawn_local(async move {
            match backend.omr().results(template_id).await {
                Ok(list) => set_results.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let create_backend = backend.clone();
    let create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(org_id) = target_org() else {
            state.show_error("Enter an organization ID first");
            return;
        };
        let question_count = match questions.get_untracked().trim().parse::<u32>() {
            Ok(parsed) if parsed > 0 => parsed,
            _ => {
                state.show_error("A template needs at least one question");
                return;
            }
        };
        let choices_per_question = match choices.get_untracked().trim().parse::<u32>() {
            Ok(parsed) if parsed >= 2 => parsed,
            _ => {
                state.show_error("Questions need at least two choices");
                return;
            }
        };
        let draft = OmrTemplateDraft {
            org_id,
            name: name.get_untracked().trim().to_string(),
            question_count,
            choices_per_question,
        };
        let backend = create_backend.clone();
        spawn_local(async move {
            match backend.omr().create_template(draft).await {
                Ok(created) => {
                    state.show_success(&format!("\"{}\" created", created.name));
                    set_name.set(String::new());
                    set_questions.set(String::new());
                    set_choices.set(String::new());
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8">
            <h1 class="text-2xl font-bold text-white mb-6">"OMR scanning"</h1>

            <div class="grid gap-8 lg:grid-cols-2">
                <section class="bg-gray-800 rounded-lg p-6">
                    <h2 class="text-lg font-semibold text-white mb-4">"Sheet templates"</h2>

                    {(scoped.is_none()).then(|| view! {
                        <input
                            type="text"
                            class="input-field w-full font-mono text-sm mb-4"
                            placeholder="Organization ID"
                            prop:value=org_text
                            on:change=move |ev| set_org_text.set(event_target_value(&ev))
                        />
                    })}

                    {move || {
                        let list = templates.get();
                        if list.is_empty() {
                            let message = if target_org().is_some() {
                                "No templates yet."
                            } else {
                                "Pick an organization to see its templates."
                            };
                            return view! {
                                <p class="text-sm text-gray-500 mb-4">{message}</p>
                            }.into_view();
                        }
                        list.into_iter().map(|template| view! {
                            <div class="bg-gray-900 rounded p-4 mb-3">
                                <p class="text-sm text-white mb-1">{template.name.clone()}</p>
                                <p class="text-xs text-gray-500">
                                    {template.question_count} " questions · "
                                    {template.choices_per_question} " choices each · "
                                    {format_timestamp(template.created_at)}
                                </p>
                            </div>
                        }).collect_view().into_view()
                    }}

                    <form class="space-y-3 border-t border-gray-700 pt-4" on:submit=create>
                        <input
                            type="text"
                            class="input-field w-full"
                            placeholder="Template name"
                            required
                            prop:value=name
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                        <div class="grid grid-cols-2 gap-3">
                            <input
                                type="number"
                                min="1"
                                class="input-field w-full"
                                placeholder="Questions"
                                required
                                prop:value=questions
                                on:input=move |ev| set_questions.set(event_target_value(&ev))
                            />
                            <input
                                type="number"
                                min="2"
                                class="input-field w-full"
                                placeholder="Choices each"
                                required
                                prop:value=choices
                                on:input=move |ev| set_choices.set(event_target_value(&ev))
                            />
                        </div>
                        <button type="submit" class="btn-primary w-full">"Create template"</button>
                    </form>
                </section>

                <section class="bg-gray-800 rounded-lg p-6">
                    <div class="flex items-center justify-between mb-4">
                        <h2 class="text-lg font-semibold text-white">"Scan results"</h2>
                        <label class="flex items-center gap-2 text-xs text-gray-400">
                            <input
                                type="checkbox"
                                prop:checked=use_sample
                                on:change=move |ev| set_use_sample.set(event_target_checked(&ev))
                            />
                            "Use sample data"
                        </label>
                    </div>

                    {move || (!use_sample.get()).then(|| view! {
                        <select
                            class="input-field w-full mb-4"
                            on:change=move |ev| set_filter.set(event_target_value(&ev))
                        >
                            <option value="" selected>"All templates"</option>
                            {templates.get().into_iter().map(|template| view! {
                                <option value=template.id.to_string()>{template.name.clone()}</option>
                            }).collect_view()}
                        </select>
                    })}

                    {move || {
                        let list = results.get();
                        if list.is_empty() {
                            return view! {
                                <EmptyState message="No scans yet." />
                            }.into_view();
                        }
                        list.into_iter().map(|result| {
                            let percent = result.percent();
                            view! {
                                <div class="bg-gray-900 rounded p-4 mb-3">
                                    <div class="flex justify-between text-sm mb-1">
                                        <span class="text-white">{result.student_name.clone()}</span>
                                        <span class="text-gray-400">
                                            {result.score} "/" {result.total} " · " {percent} "%"
                                        </span>
                                    </div>
                                    <div class="bg-gray-800 rounded h-2 mb-1">
                                        <div
                                            class="bg-indigo-500 h-2 rounded"
                                            style=format!("width: {percent}%")
                                        />
                                    </div>
                                    <p class="text-xs text-gray-500">
                                        "Scanned " {format_timestamp(result.scanned_at)}
                                    </p>
                                </div>
                            }
                        }).collect_view().into_view()
                    }}
                </section>
            </div>
        </div>
    }
}
