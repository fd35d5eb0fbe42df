//! Quizzes Page
//!
//! Quiz shells plus a question editor. Questions are multiple choice;
//! the editor needs at least two options before it will submit.

use leptos::*;
use uuid::Uuid;

use lectern::auth::Surface;
use lectern::model::{Question, QuestionDraft, Quiz, QuizDraft};

use crate::api::use_backend;
use crate::components::{EmptyState, Guarded, ListSkeleton, Loading, Modal};
use crate::state::{format_timestamp, use_console_state};

#[component]
pub fn Quizzes() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Quizzes>
            <QuizList />
        </Guarded>
    }
}

#[component]
fn QuizList() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (quizzes, set_quizzes) = create_signal(Vec::<Quiz>::new());
    let (loaded, set_loaded) = create_signal(false);
    let (version, set_version) = create_signal(0u32);
    let (show_create, set_show_create) = create_signal(false);
    let (editing, set_editing) = create_signal(None::<Quiz>);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let org = state.org_scope();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            match backend.quizzes().quizzes(org).await {
                Ok(list) => set_quizzes.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            set_loaded.set(true);
        });
    });

    view! {
        <div class="p-8">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold text-white">"Quizzes"</h1>
                <button class="btn-primary" on:click=move |_| set_show_create.set(true)>
                    "New quiz"
                </button>
            </div>

            {move || {
                if !loaded.get() {
                    return view! { <ListSkeleton count=4 /> }.into_view();
                }
                let list = quizzes.get();
                if list.is_empty() {
                    return view! { <EmptyState message="No quizzes yet" /> }.into_view();
                }
                view! {
                    <table class="w-full text-left">
                        <thead>
                            <tr class="text-xs uppercase text-gray-500 border-b border-gray-700">
                                <th class="py-2">"Title"</th>
                                <th>"Time limit"</th>
                                <th>"Created"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {list.into_iter().map(|quiz| {
                                let for_edit = quiz.clone();
                                let limit = quiz
                                    .time_limit_minutes
                                    .map(|m| format!("{m} min"))
                                    .unwrap_or_else(|| "Untimed".to_string());
                                view! {
                                    <tr class="border-b border-gray-800 text-sm text-gray-300">
                                        <td class="py-3 text-white">{quiz.title.clone()}</td>
                                        <td>{limit}</td>
                                        <td>{format_timestamp(quiz.created_at)}</td>
                                        <td class="text-right">
                                            <button
                                                class="text-indigo-400 hover:text-indigo-300"
                                                on:click=move |_| set_editing.set(Some(for_edit.clone()))
                                            >
                                                "Questions"
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
                <CreateQuizModal
                    on_close=Callback::new(move |changed: bool| {
                        set_show_create.set(false);
                        if changed {
                            set_version.update(|n| *n += 1);
                        }
                    })
                />
            })}

            {move || editing.get().map(|quiz| view! {
                <QuestionEditor
                    quiz=quiz
                    on_close=Callback::new(move |_| set_editing.set(None))
                />
            })}
        </div>
    }
}

#[component]
fn CreateQuizModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (title, set_title) = create_signal(String::new());
    let (limit, set_limit) = create_signal(String::new());
    let (course_input, set_course_input) = create_signal(String::new());
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
        let limit_raw = limit.get_untracked();
        let time_limit_minutes = match limit_raw.trim() {
            "" => None,
            raw => match raw.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    state.show_error("Time limit must be whole minutes");
                    return;
                }
            },
        };
        let course_raw = course_input.get_untracked();
        let course_id = match course_raw.trim() {
            "" => None,
            raw => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    state.show_error("Course id must be a UUID");
                    return;
                }
            },
        };
        let draft = QuizDraft {
            org_id,
            course_id,
            title: title.get_untracked().trim().to_string(),
            time_limit_minutes,
        };
        let backend = backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.quizzes().create_quiz(draft).await {
                Ok(created) => {
                    state.show_success(&format!("{} created", created.title));
                    on_close.call(true);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <Modal title="New quiz" on_close=Callback::new(move |_| on_close.call(false))>
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
                    <label class="block text-sm text-gray-400 mb-1">
                        "Time limit in minutes (blank for untimed)"
                    </label>
                    <input
                        type="number"
                        min="1"
                        class="input-field w-full"
                        prop:value=limit
                        on:input=move |ev| set_limit.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Course id (optional)"</label>
                    <input
                        type="text"
                        class="input-field w-full font-mono text-xs"
                        prop:value=course_input
                        on:input=move |ev| set_course_input.set(event_target_value(&ev))
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
                    {move || if busy.get() { "Creating…" } else { "Create quiz" }}
                </button>
            </form>
        </Modal>
    }
}

/// Question list plus the add-question form for one quiz
#[component]
fn QuestionEditor(quiz: Quiz, on_close: Callback<()>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let quiz_id = quiz.id;

    let (questions, set_questions) = create_signal(Vec::<Question>::new());
    let (loaded, set_loaded) = create_signal(false);
    let (version, set_version) = create_signal(0u32);

    let (prompt, set_prompt) = create_signal(String::new());
    let (options_text, set_options_text) = create_signal(String::new());
    let (correct, set_correct) = create_signal("0".to_string());
    let (busy, set_busy) = create_signal(false);

    let option_lines = move || {
        options_text.with(|text| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
    };

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            match backend.quizzes().questions(quiz_id).await {
                Ok(list) => set_questions.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
            set_loaded.set(true);
        });
    });

    let remove_backend = backend.clone();
    let remove = move |id: Uuid| {
        let backend = remove_backend.clone();
        spawn_local(async move {
            match backend.quizzes().remove_question(id).await {
                Ok(()) => {
                    state.show_success("Question removed");
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    let add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let options = option_lines();
        if options.len() < 2 {
            state.show_error("A question needs at least two options");
            return;
        }
        let correct_index: u32 = correct.get_untracked().parse().unwrap_or(0);
        let draft = QuestionDraft {
            quiz_id,
            prompt: prompt.get_untracked().trim().to_string(),
            options,
            correct_index,
        };
        let backend = backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.quizzes().add_question(draft).await {
                Ok(_) => {
                    state.show_success("Question added");
                    set_prompt.set(String::new());
                    set_options_text.set(String::new());
                    set_correct.set("0".to_string());
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <Modal title=format!("Questions: {}", quiz.title) on_close=on_close>
            <div class="space-y-6">
                {move || {
                    if !loaded.get() {
                        return view! { <Loading /> }.into_view();
                    }
                    let list = questions.get();
                    if list.is_empty() {
                        return view! {
                            <p class="text-sm text-gray-500">"No questions yet."</p>
                        }.into_view();
                    }
                    let remove = remove.clone();
                    list.into_iter().map(|question| {
                        let remove = remove.clone();
                        let question_id = question.id;
                        view! {
                            <div class="bg-gray-900 rounded p-4 mb-2">
                                <div class="flex items-start justify-between gap-3">
                                    <p class="text-sm text-white">{question.prompt.clone()}</p>
                                    <button
                                        class="text-red-400 hover:text-red-300 text-xs"
                                        on:click=move |_| remove(question_id)
                                    >
                                        "Remove"
                                    </button>
                                </div>
                                <ul class="mt-2 space-y-1">
                                    {question.options.iter().enumerate().map(|(index, option)| {
                                        let marker = if index as u32 == question.correct_index {
                                            "✓ "
                                        } else {
                                            "· "
                                        };
                                        view! {
                                            <li class="text-xs text-gray-400">
                                                {marker}{option.clone()}
                                            </li>
                                        }
                                    }).collect_view()}
                                </ul>
                            </div>
                        }
                    }).collect_view().into_view()
                }}

                <form class="space-y-3 border-t border-gray-700 pt-4" on:submit=add>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Prompt"</label>
                        <input
                            type="text"
                            class="input-field w-full"
                            required
                            prop:value=prompt
                            on:input=move |ev| set_prompt.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Options, one per line"</label>
                        <textarea
                            class="input-field w-full h-24"
                            prop:value=options_text
                            on:input=move |ev| set_options_text.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Correct answer"</label>
                        <select
                            class="input-field w-full"
                            on:change=move |ev| set_correct.set(event_target_value(&ev))
                        >
                            {move || option_lines().into_iter().enumerate().map(|(index, option)| {
                                view! {
                                    <option value=index.to_string()>{option}</option>
                                }
                            }).collect_view()}
                        </select>
                    </div>
                    <button type="submit" class="btn-primary w-full" disabled=busy>
                        {move || if busy.get() { "Adding…" } else { "Add question" }}
                    </button>
                </form>
            </div>
        </Modal>
    }
}
