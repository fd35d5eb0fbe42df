//! Coupons Page
//!
//! Discount codes with validity windows. The status column says what a
//! shopper would see right now, not just the stored flag.

use chrono::Utc;
use leptos::*;

use lectern::auth::Surface;
use lectern::model::{Coupon, CouponDraft};

use crate::api::use_backend;
use crate::components::{EmptyState, Guarded, Modal, StatusBadge, Tone};
use crate::state::{format_timestamp, use_console_state};

use super::live::parse_local_datetime;

#[component]
pub fn Coupons() -> impl IntoView {
    view! {
        <Guarded surface=Surface::Coupons>
            <CouponList />
        </Guarded>
    }
}

#[component]
fn CouponList() -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (coupons, set_coupons) = create_signal(Vec::<Coupon>::new());
    let (version, set_version) = create_signal(0u32);
    let (show_modal, set_show_modal) = create_signal(false);

    let fetch_backend = backend.clone();
    create_effect(move |_| {
        version.track();
        let backend = fetch_backend.clone();
        spawn_local(async move {
            match backend.coupons().list().await {
                Ok(list) => set_coupons.set(list),
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    });

    let toggle_backend = backend.clone();
    let toggle = move |coupon: Coupon| {
        let backend = toggle_backend.clone();
        spawn_local(async move {
            match backend.coupons().set_active(coupon.id, !coupon.active).await {
                Ok(updated) => {
                    let verb = if updated.active { "enabled" } else { "disabled" };
                    state.show_success(&format!("{} {}", updated.code, verb));
                    set_version.update(|n| *n += 1);
                }
                Err(err) => state.show_error(&err.to_string()),
            }
        });
    };

    view! {
        <div class="p-8">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold text-white">"Coupons"</h1>
                <button class="btn-primary" on:click=move |_| set_show_modal.set(true)>
                    "New coupon"
                </button>
            </div>

            <div class="bg-gray-800 rounded-lg overflow-hidden">
                <table class="w-full text-left">
                    <thead class="bg-gray-900 text-gray-400 text-sm">
                        <tr>
                            <th class="px-4 py-3">"Code"</th>
                            <th class="px-4 py-3">"Discount"</th>
                            <th class="px-4 py-3">"Valid"</th>
                            <th class="px-4 py-3">"Cap"</th>
                            <th class="px-4 py-3">"Status"</th>
                            <th class="px-4 py-3"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let list = coupons.get();
                            if list.is_empty() {
                                return view! {
                                    <tr>
                                        <td colspan="6">
                                            <EmptyState message="No coupons yet." />
                                        </td>
                                    </tr>
                                }.into_view();
                            }
                            let now = Utc::now();
                            let toggle = toggle.clone();
                            list.into_iter().map(|coupon| {
                                let toggle = toggle.clone();
                                let toggled = coupon.clone();
                                let (status, tone) = if coupon.is_live_at(now) {
                                    ("Live", Tone::Green)
                                } else if coupon.active {
                                    ("Out of window", Tone::Amber)
                                } else {
                                    ("Off", Tone::Gray)
                                };
                                let toggle_label = if coupon.active { "Disable" } else { "Enable" };
                                view! {
                                    <tr class="border-t border-gray-700 text-sm">
                                        <td class="px-4 py-3 font-mono text-white">{coupon.code.clone()}</td>
                                        <td class="px-4 py-3 text-gray-300">{coupon.percent_off} "% off"</td>
                                        <td class="px-4 py-3 text-gray-400 text-xs">
                                            {format_timestamp(coupon.valid_from)}
                                            " → "
                                            {format_timestamp(coupon.valid_until)}
                                        </td>
                                        <td class="px-4 py-3 text-gray-400">
                                            {coupon.max_redemptions
                                                .map(|cap| cap.to_string())
                                                .unwrap_or_else(|| "Unlimited".to_string())}
                                        </td>
                                        <td class="px-4 py-3">
                                            <StatusBadge label=status tone=tone />
                                        </td>
                                        <td class="px-4 py-3 text-right">
                                            <button
                                                class="text-xs text-indigo-400 hover:text-indigo-300"
                                                on:click=move |_| toggle(toggled.clone())
                                            >
                                                {toggle_label}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view().into_view()
                        }}
                    </tbody>
                </table>
            </div>

            {move || show_modal.get().then(|| view! {
                <CreateCouponModal on_close=Callback::new(move |changed: bool| {
                    set_show_modal.set(false);
                    if changed {
                        set_version.update(|n| *n += 1);
                    }
                }) />
            })}
        </div>
    }
}

#[component]
fn CreateCouponModal(on_close: Callback<bool>) -> impl IntoView {
    let backend = use_backend();
    let state = use_console_state();

    let (code, set_code) = create_signal(String::new());
    let (percent, set_percent) = create_signal(String::new());
    let (from, set_from) = create_signal(String::new());
    let (until, set_until) = create_signal(String::new());
    let (cap, set_cap) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let submit_backend = backend.clone();
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let percent_off = match percent.get_untracked().trim().parse::<u32>() {
            Ok(parsed) if (1..=100).contains(&parsed) => parsed,
            _ => {
                state.show_error("Discount must be 1-100 percent");
                return;
            }
        };
        let raw_from = from.get_untracked();
        let valid_from = if raw_from.trim().is_empty() {
            None
        } else {
            match parse_local_datetime(&raw_from) {
                Some(at) => Some(at),
                None => {
                    state.show_error("Could not read the start time");
                    return;
                }
            }
        };
        let raw_until = until.get_untracked();
        let valid_until = if raw_until.trim().is_empty() {
            None
        } else {
            match parse_local_datetime(&raw_until) {
                Some(at) => Some(at),
                None => {
                    state.show_error("Could not read the end time");
                    return;
                }
            }
        };
        if let (Some(start), Some(end)) = (valid_from, valid_until) {
            if end < start {
                state.show_error("The window ends before it starts");
                return;
            }
        }
        let raw_cap = cap.get_untracked();
        let raw_cap = raw_cap.trim();
        let max_redemptions = if raw_cap.is_empty() {
            None
        } else {
            match raw_cap.parse::<u32>() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    state.show_error("Redemption cap must be a whole number");
                    return;
                }
            }
        };
        let draft = CouponDraft {
            code: code.get_untracked().trim().to_uppercase(),
            percent_off,
            active: true,
            valid_from,
            valid_until,
            max_redemptions,
        };
        let backend = submit_backend.clone();
        set_busy.set(true);
        spawn_local(async move {
            match backend.coupons().create(draft).await {
                Ok(created) => {
                    state.show_success(&format!("{} created", created.code));
                    on_close.call(true);
                }
                Err(err) => {
                    set_busy.set(false);
                    state.show_error(&err.to_string());
                }
            }
        });
    };

    view! {
        <Modal title="New coupon" on_close=Callback::new(move |()| on_close.call(false))>
            <form class="space-y-4" on:submit=submit>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Code"</label>
                    <input
                        type="text"
                        class="input-field w-full font-mono uppercase"
                        placeholder="LAUNCH25"
                        required
                        prop:value=code
                        on:input=move |ev| set_code.set(event_target_value(&ev))
                    />
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Discount (percent)"</label>
                    <input
                        type="number"
                        min="1"
                        max="100"
                        class="input-field w-full"
                        required
                        prop:value=percent
                        on:input=move |ev| set_percent.set(event_target_value(&ev))
                    />
                </div>
                <div class="grid grid-cols-2 gap-3">
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Valid from (optional)"</label>
                        <input
                            type="datetime-local"
                            class="input-field w-full"
                            prop:value=from
                            on:input=move |ev| set_from.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="block text-sm text-gray-400 mb-1">"Valid until (optional)"</label>
                        <input
                            type="datetime-local"
                            class="input-field w-full"
                            prop:value=until
                            on:input=move |ev| set_until.set(event_target_value(&ev))
                        />
                    </div>
                </div>
                <div>
                    <label class="block text-sm text-gray-400 mb-1">"Redemption cap (optional)"</label>
                    <input
                        type="number"
                        min="1"
                        class="input-field w-full"
                        placeholder="Unlimited"
                        prop:value=cap
                        on:input=move |ev| set_cap.set(event_target_value(&ev))
                    />
                </div>
                <button type="submit" class="btn-primary w-full" disabled=busy>
                    {move || if busy.get() { "Creating..." } else { "Create coupon" }}
                </button>
            </form>
        </Modal>
    }
}
