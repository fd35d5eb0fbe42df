//! Badge Component
//!
//! Small colored status pills used across the list pages.

use leptos::*;

use lectern::model::{AccountStatus, CourseStatus, OrgStatus, Role, StreamStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Red,
    Amber,
    Blue,
    Gray,
}

impl Tone {
    fn classes(self) -> &'static str {
        match self {
            Tone::Green => "bg-green-900 text-green-300",
            Tone::Red => "bg-red-900 text-red-300",
            Tone::Amber => "bg-amber-900 text-amber-300",
            Tone::Blue => "bg-blue-900 text-blue-300",
            Tone::Gray => "bg-gray-700 text-gray-300",
        }
    }
}

#[component]
pub fn StatusBadge(
    #[prop(into)]
    label: String,
    tone: Tone,
) -> impl IntoView {
    let classes = format!(
        "inline-block px-2 py-0.5 rounded-full text-xs font-medium {}",
        tone.classes()
    );
    view! {
        <span class=classes>{label}</span>
    }
}

pub fn org_tone(status: OrgStatus) -> Tone {
    match status {
        OrgStatus::Active => Tone::Green,
        OrgStatus::Suspended => Tone::Red,
        OrgStatus::Inactive => Tone::Gray,
    }
}

pub fn account_tone(status: AccountStatus) -> Tone {
    match status {
        AccountStatus::Active => Tone::Green,
        AccountStatus::Suspended => Tone::Red,
    }
}

pub fn role_tone(role: Role) -> Tone {
    match role {
        Role::SuperAdmin => Tone::Amber,
        Role::OrgAdmin => Tone::Blue,
        Role::Teacher => Tone::Green,
        Role::Student => Tone::Gray,
    }
}

pub fn course_tone(status: CourseStatus) -> Tone {
    match status {
        CourseStatus::Draft => Tone::Gray,
        CourseStatus::Published => Tone::Green,
        CourseStatus::Archived => Tone::Amber,
    }
}

pub fn stream_tone(status: StreamStatus) -> Tone {
    match status {
        StreamStatus::Scheduled => Tone::Blue,
        StreamStatus::Live => Tone::Green,
        StreamStatus::Ended => Tone::Gray,
    }
}
