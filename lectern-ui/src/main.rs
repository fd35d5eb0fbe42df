//! Lectern Console
//!
//! Admin console for the Lectern education platform, built with Leptos
//! (WASM).
//!
//! # Features
//!
//! - Organization, user and course administration
//! - Course content, quizzes and OMR templates
//! - Live stream control room with polls and moderated chat
//! - Landing-page marketing content, coupons and feature flags
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles
//! to WebAssembly. It talks to the hosted backend's REST and realtime
//! endpoints through the core crate's client traits.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
