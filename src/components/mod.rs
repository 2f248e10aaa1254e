//! Leptos components built on the auth slice.

pub mod auth_injector;
pub mod session_info;
