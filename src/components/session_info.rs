//! Read-only view of the signed-in session: profile plus token claims.

#[cfg(test)]
#[path = "session_info_test.rs"]
mod session_info_test;

use std::sync::Arc;

use leptos::prelude::*;

use crate::session::{Payload, Profile, Session};

/// Profile and id/access claims of `session`. Renders nothing without one.
#[component]
pub fn SessionInfo(
    #[prop(into)] session: Signal<Option<Arc<Session>>>,
    /// Shown as a "Sign out" button when present.
    #[prop(optional)]
    on_sign_out: Option<Callback<()>>,
) -> impl IntoView {
    move || {
        session.get().map(|s| {
            view! {
                <section class="session-info">
                    <h2>"Authenticated"</h2>
                    <h3>"Profile"</h3>
                    <p class="session-info__name">{s.profile.display_name()}</p>
                    <pre class="session-info__profile">{profile_json(&s.profile)}</pre>
                    <h3>"ID payload"</h3>
                    <PayloadList entries=payload_entries(&s.id_payload)/>
                    <h3>"Access payload"</h3>
                    <PayloadList entries=payload_entries(&s.access_payload)/>
                    {on_sign_out
                        .map(|cb| {
                            view! {
                                <button class="btn btn--primary" on:click=move |_| cb.run(())>
                                    "Sign out"
                                </button>
                            }
                        })}
                </section>
            }
        })
    }
}

#[component]
fn PayloadList(entries: Vec<(String, String)>) -> impl IntoView {
    view! {
        <ul class="session-info__payload">
            {entries
                .into_iter()
                .map(|(key, value)| view! { <li>{key}": "{value}</li> })
                .collect::<Vec<_>>()}
        </ul>
    }
}

/// Claim name and JSON-rendered value, in key order.
pub fn payload_entries(payload: &Payload) -> Vec<(String, String)> {
    let mut entries: Vec<_> = payload.iter().map(|(k, v)| (k.clone(), v.to_string())).collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// Pretty JSON of `profile`. Empty (and logged) if serialization fails.
pub fn profile_json(profile: &Profile) -> String {
    serde_json::to_string_pretty(profile).unwrap_or_else(|err| {
        tracing::warn!(error = %err, email = %profile.email, "failed to render profile");
        String::new()
    })
}
