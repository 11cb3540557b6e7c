//! Authenticated dashboard and metrics pages.
//!
//! ARCHITECTURE
//! ============
//! One parameterized page body serves both routes; `/metrics` layers a
//! page-level authorization requirement on top of the session gate. Server
//! preparation runs through the page guard, so a request without
//! credentials redirects before any page logic runs and an expired token
//! clears the credential cookies instead of crashing the render.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::auth::authorize::{Requirement, authorize};
use crate::components::can::Can;
use crate::net::types::User;
use crate::state::session::use_session;

/// Identity snapshot fetched server-side while preparing the page.
#[server]
pub async fn page_identity() -> Result<User, ServerFnError> {
    crate::auth::guard::with_page_auth(|api| async move { api.me().await }).await
}

/// Whether the page body may render for the current identity.
///
/// Without a page-level requirement any authenticated identity passes;
/// with one, the full authorization check applies.
fn page_allowed(user: Option<&User>, requirement: Option<&Requirement>) -> bool {
    match requirement {
        Some(requirement) => authorize(user, requirement),
        None => user.is_some(),
    }
}

/// Dashboard route: session-gated only.
#[component]
pub fn DashboardPage() -> impl IntoView {
    view! { <ProtectedPage title="Dashboard"/> }
}

/// Metrics route: additionally requires `metrics.list` + `administrator`.
#[component]
pub fn MetricsPage() -> impl IntoView {
    let requirement = Requirement::new(&["metrics.list"], &["administrator"]);
    view! { <ProtectedPage title="Metrics" requirement/> }
}

/// Shared authenticated page body.
///
/// Redirects to the public entry once restoration settles without an
/// identity; renders nothing restricted while the session is still loading.
#[component]
fn ProtectedPage(
    title: &'static str,
    #[prop(optional, into)] requirement: Option<Requirement>,
) -> impl IntoView {
    let session = use_session();
    let state = session.state;
    let navigate = use_navigate();

    // Send unauthenticated visitors back to sign-in once loading settles.
    Effect::new(move || {
        let snapshot = state.get();
        if !snapshot.loading && snapshot.user.is_none() {
            navigate("/", NavigateOptions::default());
        }
    });

    // Server-side page preparation through the guard.
    let server_identity = Resource::new(|| (), |()| page_identity());

    let allowed = move || {
        let snapshot = state.get();
        page_allowed(snapshot.user.as_ref(), requirement.as_ref())
    };

    let on_sign_out = move |_| {
        #[cfg(feature = "hydrate")]
        crate::state::session::sign_out_now(session);
        #[cfg(not(feature = "hydrate"))]
        let _ = session;
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1>{title} ": " {move || state.get().user.map(|u| u.email).unwrap_or_default()}</h1>
                <button class="btn" on:click=on_sign_out>
                    "Sign out"
                </button>
            </header>

            <Show when=allowed>
                <section class="dashboard-page__body">
                    <Suspense fallback=move || {
                        view! { <p>"Preparing page..."</p> }
                    }>
                        {move || {
                            server_identity
                                .get()
                                .map(|result| match result {
                                    Ok(user) => {
                                        view! {
                                            <p class="dashboard-page__verified">
                                                "Server verified session for " {user.email}
                                            </p>
                                        }
                                            .into_any()
                                    }
                                    Err(_) => {
                                        view! {
                                            <p class="dashboard-page__verified">
                                                "Server verification unavailable."
                                            </p>
                                        }
                                            .into_any()
                                    }
                                })
                        }}
                    </Suspense>

                    <Can
                        permissions=vec!["metrics.list".to_owned()]
                        roles=vec!["administrator".to_owned()]
                    >
                        <h2>"Metrics"</h2>
                        <p>"Sessions, sign-ins, and API volume for the last 30 days."</p>
                    </Can>
                </section>
            </Show>
        </div>
    }
}
