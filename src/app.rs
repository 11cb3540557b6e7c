//! Root application component with routing and the session context.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::StaticSegment;
use leptos_router::components::{Route, Router, Routes};

use crate::pages::dashboard::{DashboardPage, MetricsPage};
use crate::pages::login::LoginPage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the per-browser-session context, starts restore-on-load, and
/// sets up client-side routing. Restoration settles (success or sign-out)
/// before any authorization-gated UI treats the session as final.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = crate::state::session::provide_session();

    #[cfg(feature = "hydrate")]
    crate::state::session::spawn_restore(session);
    #[cfg(not(feature = "hydrate"))]
    let _ = session;

    view! {
        <Stylesheet id="leptos" href="/pkg/dashpanel.css"/>
        <Title text="Dashpanel"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=LoginPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
                <Route path=StaticSegment("metrics") view=MetricsPage/>
            </Routes>
        </Router>
    }
}
