//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::hooks::use_navigate;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod components;
mod config;
mod error;
mod pages;

use crate::api::ApiClient;
use crate::components::shortcuts::route_for_key;
use crate::components::store::{ChatStore, DocumentStore};
use crate::config::AppConfig;
// Top-Level pages
use crate::pages::chat::ChatPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::documents::DocumentsPage;
use crate::pages::graph::GraphPage;
use crate::pages::not_found::NotFound;
use crate::pages::summaries::SummariesPage;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

#[component]
fn NavBar() -> impl IntoView {
	let docs = use_context::<DocumentStore>().unwrap_or_default();
	view! {
		<nav class="sidebar">
			<span class="brand">"DocuMind"</span>
			<A href="/">"Dashboard"</A>
			<A href="/documents">
				"Documents"
				{move || {
					let processing = docs.docs.with(|d| components::documents::processing_count(d));
					(processing > 0).then(|| view! { <span class="badge">{processing}</span> })
				}}
			</A>
			<A href="/chat">"Chat"</A>
			<A href="/summaries">"Summaries"</A>
			<A href="/graph">"Graph"</A>
		</nav>
	}
}

/// Ctrl/Cmd + 1..5 switches between the main views.
#[component]
fn ViewShortcuts() -> impl IntoView {
	let navigate = use_navigate();
	let handle = window_event_listener(leptos::ev::keydown, move |ev| {
		if let Some(route) = route_for_key(&ev.key(), ev.ctrl_key() || ev.meta_key()) {
			ev.prevent_default();
			navigate(route, Default::default());
		}
	});
	on_cleanup(move || handle.remove());
}

/// Root component: shared stores, upload polling and the page router.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = AppConfig::from_document();
	let client = ApiClient::new(&config.api_base);
	let documents = DocumentStore::new();
	documents.refresh(client.clone());
	documents.start_polling(client.clone(), config.task_poll_ms);

	provide_context(config);
	provide_context(client);
	provide_context(documents);
	provide_context(ChatStore::new());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="DocuMind" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<div class="app-layout">
				<ViewShortcuts />
				<NavBar />
				<main>
					<Routes fallback=|| view! { <NotFound /> }>
						<Route path=path!("/") view=DashboardPage />
						<Route path=path!("/documents") view=DocumentsPage />
						<Route path=path!("/chat") view=ChatPage />
						<Route path=path!("/summaries") view=SummariesPage />
						<Route path=path!("/graph") view=GraphPage />
					</Routes>
				</main>
			</div>
		</Router>
	}
}
