use std::time::Duration;

use leptos::prelude::*;
use leptos_router::components::A;
use log::{debug, error, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::api::types::{DashboardData, Document, GraphSummary, Health, Overview};
use crate::components::dashboard::{DashboardState, bar_percent};
use crate::components::documents::format_size;
use crate::config::AppConfig;

const RECENT_DOCUMENTS: usize = 5;

fn fetch(client: ApiClient, set_state: WriteSignal<DashboardState>) {
	spawn_local(async move {
		let result = client.dashboard().await;
		if let Err(e) = &result {
			warn!("dashboard endpoint unavailable, using fallback data: {}", e);
		}
		set_state.set(DashboardState::from_result(result));
	});
}

fn stat_card(label: &'static str, value: String) -> impl IntoView {
	view! {
		<div class="stat-card">
			<span class="label">{label}</span>
			<span class="value">{value}</span>
		</div>
	}
}

fn overview_cards(overview: &Overview) -> impl IntoView + use<> {
	view! {
		<div class="overview-cards">
			{stat_card("Documents", overview.total_documents.to_string())}
			{stat_card("Entities", overview.total_entities.to_string())}
			{stat_card("Relations", overview.total_relations.to_string())}
			{stat_card("Active Jobs", overview.active_jobs.to_string())}
			{stat_card("LLM Provider", overview.llm_provider.clone())}
			{stat_card("Concurrency", overview.concurrency_mode.clone())}
		</div>
	}
}

fn bar(value: u64, max: u64) -> impl IntoView {
	view! {
		<div class="mini-bar">
			<div class="fill" style=format!("width: {:.1}%", bar_percent(value, max))></div>
		</div>
	}
}

fn graph_panel(graph: &GraphSummary) -> impl IntoView + use<> {
	let entities = graph.top_entities().to_vec();
	let max_conn = entities.first().map_or(1, |e| e.connections);
	let relations: Vec<(String, u64)> = graph
		.top_relations()
		.into_iter()
		.map(|(k, v)| (k.to_string(), v))
		.collect();
	let max_rel = relations.first().map_or(1, |r| r.1);
	let relation_kinds = graph.relation_types.len();

	view! {
		<section class="panel graph-panel">
			<h2>"Knowledge Graph"</h2>
			<div class="figures">
				<span>{format!("{} nodes", graph.total_nodes)}</span>
				<span>{format!("{} links", graph.total_links)}</span>
				<span>{format!("{} relation types", relation_kinds)}</span>
			</div>
			<h3>"Top entities"</h3>
			<ul>
				{entities
					.into_iter()
					.map(|e| {
						view! {
							<li>
								<span>{e.name}</span>
								<span class="count">{e.connections}</span>
								{bar(e.connections, max_conn)}
							</li>
						}
					})
					.collect_view()}
			</ul>
			<h3>"Relations"</h3>
			<ul>
				{relations
					.into_iter()
					.map(|(kind, count)| {
						view! {
							<li>
								<span>{kind}</span>
								<span class="count">{count}</span>
								{bar(count, max_rel)}
							</li>
						}
					})
					.collect_view()}
			</ul>
		</section>
	}
}

fn health_panel(health: &Health) -> impl IntoView + use<> {
	let rows: Vec<(&'static str, String)> = health
		.services()
		.into_iter()
		.map(|(name, status)| (name, status.to_string()))
		.collect();
	let summary = health.summary();
	view! {
		<section class="panel health-panel">
			<h2>"System Health"</h2>
			<ul>
				{rows
					.into_iter()
					.map(|(name, status)| {
						view! {
							<li>
								<span class=format!("dot {}", status)></span>
								<span>{name}</span>
								<span class="status">{status}</span>
							</li>
						}
					})
					.collect_view()}
			</ul>
			<p class="summary">{summary.message()}</p>
		</section>
	}
}

fn ingestion_panel(documents: &[Document]) -> impl IntoView + use<> {
	let recent: Vec<Document> = documents.iter().take(RECENT_DOCUMENTS).cloned().collect();
	view! {
		<section class="panel ingestion-panel">
			<h2>"Recent Ingestion"</h2>
			<ul>
				{recent
					.into_iter()
					.map(|d| {
						view! {
							<li>
								<span>{d.filename}</span>
								<span class="size">{format_size(d.size)}</span>
								<span class="status">{d.status.label()}</span>
							</li>
						}
					})
					.collect_view()}
			</ul>
		</section>
	}
}

fn dashboard_body(data: DashboardData, offline: bool) -> impl IntoView {
	view! {
		{offline
			.then(|| {
				view! {
					<div class="banner offline">
						<strong>"Dashboard endpoint not available"</strong>
						<p>"Showing placeholder data until GET /dashboard responds."</p>
					</div>
				}
			})}
		{overview_cards(&data.overview)}
		<div class="panels">
			{ingestion_panel(&data.documents)}
			{graph_panel(&data.graph)}
		</div>
		{health_panel(&data.health)}
	}
}

/// System overview polled on a fixed interval.
#[component]
pub fn DashboardPage() -> impl IntoView {
	let client = use_context::<ApiClient>().unwrap_or_default();
	let every_ms = use_context::<AppConfig>().unwrap_or_default().dashboard_poll_ms;
	let (state, set_state) = signal(DashboardState::Loading);
	let (refreshed, set_refreshed) = signal(None::<f64>);

	Effect::new(move |_| {
		if state.with(|s| s.data().is_some()) {
			set_refreshed.set(Some(js_sys::Date::now()));
		}
	});

	fetch(client.clone(), set_state);
	let client_poll = client.clone();
	match set_interval_with_handle(
		move || {
			if state.with_untracked(DashboardState::should_poll) {
				debug!("dashboard poll");
				fetch(client_poll.clone(), set_state);
			}
		},
		Duration::from_millis(every_ms as u64),
	) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(e) => error!("failed to start dashboard polling: {:?}", e),
	}

	let client_refresh = client.clone();
	view! {
		<div class="dashboard-page">
			<header class="page-header">
				<h1>"Intelligence Dashboard"</h1>
				{move || {
					refreshed
						.get()
						.map(|ms| {
							let stamp = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms));
							view! { <span class="refreshed">{String::from(stamp.to_locale_time_string("en-US"))}</span> }
						})
				}}
				<button on:click=move |_| fetch(client_refresh.clone(), set_state)>"Refresh"</button>
			</header>
			{move || match state.get() {
				DashboardState::Loading => view! { <p class="loading">"Loading dashboard..."</p> }.into_any(),
				DashboardState::Failed(data) => dashboard_body(data, true).into_any(),
				DashboardState::Loaded(data) => dashboard_body(data, false).into_any(),
			}}
			<nav class="quick-actions">
				<A href="/documents">"Upload documents"</A>
				<A href="/chat">"Ask a question"</A>
				<A href="/graph">"Explore the graph"</A>
			</nav>
		</div>
	}
}
