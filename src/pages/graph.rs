use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::components::force_graph::{
	ForceGraphCanvas, GraphHandle, GraphLoader, HighlightTracker, HoverInfo, NodeGroup, group_color,
	load,
};
use crate::components::search::find_node;
use crate::config::AppConfig;

const ZOOM_STEP: f64 = 1.4;
const SEARCH_ZOOM: f64 = 8.0;
const LEGEND: [NodeGroup; 6] = [
	NodeGroup::Person,
	NodeGroup::Organization,
	NodeGroup::Statute,
	NodeGroup::Date,
	NodeGroup::Document,
	NodeGroup::Entity,
];

/// Knowledge-graph explorer with zoom controls, entity search and a hover panel.
#[component]
pub fn GraphPage() -> impl IntoView {
	let client = use_context::<ApiClient>().unwrap_or_default();
	let limit = use_context::<AppConfig>().unwrap_or_default().graph_limit;

	let loader = Rc::new(RefCell::new(GraphLoader::new()));
	let (graph, set_graph) = signal(loader.borrow().data());
	let (tier, set_tier) = signal(loader.borrow().tier());
	let (total, set_total) = signal(0usize);
	let (loading, set_loading) = signal(true);
	let (hovered, set_hovered) = signal(None::<HoverInfo>);
	let (search, set_search) = signal(String::new());
	let (search_error, set_search_error) = signal(false);

	let handle = GraphHandle::default();
	let highlight = HighlightTracker::new();

	let refresh = move |reset: bool| {
		let (client, loader) = (client.clone(), loader.clone());
		spawn_local(async move {
			set_loading.set(true);
			if reset {
				loader.borrow_mut().reset();
			}
			if load(&client, &loader, limit).await {
				let current = loader.borrow();
				set_graph.set(current.data());
				set_tier.set(current.tier());
				set_total.set(current.total());
			}
			set_loading.set(false);
		});
	};
	refresh(false);

	let on_hover = Callback::new(move |info: Option<HoverInfo>| {
		if let Some(info) = &info {
			debug!("hover {}", info.id);
		}
		set_hovered.set(info);
	});

	let handle_search = handle.clone();
	let run_search = move || {
		let term = search.get_untracked();
		if term.trim().is_empty() {
			return;
		}
		let data = graph.get_untracked();
		let found = find_node(&data.nodes, &term).and_then(|node| handle_search.focus(&node.id, SEARCH_ZOOM));
		set_search_error.set(found.is_none());
		if found.is_some() {
			set_hovered.set(found);
		}
	};

	let (zoom_in, zoom_out, fit) = (handle.clone(), handle.clone(), handle.clone());

	view! {
		<div class="graph-page">
			<div class="graph-toolbar">
				<form
					class="graph-search"
					on:submit=move |ev| {
						ev.prevent_default();
						run_search();
					}
				>
					<input
						type="text"
						placeholder="Find entity..."
						class=move || if search_error.get() { "search-input error" } else { "search-input" }
						prop:value=search
						on:input=move |ev| {
							set_search.set(event_target_value(&ev));
							set_search_error.set(false);
						}
						on:keydown=move |ev| {
							if ev.key() == "Escape" {
								set_search.set(String::new());
								set_search_error.set(false);
							}
						}
					/>
					<Show when=move || search_error.get()>
						<span class="search-error">"No match"</span>
					</Show>
				</form>
				<button title="Zoom in" on:click=move |_| zoom_in.zoom_by(ZOOM_STEP)>"+"</button>
				<button title="Zoom out" on:click=move |_| zoom_out.zoom_by(1.0 / ZOOM_STEP)>"-"</button>
				<button title="Fit to view" on:click=move |_| fit.fit_view()>"Fit"</button>
				<button title="Reload graph" on:click=move |_| refresh(true)>"Reset"</button>
			</div>

			<div class="graph-stats">
				<span>{move || format!("{} nodes", graph.get().nodes.len())}</span>
				<span>{move || format!("{} links", graph.get().links.len())}</span>
				<span>{move || format!("{} total", total.get())}</span>
				<span class="tier">{move || format!("{:?} tier", tier.get().tier)}</span>
				<Show when=move || loading.get()>
					<span class="loading">"Loading graph..."</span>
				</Show>
			</div>

			<div class="graph-canvas-wrap">
				<ForceGraphCanvas
					data=graph
					tier=tier
					highlight=highlight
					handle=handle
					on_hover=on_hover
				/>
				<Show when=move || !loading.get() && graph.get().nodes.is_empty()>
					<div class="graph-empty">"No entities yet. Upload documents to build the graph."</div>
				</Show>
			</div>

			<ul class="graph-legend">
				{LEGEND
					.into_iter()
					.map(|group| {
						view! {
							<li>
								<span class="swatch" style=format!("background: {}", group_color(group))></span>
								{group.as_str()}
							</li>
						}
					})
					.collect_view()}
			</ul>

			{move || {
				hovered
					.get()
					.map(|info| {
						view! {
							<aside class="hover-panel">
								<h3>{info.id.clone()}</h3>
								<p class="group">{info.group.as_str()}</p>
								<p>{format!("{} connections", info.connections)}</p>
							</aside>
						}
					})
			}}
		</div>
	}
}
