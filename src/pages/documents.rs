use std::time::Duration;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::JsCast;
use web_sys::{File, HtmlInputElement};

use crate::api::ApiClient;
use crate::api::types::{Document, DocumentStatus};
use crate::components::documents::{
	ACCEPT_ATTR, Preview, SortKey, StatusFilter, format_size, processing_count, select_all_completed,
	simulated_progress, sort_documents, toggle_selection,
};
use crate::components::search::{Segment, highlight_match, rank};
use crate::components::store::DocumentStore;

const PROGRESS_TICK_MS: u64 = 1000;
const REVEAL_MS: u64 = 900;

fn highlighted(name: &str, query: &str) -> impl IntoView + use<> {
	highlight_match(name, query)
		.into_iter()
		.map(|Segment { text, matched }| {
			if matched {
				view! { <mark>{text}</mark> }.into_any()
			} else {
				view! { <span>{text}</span> }.into_any()
			}
		})
		.collect_view()
}

/// Upload zone, filterable document list, per-document summaries and actions.
#[component]
pub fn DocumentsPage() -> impl IntoView {
	let client = use_context::<ApiClient>().unwrap_or_default();
	let store = use_context::<DocumentStore>().unwrap_or_default();

	let (query, set_query) = signal(String::new());
	let (sort, set_sort) = signal(SortKey::default());
	let (filter, set_filter) = signal(StatusFilter::default());
	let (expanded, set_expanded) = signal(None::<String>);
	let (now, set_now) = signal(js_sys::Date::now());

	match set_interval_with_handle(
		move || set_now.set(js_sys::Date::now()),
		Duration::from_millis(PROGRESS_TICK_MS),
	) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(e) => error!("failed to start progress clock: {:?}", e),
	}

	let visible = Memo::new(move |_| {
		let docs = store.docs.get();
		let filtered: Vec<Document> = docs.iter().filter(|d| filter.get().matches(d)).cloned().collect();
		let q = query.get();
		let ranked: Vec<Document> = rank(&filtered, &q).into_iter().cloned().collect();
		if q.trim().is_empty() {
			sort_documents(&ranked, sort.get())
		} else {
			ranked
		}
	});

	let client_upload = client.clone();
	let on_files = move |ev: leptos::ev::Event| {
		let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
			return;
		};
		let files: Vec<File> = input
			.files()
			.map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect::<Vec<_>>())
			.unwrap_or_default();
		input.set_value("");
		if !files.is_empty() {
			store.upload(client_upload.clone(), files);
		}
	};

	let client_refresh = client.clone();
	let has_processing = move || store.docs.with(|d| processing_count(d)) > 0;

	view! {
		<div class="documents-page">
			<header class="page-header">
				<h1>"Documents"</h1>
				<Show when=has_processing>
					<span class="badge processing">
						{move || format!("{} processing", store.docs.with(|d| processing_count(d)))}
					</span>
				</Show>
				<button on:click=move |_| store.refresh(client_refresh.clone())>"Refresh"</button>
			</header>

			<label class="upload-zone">
				<input type="file" multiple=true accept=ACCEPT_ATTR on:change=on_files />
				<span>"Drop or choose PDF, TXT or DOCX files"</span>
				<Show when=move || store.uploads.with(|u| !u.is_empty())>
					<ul class="uploading">
						{move || {
							store
								.uploads
								.with(|u| u.filenames())
								.into_iter()
								.map(|f| view! { <li>{format!("Processing {}", f)}</li> })
								.collect_view()
						}}
					</ul>
				</Show>
			</label>

			<div class="list-controls">
				<input
					type="search"
					placeholder="Search documents..."
					prop:value=query
					on:input=move |ev| set_query.set(event_target_value(&ev))
				/>
				<select on:change=move |ev| set_sort.set(SortKey::parse(&event_target_value(&ev)))>
					{SortKey::ALL
						.into_iter()
						.map(|key| {
							view! {
								<option value=key.value() selected=move || sort.get() == key>
									{key.label()}
								</option>
							}
						})
						.collect_view()}
				</select>
				<div class="filters">
					{StatusFilter::ALL
						.into_iter()
						.map(|f| {
							view! {
								<button
									class=move || if filter.get() == f { "filter active" } else { "filter" }
									on:click=move |_| set_filter.set(f)
								>
									{f.label()}
									<span class="count">{move || store.docs.with(|d| f.count(d))}</span>
								</button>
							}
						})
						.collect_view()}
				</div>
				<div class="selection">
					<button on:click=move |_| store.selected.set(store.docs.with(|d| select_all_completed(d)))>
						"Select all"
					</button>
					<button on:click=move |_| store.selected.set(Vec::new())>"Clear"</button>
					<span>{move || format!("{} selected", store.selected.with(Vec::len))}</span>
				</div>
			</div>

			<Show
				when=move || !(store.loading.get() && store.docs.with(Vec::is_empty))
				fallback=|| view! { <p class="loading">"Loading documents..."</p> }
			>
				<Show
					when=move || !visible.with(Vec::is_empty)
					fallback=|| view! { <p class="empty">"No documents match."</p> }
				>
					<ul class="document-list">
						{move || {
							visible
								.get()
								.into_iter()
								.map(|doc| document_row(doc, store, query, now, expanded, set_expanded))
								.collect_view()
						}}
					</ul>
				</Show>
			</Show>
		</div>
	}
}

fn document_row(
	doc: Document,
	store: DocumentStore,
	query: ReadSignal<String>,
	now: ReadSignal<f64>,
	expanded: ReadSignal<Option<String>>,
	set_expanded: WriteSignal<Option<String>>,
) -> impl IntoView {
	let client = use_context::<ApiClient>().unwrap_or_default();
	let filename = doc.filename.clone();
	let status = doc.status.clone();
	let tracked = store.uploads.with_untracked(|u| u.task_id(&filename).is_some());

	let is_expanded = {
		let name = filename.clone();
		move || expanded.with(|e| e.as_deref() == Some(name.as_str()))
	};
	let progress = {
		let (name, status) = (filename.clone(), status.clone());
		move || {
			let elapsed = store.uploads.with(|u| u.elapsed(&name, now.get())).unwrap_or(0.0);
			simulated_progress(&status, elapsed)
		}
	};

	let checkbox = status.allows_actions().then(|| {
		let checked = {
			let name = filename.clone();
			move || store.selected.with(|s| s.contains(&name))
		};
		let name = filename.clone();
		view! {
			<input
				type="checkbox"
				prop:checked=checked
				on:change=move |_| store.selected.update(|s| toggle_selection(s, &name))
			/>
		}
	});

	let progress_bar = (status == DocumentStatus::Processing).then(|| {
		let cancel = tracked.then(|| {
			let (client, name) = (client.clone(), filename.clone());
			view! {
				<button class="cancel" on:click=move |_| store.cancel(client.clone(), name.clone())>
					"Cancel"
				</button>
			}
		});
		view! {
			<div class="progress">
				<div class="bar" style=move || format!("width: {}%", progress())></div>
			</div>
			{cancel}
		}
	});

	let actions = status.allows_actions().then(|| {
		let (client, name_view, name_del) = (client.clone(), filename.clone(), filename.clone());
		view! {
			<div class="row-actions">
				<button on:click=move |_| {
					set_expanded.update(|e| {
						*e = if e.as_deref() == Some(name_view.as_str()) { None } else { Some(name_view.clone()) };
					})
				}>"View"</button>
				<button class="danger" on:click=move |_| store.delete(client.clone(), name_del.clone())>
					"Delete"
				</button>
			</div>
		}
	});

	let name_display = filename.clone();
	view! {
		<li class=format!("document-row {}", status.label())>
			<div class="row-main">
				{checkbox}
				<span class="filename">{move || highlighted(&name_display, &query.get())}</span>
				<span class="size">{format_size(doc.size)}</span>
				<span class="status">{status.label()}</span>
				{doc.uploaded_at.clone().map(|at| view! { <span class="date">{at}</span> })}
			</div>
			{progress_bar}
			{actions}
			<Show when=is_expanded>
				{preview_panel(filename.clone())}
				{summary_panel(filename.clone(), store)}
			</Show>
		</li>
	}
}

/// Inline frame for PDF and text files, a download link for Word documents.
pub fn preview_panel(filename: String) -> impl IntoView {
	let url = use_context::<ApiClient>().unwrap_or_default().file_url(&filename);
	let body = match Preview::for_file(&filename) {
		Preview::Inline => view! { <iframe class="preview-frame" src=url title=filename.clone()></iframe> }.into_any(),
		Preview::DownloadOnly => view! {
			<div class="notice warning">
				<strong>"DOCX preview not supported"</strong>
				<p>"Word documents cannot be previewed in the browser. The document is still available for search and chat."</p>
				<p class="muted">"Supported preview formats: PDF, TXT"</p>
			</div>
			<a class="download" href=url download=filename.clone()>{format!("Download {}", filename)}</a>
		}
		.into_any(),
		Preview::Unavailable => view! { <p class="empty">"Preview not available for this file type"</p> }.into_any(),
	};
	view! {
		<div class="preview-panel">
			<h3>{format!("Preview: {}", filename)}</h3>
			{body}
		</div>
	}
}

pub fn summary_panel(filename: String, store: DocumentStore) -> impl IntoView {
	let client = use_context::<ApiClient>().unwrap_or_default();
	let lookup = {
		let name = filename.clone();
		move || {
			store.docs.with(|docs| {
				docs.iter()
					.find(|d| d.filename == name)
					.map(|d| (d.summary.clone(), d.summary_revealed))
			})
		}
	};
	let busy = {
		let name = filename.clone();
		move || store.summarizing.with(|s| s.contains(&name))
	};
	let failure = {
		let name = filename.clone();
		move || store.summary_errors.with(|e| e.get(&name).cloned())
	};

	let busy_attr = busy.clone();

	{
		let (lookup, name) = (lookup.clone(), filename.clone());
		Effect::new(move |_| {
			if let Some((Some(_), false)) = lookup() {
				let name = name.clone();
				set_timeout(move || store.mark_summary_revealed(&name), Duration::from_millis(REVEAL_MS));
			}
		});
	}

	view! {
		<div class="summary-panel">
			{move || match lookup() {
				Some((Some(text), revealed)) => {
					view! { <p class=if revealed { "summary" } else { "summary reveal" }>{text}</p> }.into_any()
				}
				_ => view! { <p class="summary empty">"No summary yet."</p> }.into_any(),
			}}
			{move || failure().map(|e| view! { <p class="error">{e}</p> })}
			<button
				disabled=busy_attr
				on:click={
					let (client, name) = (client.clone(), filename.clone());
					move |_| store.summarize(client.clone(), name.clone())
				}
			>
				{move || if busy() { "Summarizing..." } else { "Summarize" }}
			</button>
		</div>
	}
}
