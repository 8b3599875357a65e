use leptos::prelude::*;

use crate::components::documents::selected_documents;
use crate::components::store::DocumentStore;
use crate::pages::documents::{preview_panel, summary_panel};

/// Summary report for each selected document, with a preview dialog.
#[component]
pub fn SummariesPage() -> impl IntoView {
	let store = use_context::<DocumentStore>().unwrap_or_default();
	let (preview, set_preview) = signal(None::<String>);

	let picked = Memo::new(move |_| {
		let selected = store.selected.get();
		store.docs.with(|docs| selected_documents(docs, &selected))
	});

	view! {
		<div class="summaries-page">
			<header class="page-header">
				<h1>"Document Summaries"</h1>
				<span class="badge">{move || format!("{} selected", picked.with(Vec::len))}</span>
			</header>
			<Show
				when=move || !picked.with(Vec::is_empty)
				fallback=|| {
					view! {
						<div class="summaries-empty">
							<h3>"No Documents Selected"</h3>
							<p>"Select documents on the Documents page to generate a full report."</p>
						</div>
					}
				}
			>
				{move || {
					picked
						.get()
						.into_iter()
						.map(|doc| {
							let name = doc.filename.clone();
							view! {
								<article class="summary-card">
									<header>
										<h3>{doc.filename.clone()}</h3>
										{doc.completed_at.clone().map(|at| view! { <span class="date">{at}</span> })}
										<button on:click=move |_| set_preview.set(Some(name.clone()))>"View document"</button>
									</header>
									{summary_panel(doc.filename.clone(), store)}
								</article>
							}
						})
						.collect_view()
				}}
			</Show>
			{move || {
				preview
					.get()
					.map(|name| {
						view! {
							<div class="preview-dialog">
								<button class="close" on:click=move |_| set_preview.set(None)>"Close"</button>
								{preview_panel(name)}
							</div>
						}
					})
			}}
		</div>
	}
}
