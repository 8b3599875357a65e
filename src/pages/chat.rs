use std::time::Duration;

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::components::chat::{ChatMessage, Citation, Role};
use crate::components::documents::{select_all_completed, toggle_selection};
use crate::components::store::{ChatStore, DocumentStore};

const REVEAL_MS: u64 = 600;

fn citation_chip(citation: Citation) -> impl IntoView {
	let title = citation.filename.clone();
	view! {
		<span class="citation" title=title>
			<span class="file">{citation.filename}</span>
			{citation.page.map(|p| view! { <span class="page">{format!("p.{}", p)}</span> })}
		</span>
	}
}

fn message_bubble(msg: ChatMessage) -> impl IntoView {
	let class = match (msg.role, msg.is_error, msg.revealed) {
		(Role::User, _, _) => "message user",
		(Role::Assistant, true, _) => "message assistant error",
		(Role::Assistant, false, false) => "message assistant reveal",
		(Role::Assistant, false, true) => "message assistant",
	};
	let meta = (msg.role == Role::Assistant && !msg.is_error).then(|| {
		let confidence = msg.confidence.map(|c| format!("{:.0}% confidence", c * 100.0));
		view! {
			<div class="meta">
				{confidence.map(|c| view! { <span>{c}</span> })}
				{msg.model.clone().map(|m| view! { <span class="model">{m}</span> })}
			</div>
		}
	});
	view! {
		<div class=class>
			<p>{msg.content}</p>
			<div class="sources">{msg.sources.into_iter().map(citation_chip).collect_view()}</div>
			{meta}
		</div>
	}
}

/// Question answering over the selected documents.
#[component]
pub fn ChatPage() -> impl IntoView {
	let client = use_context::<ApiClient>().unwrap_or_default();
	let docs = use_context::<DocumentStore>().unwrap_or_default();
	let chat = use_context::<ChatStore>().unwrap_or_default();

	let (draft, set_draft) = signal(String::new());
	let (notice, set_notice) = signal(None::<String>);

	// answers animate in once; the flag lives on the message
	Effect::new(move |_| {
		let fresh: Vec<u64> = chat
			.conversation
			.with(|c| c.messages().iter().filter(|m| !m.revealed).map(|m| m.id).collect());
		if !fresh.is_empty() {
			set_timeout(
				move || {
					chat.conversation.update(|c| {
						for id in &fresh {
							c.mark_revealed(*id);
						}
					})
				},
				Duration::from_millis(REVEAL_MS),
			);
		}
	});

	let send = move || {
		if chat.pending.get_untracked() {
			return;
		}
		let question = draft.get_untracked();
		let selected = docs.selected.get_untracked();
		match chat.send(client.clone(), question, selected) {
			Ok(()) => {
				set_draft.set(String::new());
				set_notice.set(None);
			}
			Err(message) => set_notice.set(Some(message)),
		}
	};
	let send_key = send.clone();

	view! {
		<div class="chat-page">
			<aside class="doc-selector">
				<h2>"Documents"</h2>
				<div class="selector-actions">
					<button on:click=move |_| docs.selected.set(docs.docs.with(|d| select_all_completed(d)))>
						"All"
					</button>
					<button on:click=move |_| docs.selected.set(Vec::new())>"None"</button>
				</div>
				<ul>
					{move || {
						docs.docs
							.get()
							.into_iter()
							.filter(|d| d.status.allows_actions())
							.map(|d| {
								let name = d.filename.clone();
								let checked = {
									let name = name.clone();
									move || docs.selected.with(|s| s.contains(&name))
								};
								let toggle = name.clone();
								view! {
									<li>
										<label>
											<input
												type="checkbox"
												prop:checked=checked
												on:change=move |_| docs.selected.update(|s| toggle_selection(s, &toggle))
											/>
											{name}
										</label>
									</li>
								}
							})
							.collect_view()
					}}
				</ul>
			</aside>

			<section class="conversation">
				<header>
					<span>{move || format!("{} documents selected", docs.selected.with(Vec::len))}</span>
					<button on:click=move |_| chat.conversation.update(|c| c.clear())>"Clear chat"</button>
				</header>
				<div class="messages">
					<Show
						when=move || !chat.conversation.with(|c| c.is_empty())
						fallback=|| view! { <p class="chat-empty">"Select documents and ask a question."</p> }
					>
						{move || {
							chat.conversation
								.with(|c| c.messages().to_vec())
								.into_iter()
								.map(message_bubble)
								.collect_view()
						}}
					</Show>
					<Show when=move || chat.pending.get()>
						<div class="message assistant thinking">"Searching documents..."</div>
					</Show>
				</div>
				{move || notice.get().map(|n| view! { <p class="notice">{n}</p> })}
				<form
					class="chat-input"
					on:submit=move |ev| {
						ev.prevent_default();
						send();
					}
				>
					<textarea
						placeholder="Ask about the selected documents..."
						prop:value=draft
						on:input=move |ev| set_draft.set(event_target_value(&ev))
						on:keydown=move |ev| {
							if ev.key() == "Enter" && !ev.shift_key() {
								ev.prevent_default();
								send_key();
							}
						}
					></textarea>
					<button type="submit" disabled=move || chat.pending.get()>"Send"</button>
				</form>
			</section>
		</div>
	}
}
