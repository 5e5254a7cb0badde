use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::models::{ChatMessage, Sender};
use crate::state::AppState;
use crate::transcript::Transcript;

/// Chat transcript, loading indicator, and question input.
///
/// Sending is delegated to `on_send`; the transcript itself is read from
/// the page's [`AppState`].
#[component]
pub fn ChatPanel(#[prop(into)] on_send: Callback<String>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let container = NodeRef::<html::Div>::new();

    // Scroll to the end whenever the transcript (and so the loading flag) changes
    Effect::new(move |_| {
        state.transcript.track();
        if let Some(el) = container.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <section class="chat-panel">
            <div class="chat-header">"Ask Your Document Assistant"</div>

            // Messages
            <div class="messages-container" node_ref=container>
                {move || {
                    let messages = state.transcript.with(Transcript::messages);
                    if messages.is_empty() {
                        view! {
                            <div class="empty-state">
                                "Upload a document and ask a question about it"
                            </div>
                        }.into_any()
                    } else {
                        messages
                            .into_iter()
                            .map(|message| view! { <MessageBubble message=message /> })
                            .collect_view()
                            .into_any()
                    }
                }}
                <Show when=move || state.is_waiting()>
                    <div class="loading-indicator">
                        <span class="spinner"></span>
                        "Generating answer..."
                    </div>
                </Show>
            </div>

            <ChatInput on_send=on_send />
        </section>
    }
}

/// A single chat message bubble with its citations.
#[component]
fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let css_class = match message.sender {
        Sender::User => "message user",
        Sender::Assistant => "message assistant",
    };
    let sources = message.visible_sources().to_vec();
    let citations = (!sources.is_empty()).then(move || {
        view! {
            <div class="sources">
                <div class="sources-title">"Sources:"</div>
                <ul>
                    {sources
                        .into_iter()
                        .map(|source| {
                            let excerpt = source.content.clone().unwrap_or_default();
                            view! { <li title=excerpt>{source.label()}</li> }
                        })
                        .collect_view()}
                </ul>
            </div>
        }
    });

    view! {
        <div class=css_class>
            <div class="message-text">{message.text}</div>
            {citations}
        </div>
    }
}

/// Question form. Disabled while a question is in flight.
#[component]
fn ChatInput(on_send: Callback<String>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());

    let is_sending = move || state.is_waiting();

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let text = input.get_untracked().trim().to_string();
        if text.is_empty() || is_sending() {
            return;
        }
        set_input.set(String::new());
        on_send.run(text);
    };

    view! {
        <form class="input-row" on:submit=on_submit>
            <input
                type="text"
                placeholder="Ask something..."
                prop:value=input
                on:input=move |ev| {
                    set_input.set(event_target_value(&ev));
                }
            />
            <button
                type="submit"
                class="send-btn"
                disabled=move || is_sending() || input.get().trim().is_empty()
            >
                {move || if is_sending() { "Sending…" } else { "Send" }}
            </button>
        </form>
    }
}
