mod api;
mod components;
mod models;
mod preview;
mod state;
mod transcript;
mod upload;

use leptos::mount::mount_to_body;
use leptos::prelude::*;
use web_sys::File;

use components::chat::ChatPanel;
use components::upload::FileUpload;
use components::viewer::DocumentViewer;
use state::AppState;

/// Root application component: upload and preview on the left, chat on the right.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();

    view! {
        <main class="app-container">
            <section class="document-column">
                <header class="column-header">
                    <h1>"Financial Document Viewer"</h1>
                    <p class="subtitle">"Upload a PDF document below."</p>
                </header>

                // Upload error banner
                {move || {
                    state.upload_error.get().map(|err| {
                        view! { <div class="error-banner">{err}</div> }
                    })
                }}

                <FileUpload
                    on_upload=move |file: File| state.show_local_file(&file)
                    on_upload_complete=move |result: serde_json::Value| state.adopt_upload(result)
                    on_upload_error=move |message: String| state.report_upload_error(message)
                />
                <DocumentViewer file_url=state.document_url />
            </section>

            <ChatPanel on_send=move |question: String| state.send_question(question) />
        </main>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
