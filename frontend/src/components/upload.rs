use gloo_timers::callback::Timeout;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{File, HtmlInputElement};

use crate::api;
use crate::state::AppState;
use crate::upload::{SETTLE_DELAY_MS, SelectedFile, UploadPhase, UploadRejection, UploadTracker};

/// PDF picker with click and drag-and-drop, plus the upload button.
///
/// * `on_upload` fires as soon as a file passes validation.
/// * `on_upload_complete` receives the server's response body.
/// * `on_upload_error` receives validation and network failures.
#[component]
pub fn FileUpload(
    #[prop(into)] on_upload: Callback<File>,
    #[prop(into)] on_upload_complete: Callback<serde_json::Value>,
    #[prop(into)] on_upload_error: Callback<String>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (tracker, set_tracker) = signal(UploadTracker::new());
    let selected = StoredValue::new_local(None::<File>);
    let input_ref = NodeRef::<html::Input>::new();

    let handle_file = move |file: File| {
        let meta = SelectedFile {
            name: file.name(),
            size: file.size() as u64,
            mime: file.type_(),
        };
        let mut outcome = Ok(());
        set_tracker.update(|t| outcome = t.select(meta));
        match outcome {
            Ok(()) => {
                selected.set_value(Some(file.clone()));
                on_upload.run(file);
            }
            Err(UploadRejection::Busy) => log::info!("Ignoring {} while uploading", file.name()),
            Err(rejection) => on_upload_error.run(rejection.message().to_string()),
        }
    };

    let on_change = move |ev: ev::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        if let Some(file) = input.files().and_then(|list| list.get(0)) {
            handle_file(file);
        }
        // Let the same file be picked again
        input.set_value("");
    };

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        if let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|list| list.get(0))
        {
            handle_file(file);
        }
    };

    let on_dragover = move |ev: ev::DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
    };

    let open_picker = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let handle_upload = move |_| {
        let Some(file) = selected.get_value() else {
            return;
        };
        let mut started = false;
        set_tracker.update(|t| started = t.begin());
        if !started {
            return;
        }

        let session_id = state.session_id.get_untracked();
        spawn_local(async move {
            let result = api::upload_document(&file, session_id).await;
            set_tracker.update(|t| t.finish(result.is_ok()));
            match result {
                Ok(body) => on_upload_complete.run(body),
                Err(message) => on_upload_error.run(message),
            }
            Timeout::new(SETTLE_DELAY_MS, move || {
                set_tracker.update(UploadTracker::settle);
            })
            .forget();
        });
    };

    let is_busy = move || tracker.with(UploadTracker::is_busy);

    view! {
        <div class="upload-card">
            <div
                class="drop-zone"
                on:click=open_picker
                on:dragover=on_dragover
                on:drop=on_drop
            >
                <p class="drop-hint">
                    {move || tracker.with(|t| match t.file() {
                        Some(file) => format!("Selected: {}", file.name),
                        None => "Click or drag & drop a PDF file here".to_string(),
                    })}
                </p>
            </div>
            <input
                node_ref=input_ref
                type="file"
                accept="application/pdf"
                class="hidden"
                on:change=on_change
            />

            <Show when=move || tracker.with(|t| t.file().is_some())>
                <div class="upload-row">
                    <span class="file-name">
                        {move || tracker.with(|t| t.file().map(|f| f.name.clone()).unwrap_or_default())}
                    </span>
                    <button class="upload-btn" on:click=handle_upload disabled=is_busy>
                        {move || {
                            if tracker.with(|t| t.phase() == UploadPhase::Uploading) {
                                "Uploading..."
                            } else {
                                "Upload"
                            }
                        }}
                    </button>
                </div>
            </Show>

            <Show when=is_busy>
                <progress
                    class="upload-progress"
                    max="100"
                    value=move || tracker.with(|t| t.progress().to_string())
                ></progress>
            </Show>
        </div>
    }
}
