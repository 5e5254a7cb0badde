use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{File, Url};

use crate::api;
use crate::models::UploadReceipt;
use crate::preview::Preview;
use crate::transcript::Transcript;

/// Page-level state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub transcript: ReadSignal<Transcript>,
    pub document_url: ReadSignal<Option<String>>,
    pub session_id: ReadSignal<Option<String>>,
    pub upload_error: ReadSignal<Option<String>>,

    // --- Write signals (for mutating state) ---
    pub set_transcript: WriteSignal<Transcript>,
    pub set_document_url: WriteSignal<Option<String>>,
    pub set_session_id: WriteSignal<Option<String>>,
    pub set_upload_error: WriteSignal<Option<String>>,

    /// Source of `document_url`; owns the object URL until it is replaced.
    preview: StoredValue<Preview>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let (transcript, set_transcript) = signal(Transcript::new());
        let (document_url, set_document_url) = signal(None::<String>);
        let (session_id, set_session_id) = signal(None::<String>);
        let (upload_error, set_upload_error) = signal(None::<String>);

        let state = Self {
            transcript,
            document_url,
            session_id,
            upload_error,
            set_transcript,
            set_document_url,
            set_session_id,
            set_upload_error,
            preview: StoredValue::new(Preview::new()),
        };

        provide_context(state);
        state
    }

    pub fn is_waiting(&self) -> bool {
        self.transcript.with(Transcript::is_waiting)
    }

    /// Records the question and asks the backend. Exactly one assistant
    /// message lands after it, the answer or the fixed error text.
    pub fn send_question(&self, text: String) {
        let mut ticket = None;
        self.set_transcript.update(|t| ticket = t.submit(&text));
        let Some(ticket) = ticket else {
            return;
        };

        let state = *self;
        let session_id = self.session_id.get_untracked();
        spawn_local(async move {
            match api::send_chat(&text, session_id).await {
                Ok(resp) => {
                    if let Some(id) = resp.session_id.clone() {
                        state.set_session_id.set(Some(id));
                    }
                    state.set_transcript.update(|t| {
                        t.resolve(ticket, resp.into_message());
                    });
                }
                Err(e) => {
                    log::error!("Failed to fetch answer: {e}");
                    state.set_transcript.update(|t| {
                        t.fail(ticket);
                    });
                }
            }
        });
    }

    /// Previews a just-accepted file from its in-memory bytes.
    pub fn show_local_file(&self, file: &File) {
        match Url::create_object_url_with_blob(file) {
            Ok(url) => {
                self.update_preview(|p| p.show_local(url));
                self.set_upload_error.set(None);
            }
            Err(e) => log::error!("Failed to create object URL: {e:?}"),
        }
    }

    /// Switches the preview to the stored copy named by the upload response.
    pub fn adopt_upload(&self, result: serde_json::Value) {
        let receipt: UploadReceipt = serde_json::from_value(result).unwrap_or_default();
        if let Some(id) = receipt.session_id {
            self.set_session_id.set(Some(id));
        }
        if let Some(url) = receipt.url {
            self.update_preview(|p| p.show_stored(api::resolve_url(&url)));
        }
        self.set_upload_error.set(None);
    }

    pub fn report_upload_error(&self, message: String) {
        log::warn!("Upload rejected: {message}");
        self.set_upload_error.set(Some(message));
    }

    /// Applies `change`, publishes the new viewer URL, and revokes the
    /// object URL it displaced.
    fn update_preview(&self, change: impl FnOnce(&mut Preview) -> Option<String>) {
        let outcome = self.preview.try_update_value(|p| {
            let revoked = change(p);
            (p.url().map(str::to_string), revoked)
        });
        let Some((url, revoked)) = outcome else {
            return;
        };
        self.set_document_url.set(url);
        if let Some(stale) = revoked {
            if let Err(e) = Url::revoke_object_url(&stale) {
                log::warn!("Failed to revoke object URL: {e:?}");
            }
        }
    }
}
