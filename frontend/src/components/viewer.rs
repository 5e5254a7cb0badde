use leptos::prelude::*;

/// Embedded PDF preview, or a placeholder when no document is loaded.
#[component]
pub fn DocumentViewer(#[prop(into)] file_url: Signal<Option<String>>) -> impl IntoView {
    view! {
        <div class="document-viewer">
            {move || match file_url.get().filter(|url| !url.is_empty()) {
                Some(url) => view! {
                    <div class="viewer-card">
                        <div class="viewer-header">
                            <h2>"Document Preview"</h2>
                        </div>
                        <iframe src=url title="Document Viewer" class="viewer-frame"></iframe>
                    </div>
                }.into_any(),
                None => view! {
                    <div class="viewer-placeholder">
                        <p>"No document loaded yet. Please upload a PDF file."</p>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}
