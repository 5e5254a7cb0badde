//! Upload widget logic, kept free of browser types so it can be unit tested.

pub const PDF_MIME: &str = "application/pdf";

/// 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Progress shown as soon as a request is in flight. It is not derived from
/// the transfer; only success moves it to 100.
pub const IN_FLIGHT_PROGRESS: u8 = 10;

/// How long the outcome stays on screen before the widget settles back.
pub const SETTLE_DELAY_MS: u32 = 500;

/// Message used when the server fails without saying why.
pub const UPLOAD_FAILED: &str = "Upload failed";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadRejection {
    NotPdf,
    TooLarge,
    /// A send is under way or its outcome is still on screen.
    Busy,
}

impl UploadRejection {
    pub fn message(&self) -> &'static str {
        match self {
            UploadRejection::NotPdf => "Only PDF files are allowed.",
            UploadRejection::TooLarge => "File size must be less than 10MB.",
            UploadRejection::Busy => "Wait for the current upload to finish.",
        }
    }
}

impl std::fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Type first, then size; the first failing check wins.
pub fn validate(file: &SelectedFile) -> Result<(), UploadRejection> {
    if file.mime != PDF_MIME {
        return Err(UploadRejection::NotPdf);
    }
    if file.size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FileSelected,
    Uploading,
    Complete,
    Failed,
}

/// `Idle → FileSelected → Uploading → (Complete | Failed) → FileSelected`.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadTracker {
    file: Option<SelectedFile>,
    phase: UploadPhase,
    progress: u8,
}

impl Default for UploadTracker {
    fn default() -> Self {
        Self { file: None, phase: UploadPhase::Idle, progress: 0 }
    }
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Shown while a request is in flight or its outcome is on screen.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            UploadPhase::Uploading | UploadPhase::Complete | UploadPhase::Failed
        )
    }

    /// Validates and, on success, makes `file` the current selection.
    /// A rejected file leaves the current selection untouched. Nothing can
    /// be selected until the current upload has settled, so the response
    /// always belongs to the file on screen.
    pub fn select(&mut self, file: SelectedFile) -> Result<(), UploadRejection> {
        if self.is_busy() {
            return Err(UploadRejection::Busy);
        }
        validate(&file)?;
        self.file = Some(file);
        self.phase = UploadPhase::FileSelected;
        self.progress = 0;
        Ok(())
    }

    /// Enters `Uploading`; `false` when there is nothing to send or a send
    /// is already under way.
    pub fn begin(&mut self) -> bool {
        if self.file.is_none() || self.is_busy() {
            return false;
        }
        self.phase = UploadPhase::Uploading;
        self.progress = IN_FLIGHT_PROGRESS;
        true
    }

    pub fn finish(&mut self, succeeded: bool) {
        if self.phase != UploadPhase::Uploading {
            return;
        }
        if succeeded {
            self.phase = UploadPhase::Complete;
            self.progress = 100;
        } else {
            self.phase = UploadPhase::Failed;
        }
    }

    /// Runs after [`SETTLE_DELAY_MS`], whatever the outcome.
    pub fn settle(&mut self) {
        if matches!(self.phase, UploadPhase::Complete | UploadPhase::Failed) {
            self.phase = UploadPhase::FileSelected;
            self.progress = 0;
        }
    }
}

/// Classifies an upload response: a non-2xx status or an `error` field is
/// a failure carrying that message (or [`UPLOAD_FAILED`]).
pub fn interpret_response(
    ok: bool,
    body: Option<serde_json::Value>,
) -> Result<serde_json::Value, String> {
    let error = body
        .as_ref()
        .and_then(|b| b.get("error"))
        .filter(|e| !e.is_null())
        .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()));

    match (ok, error, body) {
        (_, Some(message), _) => Err(message),
        (true, None, Some(body)) => Ok(body),
        _ => Err(UPLOAD_FAILED.to_string()),
    }
}
