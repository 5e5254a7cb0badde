//! What the document viewer points at, and which browser object URL the
//! page still owns.

#[derive(Clone, Debug, PartialEq, Eq)]
enum Source {
    /// `blob:` URL created from the selected file; must be revoked.
    Local(String),
    /// URL of the copy stored by the server.
    Stored(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preview {
    current: Option<Source>,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self) -> Option<&str> {
        match &self.current {
            Some(Source::Local(url) | Source::Stored(url)) => Some(url),
            None => None,
        }
    }

    /// Shows a freshly created object URL. Returns the object URL it
    /// replaces, which the caller revokes.
    pub fn show_local(&mut self, object_url: String) -> Option<String> {
        self.replace(Source::Local(object_url))
    }

    /// Shows the server's stored copy. Returns the object URL it
    /// replaces, which the caller revokes.
    pub fn show_stored(&mut self, url: String) -> Option<String> {
        self.replace(Source::Stored(url))
    }

    fn replace(&mut self, next: Source) -> Option<String> {
        match self.current.replace(next) {
            Some(Source::Local(previous)) => Some(previous),
            _ => None,
        }
    }
}
