use crate::models::{ChatMessage, Citation};

/// Fixed citations attached to every simulated answer.
const SIMULATED_SOURCES: [(&str, u32, f64); 2] = [
    ("Revenue breakdown is shown in Note 5.", 7, 0.87),
    ("Net profit appears in consolidated statement.", 2, 0.82),
];

/// Stand-in for the retrieval backend: answers every question with a
/// deterministic templated reply and two fabricated citations.
///
/// Whatever replaces it must keep the `answer` / `sources[{content, page, score}]`
/// shape, which is what the client renders.
#[derive(Clone, Debug, Default)]
pub struct SimulatedAssistant;

impl SimulatedAssistant {
    pub fn new() -> Self {
        Self
    }

    pub fn sources(&self) -> Vec<Citation> {
        SIMULATED_SOURCES
            .iter()
            .map(|(content, page, score)| Citation::new(content, *page, *score))
            .collect()
    }

    pub fn answer_text(&self, question: &str) -> String {
        format!("This is a simulated answer for: \"{question}\"")
    }

    /// Produces the assistant turn for `question`.
    pub fn reply(&self, question: &str) -> ChatMessage {
        ChatMessage::assistant(self.answer_text(question), self.sources())
    }
}
