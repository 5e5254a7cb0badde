use crate::models::ChatMessage;

/// Handle for a submitted question; redeemed exactly once with its reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug, PartialEq)]
struct Turn {
    seq: u64,
    question: ChatMessage,
    reply: Option<ChatMessage>,
}

/// Ordered chat history.
///
/// Every question owns the slot right after it for its reply, so replies
/// that complete out of order still render in submission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_seq: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the user turn. Blank input is ignored.
    pub fn submit(&mut self, question: &str) -> Option<Ticket> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.turns.push(Turn { seq, question: ChatMessage::user(question), reply: None });
        Some(Ticket(seq))
    }

    /// Fills the reply slot of `ticket`. A ticket that is unknown or
    /// already answered is ignored and `false` is returned.
    pub fn resolve(&mut self, ticket: Ticket, reply: ChatMessage) -> bool {
        match self.turns.iter_mut().find(|t| t.seq == ticket.0) {
            Some(turn) if turn.reply.is_none() => {
                turn.reply = Some(reply);
                true
            }
            _ => false,
        }
    }

    pub fn fail(&mut self, ticket: Ticket) -> bool {
        self.resolve(ticket, ChatMessage::send_error())
    }

    /// True while any question is waiting for its reply.
    pub fn is_waiting(&self) -> bool {
        self.turns.iter().any(|t| t.reply.is_none())
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .flat_map(|t| std::iter::once(&t.question).chain(t.reply.as_ref()))
            .cloned()
            .collect()
    }
}
