//! Manager inbox: an append-only message log.
//!
//! RULE: messages are never removed or edited; the read flag is the only
//! mutable field. The unread count is a cache rebuilt by `recount()`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{InboxMessage, MessageKind, Priority},
    error::{CareerError, CareerResult},
    types::{Matchday, MessageId, SeasonIndex},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbox {
    messages: Vec<InboxMessage>,
    unread:   usize,
}

/// A message before it is stamped with an id and date.
#[derive(Debug, Clone)]
pub struct Draft {
    pub kind:     MessageKind,
    pub subject:  String,
    pub body:     String,
    pub sender:   String,
    pub priority: Priority,
}

impl Draft {
    pub fn new(kind: MessageKind, priority: Priority, sender: &str, subject: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            body: String::new(),
            sender: sender.to_string(),
            priority,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

impl Inbox {
    pub fn push(&mut self, draft: Draft, season: SeasonIndex, matchday: Matchday, date: NaiveDate) -> MessageId {
        let id = self.messages.len() as MessageId + 1;
        self.messages.push(InboxMessage {
            id,
            kind: draft.kind,
            subject: draft.subject,
            body: draft.body,
            sender: draft.sender,
            priority: draft.priority,
            season,
            matchday,
            date,
            read: false,
        });
        self.unread += 1;
        id
    }

    pub fn mark_read(&mut self, id: MessageId) -> CareerResult<()> {
        let msg = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(CareerError::MessageNotFound(id))?;
        if !msg.read {
            msg.read = true;
            self.unread -= 1;
        }
        Ok(())
    }

    pub fn messages(&self) -> &[InboxMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    /// Rebuild the cached unread count from the log.
    pub fn recount(&mut self) {
        self.unread = self.messages.iter().filter(|m| !m.read).count();
    }

    /// Unread messages, most urgent first, newest first within a priority.
    pub fn unread_by_priority(&self) -> Vec<&InboxMessage> {
        let mut unread: Vec<&InboxMessage> = self.messages.iter().filter(|m| !m.read).collect();
        unread.sort_by(|a, b| a.priority.cmp(&b.priority).then(b.id.cmp(&a.id)));
        unread
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 8).unwrap()
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut inbox = Inbox::default();
        let id = inbox.push(Draft::new(MessageKind::News, Priority::Low, "Press", "Hello"), 2026, 1, date());
        assert_eq!(inbox.unread_count(), 1);
        inbox.mark_read(id).unwrap();
        inbox.mark_read(id).unwrap();
        assert_eq!(inbox.unread_count(), 0);
        assert!(matches!(inbox.mark_read(99), Err(CareerError::MessageNotFound(99))));
    }

    #[test]
    fn unread_sorted_by_priority() {
        let mut inbox = Inbox::default();
        inbox.push(Draft::new(MessageKind::News, Priority::Low, "Press", "a"), 2026, 1, date());
        inbox.push(Draft::new(MessageKind::Board, Priority::Urgent, "Board", "b"), 2026, 1, date());
        inbox.push(Draft::new(MessageKind::Staff, Priority::Normal, "Scout", "c"), 2026, 1, date());
        let subjects: Vec<_> = inbox.unread_by_priority().iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["b", "c", "a"]);
    }
}
