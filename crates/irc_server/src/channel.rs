//! State for one channel: members, operators, invitees, topic, and the
//! `itkl` mode flags. A `Channel` never holds a `Connection` directly —
//! only the socket token the `Server` uses to look members up, avoiding the
//! Connection/Channel reference cycle called out in the design notes.

use std::collections::BTreeSet;

use crate::connection::ConnectionId;

#[derive(Debug, Clone, Default)]
pub struct ChannelModes {
    pub invite_only: bool,
    pub topic_oper_only: bool,
    pub pass_required: bool,
    pub limited: bool,
    pub key: String,
    pub limit: usize,
}

#[derive(Debug)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub topic_set: bool,
    pub modes: ChannelModes,
    pub members: BTreeSet<ConnectionId>,
    pub operators: BTreeSet<ConnectionId>,
    pub invitees: BTreeSet<ConnectionId>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Channel {
            name: name.into(),
            topic: String::new(),
            topic_set: false,
            modes: ChannelModes::default(),
            members: BTreeSet::new(),
            operators: BTreeSet::new(),
            invitees: BTreeSet::new(),
        }
    }

    pub fn is_member(&self, id: ConnectionId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_operator(&self, id: ConnectionId) -> bool {
        self.operators.contains(&id)
    }

    pub fn is_full(&self) -> bool {
        self.modes.limited && self.members.len() >= self.modes.limit
    }

    /// Adds a member; the first joiner of an empty channel is automatically
    /// promoted to operator.
    pub fn add_member(&mut self, id: ConnectionId) {
        let first_joiner = self.members.is_empty();
        self.members.insert(id);
        if first_joiner {
            self.operators.insert(id);
        }
        self.invitees.remove(&id);
    }

    pub fn remove_member(&mut self, id: ConnectionId) {
        self.members.remove(&id);
        self.operators.remove(&id);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Renders the set of currently-on mode flags as `+itkl`-style text for
    /// `RPL_CHANNELMODEIS`, with `k`/`l` only appearing when meaningful.
    pub fn mode_string(&self) -> String {
        let mut flags = String::from("+");
        if self.modes.invite_only {
            flags.push('i');
        }
        if self.modes.topic_oper_only {
            flags.push('t');
        }
        if self.modes.pass_required {
            flags.push('k');
        }
        if self.modes.limited {
            flags.push('l');
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_joiner_becomes_operator() {
        let mut ch = Channel::new("#lobby");
        ch.add_member(ConnectionId(1));
        assert!(ch.is_operator(ConnectionId(1)));
        ch.add_member(ConnectionId(2));
        assert!(!ch.is_operator(ConnectionId(2)));
    }

    #[test]
    fn removing_last_member_makes_channel_empty() {
        let mut ch = Channel::new("#lobby");
        ch.add_member(ConnectionId(1));
        ch.remove_member(ConnectionId(1));
        assert!(ch.is_empty());
    }

    #[test]
    fn is_full_respects_limited_flag() {
        let mut ch = Channel::new("#lobby");
        ch.modes.limited = true;
        ch.modes.limit = 1;
        assert!(!ch.is_full());
        ch.add_member(ConnectionId(1));
        assert!(ch.is_full());
    }
}
