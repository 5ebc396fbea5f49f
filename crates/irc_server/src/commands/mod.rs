//! Command dispatch: a mapping from upper-cased command name to a handler
//! function, and the registration gate that sits in front of it (§4.2).

mod channel_ops;
mod messaging;
mod misc;
mod registration;

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::connection::ConnectionId;
use crate::message::Message;
use crate::replies;
use crate::server::Server;

type Handler = fn(&mut Server, ConnectionId, &Message);

/// Commands allowed before authentication completes (§4.2 registration gate).
/// Anything else, including QUIT and PING, is answered with 451 while
/// unregistered — this is the literal reading of §4.2 and §8's quantified
/// invariant, not a convenience relaxation.
const PRE_AUTH_ALLOWED: &[&str] = &["PASS", "NICK", "USER", "CAP"];

fn table() -> &'static HashMap<&'static str, Handler> {
    static TABLE: OnceLock<HashMap<&'static str, Handler>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut m: HashMap<&'static str, Handler> = HashMap::new();
        m.insert("PASS", registration::handle_pass);
        m.insert("NICK", registration::handle_nick);
        m.insert("USER", registration::handle_user);
        m.insert("CAP", registration::handle_cap);
        m.insert("PING", registration::handle_ping);
        m.insert("QUIT", registration::handle_quit);
        m.insert("JOIN", channel_ops::handle_join);
        m.insert("PART", channel_ops::handle_part);
        m.insert("MODE", channel_ops::handle_mode);
        m.insert("TOPIC", channel_ops::handle_topic);
        m.insert("NAMES", channel_ops::handle_names);
        m.insert("LIST", channel_ops::handle_list);
        m.insert("INVITE", channel_ops::handle_invite);
        m.insert("KICK", channel_ops::handle_kick);
        m.insert("PRIVMSG", messaging::handle_privmsg);
        m.insert("NOTICE", messaging::handle_notice);
        m.insert("WHOIS", misc::handle_whois);
        m.insert("TIME", misc::handle_time);
        m
    })
}

/// Dispatches one parsed line for `id`, enforcing the registration gate
/// (§4.2) and falling back to `421 ERR_UNKNOWNCOMMAND` for anything not in
/// the table.
pub fn dispatch(server: &mut Server, id: ConnectionId, msg: &Message) {
    let authenticated = server
        .connections
        .get(&id)
        .map(|c| c.is_authenticated())
        .unwrap_or(false);

    if !authenticated && !PRE_AUTH_ALLOWED.contains(&msg.command.as_str()) {
        server.not_registered(id);
        return;
    }

    match table().get(msg.command.as_str()) {
        Some(handler) => handler(server, id, msg),
        None => {
            let name = server.name.clone();
            let nick = server
                .connections
                .get(&id)
                .map(|c| c.nick().to_string())
                .unwrap_or_else(|| "*".to_string());
            server.send_to_client(id, &replies::err_unknown_command(&name, &nick, &msg.command));
        }
    }
}
