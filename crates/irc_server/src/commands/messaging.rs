//! PRIVMSG/NOTICE routing to a channel or a single nick (§4.6).

use crate::connection::ConnectionId;
use crate::message::Message;
use crate::replies;
use crate::server::Server;

fn current_nick(server: &Server, id: ConnectionId) -> String {
    server.connections.get(&id).map(|c| c.nick().to_string()).unwrap_or_else(|| "*".into())
}

fn current_prefix(server: &Server, id: ConnectionId) -> String {
    server.connections.get(&id).map(|c| c.prefix()).unwrap_or_default()
}

fn is_channel_target(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}

fn route(server: &mut Server, id: ConnectionId, msg: &Message, command: &str, is_notice: bool) {
    let name = server.name.clone();
    let nick = current_nick(server, id);

    let Some(target) = msg.arg(0) else {
        if !is_notice {
            server.send_to_client(id, &replies::err_no_recipient(&name, &nick, command));
        }
        return;
    };
    let Some(text) = msg.arg(1) else {
        if !is_notice {
            server.send_to_client(id, &replies::err_no_text_to_send(&name, &nick));
        }
        return;
    };

    let prefix = current_prefix(server, id);
    let line = format!(":{prefix} {command} {target} :{text}");

    if is_channel_target(target) {
        let key = Server::channel_key(target);
        let Some(channel) = server.channels.get(&key) else {
            if !is_notice {
                server.send_to_client(id, &replies::err_no_such_channel(&name, &nick, target));
            }
            return;
        };
        if !channel.is_member(id) {
            if !is_notice {
                server.send_to_client(id, &replies::err_cannot_send_to_chan(&name, &nick, target));
            }
            return;
        }
        server.send_to_channel(&key, &line, Some(id));
    } else {
        let Some(target_id) = server.find_connection_by_nick(target) else {
            if !is_notice {
                server.send_to_client(id, &replies::err_no_such_nick(&name, &nick, target));
            }
            return;
        };
        server.send_to_client(target_id, &line);
    }
}

pub fn handle_privmsg(server: &mut Server, id: ConnectionId, msg: &Message) {
    route(server, id, msg, "PRIVMSG", false);
}

pub fn handle_notice(server: &mut Server, id: ConnectionId, msg: &Message) {
    route(server, id, msg, "NOTICE", true);
}
