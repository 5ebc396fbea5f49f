//! WHOIS and TIME (§4.7).

use crate::connection::ConnectionId;
use crate::message::Message;
use crate::replies;
use crate::server::Server;

fn current_nick(server: &Server, id: ConnectionId) -> String {
    server.connections.get(&id).map(|c| c.nick().to_string()).unwrap_or_else(|| "*".into())
}

pub fn handle_whois(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);

    let Some(target_nick) = msg.arg(0) else {
        server.send_to_client(id, &replies::err_no_nickname_given(&name, &nick));
        return;
    };

    let Some(target_id) = server.find_connection_by_nick(target_nick) else {
        server.send_to_client(id, &replies::err_no_such_nick(&name, &nick, target_nick));
        return;
    };

    let (target_nick, target_user, target_host, realname, idle, channels) = {
        let conn = server.connections.get(&target_id).unwrap();
        let channels = conn
            .channels
            .iter()
            .filter_map(|key| server.channels.get(key))
            .map(|c| if c.is_operator(target_id) { format!("@{}", c.name) } else { c.name.clone() })
            .collect::<Vec<_>>()
            .join(" ");
        (
            conn.nick().to_string(),
            conn.user().to_string(),
            conn.host.clone(),
            conn.registration.realname.clone().unwrap_or_default(),
            conn.idle_seconds(),
            channels,
        )
    };

    server.send_to_client(id, &replies::whois_user(&name, &nick, &target_nick, &target_user, &target_host, &realname));
    if !channels.is_empty() {
        server.send_to_client(id, &replies::whois_channels(&name, &nick, &target_nick, &channels));
    }
    server.send_to_client(id, &replies::whois_server(&name, &nick, &target_nick));
    server.send_to_client(id, &replies::whois_idle(&name, &nick, &target_nick, idle));
    server.send_to_client(id, &replies::end_of_whois(&name, &nick, &target_nick));
}

pub fn handle_time(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);

    if let Some(target_server) = msg.arg(0) {
        if target_server != name {
            server.send_to_client(id, &replies::err_no_such_server(&name, &nick, target_server));
            return;
        }
    }

    let time_str = server.now_string();
    server.send_to_client(id, &replies::rpl_time(&name, &nick, &time_str));
}
