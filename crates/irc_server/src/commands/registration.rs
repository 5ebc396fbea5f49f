//! PASS/NICK/USER registration handshake, the trivial `CAP LS` surface,
//! PING/PONG, and QUIT — the handful of commands allowed before
//! authentication completes (§4.2, §4.3).

use crate::connection::ConnectionId;
use crate::message::Message;
use crate::parsers::is_valid_nickname;
use crate::replies;
use crate::server::Server;

pub fn handle_pass(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let Some(conn) = server.connections.get_mut(&id) else { return };

    if conn.is_authenticated() || conn.registration.pass.is_some() {
        let line = replies::err_already_registered(&name, conn.nick());
        drop(conn);
        server.send_to_client(id, &line);
        return;
    }
    let Some(password) = msg.arg(0) else {
        let line = replies::err_need_more_params(&name, conn.nick(), "PASS");
        drop(conn);
        server.send_to_client(id, &line);
        return;
    };
    conn.registration.pass = Some(password.to_string());
}

pub fn handle_nick(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let Some(new_nick) = msg.arg(0) else {
        let current = server.connections.get(&id).map(|c| c.nick().to_string()).unwrap_or_else(|| "*".into());
        server.send_to_client(id, &replies::err_no_nickname_given(&name, &current));
        return;
    };

    if !is_valid_nickname(new_nick) {
        let current = server.connections.get(&id).map(|c| c.nick().to_string()).unwrap_or_else(|| "*".into());
        server.send_to_client(id, &replies::err_erroneus_nickname(&name, &current, new_nick));
        return;
    }

    let self_is_current = server
        .connections
        .get(&id)
        .map(|c| c.registration.nick.as_deref() == Some(new_nick))
        .unwrap_or(false);
    if !self_is_current && server.nick_in_use(new_nick) {
        let current = server.connections.get(&id).map(|c| c.nick().to_string()).unwrap_or_else(|| "*".into());
        server.send_to_client(id, &replies::err_nickname_in_use(&name, &current, new_nick));
        return;
    }

    let (was_authenticated, old_prefix) = {
        let Some(conn) = server.connections.get(&id) else { return };
        (conn.is_authenticated(), conn.prefix())
    };

    if was_authenticated {
        let mut notified = std::collections::BTreeSet::new();
        notified.insert(id);
        if let Some(conn) = server.connections.get(&id) {
            for key in &conn.channels {
                if let Some(channel) = server.channels.get(key) {
                    notified.extend(channel.members.iter().copied());
                }
            }
        }
        let line = format!(":{old_prefix} NICK :{new_nick}");
        for member in notified {
            server.send_to_client(member, &line);
        }
    }

    if let Some(conn) = server.connections.get_mut(&id) {
        conn.registration.nick = Some(new_nick.to_string());
    }
    try_authenticate(server, id);
}

pub fn handle_user(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let Some(conn) = server.connections.get_mut(&id) else { return };

    if conn.registration.user.is_some() {
        let line = replies::err_already_registered(&name, conn.nick());
        drop(conn);
        server.send_to_client(id, &line);
        return;
    }
    if msg.params.len() < 4 {
        let line = replies::err_need_more_params(&name, conn.nick(), "USER");
        drop(conn);
        server.send_to_client(id, &line);
        return;
    }
    conn.registration.user = Some(msg.params[0].clone());
    conn.registration.realname = Some(msg.params[3].clone());
    try_authenticate(server, id);
}

fn try_authenticate(server: &mut Server, id: ConnectionId) {
    let name = server.name.clone();
    let Some(conn) = server.connections.get(&id) else { return };
    if conn.is_authenticated() || !conn.registration.is_complete() {
        return;
    }

    if let Some(expected) = &server.password {
        if !expected.is_empty() && conn.registration.pass.as_deref() != Some(expected.as_str()) {
            let line = replies::err_passwd_mismatch(&name, conn.nick());
            server.send_to_client(id, &line);
            return;
        }
    }

    let (nick, user, host) = {
        let conn = server.connections.get_mut(&id).unwrap();
        conn.mark_authenticated();
        (conn.nick().to_string(), conn.user().to_string(), conn.host.clone())
    };

    server.send_to_client(id, &replies::welcome(&name, &nick, &user, &host));
    server.send_to_client(id, &replies::your_host(&name, &nick));
    let created_at = server.created_at.clone();
    server.send_to_client(id, &replies::created(&name, &nick, &created_at));
    server.send_to_client(id, &replies::my_info(&name, &nick));
}

pub fn handle_cap(server: &mut Server, id: ConnectionId, msg: &Message) {
    let nick = server.connections.get(&id).map(|c| c.nick().to_string()).unwrap_or_else(|| "*".into());
    let Some(sub) = msg.arg(0) else { return };
    match sub.to_ascii_uppercase().as_str() {
        "LS" | "LIST" => server.send_to_client(id, &format!("CAP {nick} {} :", sub.to_ascii_uppercase())),
        "REQ" => {
            let requested = msg.arg(1).unwrap_or("");
            server.send_to_client(id, &format!("CAP {nick} NAK :{requested}"));
        }
        "END" => {}
        _ => {}
    }
}

pub fn handle_ping(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let Some(token) = msg.arg(0) else {
        let nick = server.connections.get(&id).map(|c| c.nick().to_string()).unwrap_or_else(|| "*".into());
        server.send_to_client(id, &replies::err_no_origin(&name, &nick));
        return;
    };

    if let Some(target_server) = msg.arg(1) {
        if target_server != name {
            let nick = server.connections.get(&id).map(|c| c.nick().to_string()).unwrap_or_else(|| "*".into());
            server.send_to_client(id, &replies::err_no_such_server(&name, &nick, target_server));
            return;
        }
        server.send_to_client(id, &format!(":{name} PONG {name} {token}"));
        return;
    }
    server.send_to_client(id, &format!(":{name} PONG :{token}"));
}

pub fn handle_quit(server: &mut Server, id: ConnectionId, msg: &Message) {
    let reason = msg.arg(0).map(str::to_string).unwrap_or_else(|| "Client Quit".to_string());
    if let Some(conn) = server.connections.get_mut(&id) {
        conn.quit_reason = Some(reason);
        conn.wants_to_quit = true;
    }
}
