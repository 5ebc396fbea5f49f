//! JOIN/PART/MODE/TOPIC/NAMES/LIST/INVITE/KICK (§4.3, §4.4, §4.5).

use crate::channel::Channel;
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

/// Builds the space-separated `@nick`-prefixed NAMES body using the live
/// nick lookup on `server` (the channel itself only stores connection ids).
fn names_body(server: &Server, channel: &Channel) -> String {
    channel
        .members
        .iter()
        .map(|member| {
            let nick = server.connections.get(member).map(|c| c.nick().to_string()).unwrap_or_default();
            if channel.is_operator(*member) {
                format!("@{nick}")
            } else {
                nick
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn send_names(server: &mut Server, id: ConnectionId, channel_name: &str, key: &str) {
    let name = server.name.clone();
    let nick = current_nick(server, id);
    let Some(channel) = server.channels.get(key) else { return };
    let body = names_body(server, channel);
    server.send_to_client(id, &replies::name_reply(&name, &nick, channel_name, &body));
    server.send_to_client(id, &replies::end_of_names(&name, &nick, channel_name));
}

pub fn handle_join(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);

    let Some(targets) = msg.arg(0) else {
        server.send_to_client(id, &replies::err_need_more_params(&name, &nick, "JOIN"));
        return;
    };

    if targets == "0" {
        let prefix = current_prefix(server, id);
        let keys: Vec<String> = server.connections.get(&id).map(|c| c.channels.iter().cloned().collect()).unwrap_or_default();
        for key in keys {
            if let Some(channel) = server.channels.get(&key) {
                let line = format!(":{prefix} PART {} :", channel.name);
                server.send_to_channel(&key, &line, None);
            }
            if let Some(channel) = server.channels.get_mut(&key) {
                channel.remove_member(id);
                if channel.is_empty() {
                    server.channels.remove(&key);
                }
            }
        }
        if let Some(conn) = server.connections.get_mut(&id) {
            conn.channels.clear();
        }
        return;
    }

    let names: Vec<&str> = targets.split(',').collect();
    let keys_arg: Vec<&str> = msg.arg(1).map(|k| k.split(',').collect()).unwrap_or_default();

    for (i, chan_name) in names.into_iter().enumerate() {
        let supplied_key = keys_arg.get(i).copied();
        join_one(server, id, chan_name, supplied_key);
    }
}

fn join_one(server: &mut Server, id: ConnectionId, chan_name: &str, supplied_key: Option<&str>) {
    use crate::parsers::is_valid_channel_name;

    let name = server.name.clone();
    let nick = current_nick(server, id);

    if !is_valid_channel_name(chan_name) {
        server.send_to_client(id, &replies::err_no_such_channel(&name, &nick, chan_name));
        return;
    }

    let key = Server::channel_key(chan_name);
    if !server.channels.contains_key(&key) {
        server.channels.insert(key.clone(), Channel::new(chan_name));
    }

    if server.channels.get(&key).map(|c| c.is_member(id)).unwrap_or(false) {
        return;
    }

    {
        let channel = server.channels.get(&key).unwrap();
        if channel.modes.invite_only && !channel.invitees.contains(&id) {
            server.send_to_client(id, &replies::err_invite_only_chan(&name, &nick, chan_name));
            return;
        }
        if channel.is_full() {
            server.send_to_client(id, &replies::err_channel_is_full(&name, &nick, chan_name));
            return;
        }
        if channel.modes.pass_required {
            let matches = supplied_key == Some(channel.modes.key.as_str());
            if !matches {
                server.send_to_client(id, &replies::err_bad_channel_key(&name, &nick, chan_name));
                return;
            }
        }
    }

    server.channels.get_mut(&key).unwrap().add_member(id);
    if let Some(conn) = server.connections.get_mut(&id) {
        conn.channels.insert(key.clone());
    }

    let prefix = current_prefix(server, id);
    let join_line = format!(":{prefix} JOIN {chan_name}");
    server.send_to_channel(&key, &join_line, None);

    let (topic_set, topic) = {
        let channel = server.channels.get(&key).unwrap();
        (channel.topic_set, channel.topic.clone())
    };
    if topic_set {
        server.send_to_client(id, &replies::topic(&name, &nick, chan_name, &topic));
    }
    send_names(server, id, chan_name, &key);
}

pub fn handle_part(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);
    let Some(targets) = msg.arg(0) else {
        server.send_to_client(id, &replies::err_need_more_params(&name, &nick, "PART"));
        return;
    };
    let reason = msg.arg(1).unwrap_or("");

    for chan_name in targets.split(',') {
        let key = Server::channel_key(chan_name);
        let Some(channel) = server.channels.get(&key) else {
            server.send_to_client(id, &replies::err_no_such_channel(&name, &nick, chan_name));
            continue;
        };
        if !channel.is_member(id) {
            server.send_to_client(id, &replies::err_not_on_channel(&name, &nick, chan_name));
            continue;
        }

        let prefix = current_prefix(server, id);
        let line = format!(":{prefix} PART {chan_name} :{reason}");
        server.send_to_channel(&key, &line, None);

        if let Some(channel) = server.channels.get_mut(&key) {
            channel.remove_member(id);
            if channel.is_empty() {
                server.channels.remove(&key);
            }
        }
        if let Some(conn) = server.connections.get_mut(&id) {
            conn.channels.remove(&key);
        }
    }
}

pub fn handle_topic(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);
    let Some(chan_name) = msg.arg(0) else {
        server.send_to_client(id, &replies::err_need_more_params(&name, &nick, "TOPIC"));
        return;
    };
    let key = Server::channel_key(chan_name);
    let Some(channel) = server.channels.get(&key) else {
        server.send_to_client(id, &replies::err_no_such_channel(&name, &nick, chan_name));
        return;
    };
    if !channel.is_member(id) {
        server.send_to_client(id, &replies::err_not_on_channel(&name, &nick, chan_name));
        return;
    }

    match msg.arg(1) {
        None => {
            if channel.topic_set {
                let topic = channel.topic.clone();
                server.send_to_client(id, &replies::topic(&name, &nick, chan_name, &topic));
            } else {
                server.send_to_client(id, &replies::no_topic(&name, &nick, chan_name));
            }
        }
        Some(new_topic) => {
            if channel.modes.topic_oper_only && !channel.is_operator(id) {
                server.send_to_client(id, &replies::err_chan_o_priv_needed(&name, &nick, chan_name));
                return;
            }
            let new_topic = new_topic.to_string();
            if let Some(channel) = server.channels.get_mut(&key) {
                channel.topic = new_topic.clone();
                channel.topic_set = true;
            }
            let prefix = current_prefix(server, id);
            let line = format!(":{prefix} TOPIC {chan_name} :{new_topic}");
            server.send_to_channel(&key, &line, None);
        }
    }
}

pub fn handle_names(server: &mut Server, id: ConnectionId, msg: &Message) {
    let targets: Vec<String> = match msg.arg(0) {
        Some(t) => t.split(',').map(str::to_string).collect(),
        None => server.channels.values().map(|c| c.name.clone()).collect(),
    };
    for chan_name in targets {
        let key = Server::channel_key(&chan_name);
        if server.channels.contains_key(&key) {
            send_names(server, id, &chan_name, &key);
        }
    }
}

pub fn handle_list(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);
    let targets: Vec<String> = match msg.arg(0) {
        Some(t) => t.split(',').map(str::to_string).collect(),
        None => server.channels.values().map(|c| c.name.clone()).collect(),
    };
    for chan_name in targets {
        let key = Server::channel_key(&chan_name);
        if let Some(channel) = server.channels.get(&key) {
            let line = replies::list(&name, &nick, &channel.name, channel.members.len(), &channel.topic);
            server.send_to_client(id, &line);
        }
    }
    server.send_to_client(id, &replies::list_end(&name, &nick));
}

pub fn handle_invite(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);
    let (Some(target_nick), Some(chan_name)) = (msg.arg(0), msg.arg(1)) else {
        server.send_to_client(id, &replies::err_need_more_params(&name, &nick, "INVITE"));
        return;
    };

    let Some(target_id) = server.find_connection_by_nick(target_nick) else {
        server.send_to_client(id, &replies::err_no_such_nick(&name, &nick, target_nick));
        return;
    };

    let key = Server::channel_key(chan_name);
    let Some(channel) = server.channels.get(&key) else {
        server.send_to_client(id, &replies::err_no_such_channel(&name, &nick, chan_name));
        return;
    };
    if !channel.is_member(id) {
        server.send_to_client(id, &replies::err_not_on_channel(&name, &nick, chan_name));
        return;
    }
    if channel.is_member(target_id) {
        server.send_to_client(id, &replies::err_user_on_channel(&name, &nick, target_nick, chan_name));
        return;
    }
    if channel.modes.invite_only && !channel.is_operator(id) {
        server.send_to_client(id, &replies::err_chan_o_priv_needed(&name, &nick, chan_name));
        return;
    }

    server.channels.get_mut(&key).unwrap().invitees.insert(target_id);
    let prefix = current_prefix(server, id);
    server.send_to_client(target_id, &format!(":{prefix} INVITE {target_nick} {chan_name}"));
    server.send_to_client(id, &replies::inviting(&name, &nick, chan_name, target_nick));
}

pub fn handle_kick(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);
    let (Some(chans_arg), Some(users_arg)) = (msg.arg(0), msg.arg(1)) else {
        server.send_to_client(id, &replies::err_need_more_params(&name, &nick, "KICK"));
        return;
    };
    let reason = msg.arg(2).map(str::to_string).unwrap_or_else(|| nick.clone());

    let chans: Vec<&str> = chans_arg.split(',').collect();
    let users: Vec<&str> = users_arg.split(',').collect();

    for (i, chan_name) in chans.iter().enumerate() {
        let target_nick = if users.len() == 1 { users[0] } else { users.get(i).copied().unwrap_or("") };
        if target_nick.is_empty() {
            continue;
        }
        kick_one(server, id, &nick, chan_name, target_nick, &reason);
    }
}

fn kick_one(server: &mut Server, id: ConnectionId, nick: &str, chan_name: &str, target_nick: &str, reason: &str) {
    let name = server.name.clone();
    let key = Server::channel_key(chan_name);
    let Some(channel) = server.channels.get(&key) else {
        server.send_to_client(id, &replies::err_no_such_channel(&name, nick, chan_name));
        return;
    };
    if !channel.is_member(id) {
        server.send_to_client(id, &replies::err_not_on_channel(&name, nick, chan_name));
        return;
    }
    if !channel.is_operator(id) {
        server.send_to_client(id, &replies::err_chan_o_priv_needed(&name, nick, chan_name));
        return;
    }
    let Some(target_id) = server.find_connection_by_nick(target_nick) else {
        server.send_to_client(id, &replies::err_no_such_nick(&name, nick, target_nick));
        return;
    };
    if !channel.is_member(target_id) {
        server.send_to_client(id, &replies::err_user_not_in_channel(&name, nick, target_nick, chan_name));
        return;
    }

    let prefix = current_prefix(server, id);
    let line = format!(":{prefix} KICK {chan_name} {target_nick} :{reason}");
    server.send_to_channel(&key, &line, None);

    if let Some(channel) = server.channels.get_mut(&key) {
        channel.remove_member(target_id);
        if channel.is_empty() {
            server.channels.remove(&key);
        }
    }
    if let Some(conn) = server.connections.get_mut(&target_id) {
        conn.channels.remove(&key);
    }
}

pub fn handle_mode(server: &mut Server, id: ConnectionId, msg: &Message) {
    let name = server.name.clone();
    let nick = current_nick(server, id);

    let Some(chan_name) = msg.arg(0) else {
        server.send_to_client(id, &replies::err_need_more_params(&name, &nick, "MODE"));
        return;
    };
    let key = Server::channel_key(chan_name);
    if !server.channels.contains_key(&key) {
        server.send_to_client(id, &replies::err_no_such_channel(&name, &nick, chan_name));
        return;
    }

    let Some(mode_string) = msg.arg(1) else {
        let modes = server.channels.get(&key).unwrap().mode_string();
        server.send_to_client(id, &replies::channel_mode_is(&name, &nick, chan_name, &modes));
        return;
    };

    if let Some(bad) = mode_string.chars().find(|c| !"+-itklo".contains(*c)) {
        server.send_to_client(id, &replies::err_unknown_mode(&name, &nick, bad, chan_name));
        return;
    }
    if !mode_string.chars().any(|c| "itklo".contains(c)) {
        return;
    }
    if !server.channels.get(&key).unwrap().is_operator(id) {
        server.send_to_client(id, &replies::err_chan_o_priv_needed(&name, &nick, chan_name));
        return;
    }

    let mut required = 0usize;
    let mut setting = true;
    for c in mode_string.chars() {
        match c {
            '+' => setting = true,
            '-' => setting = false,
            'k' | 'o' => required += 1,
            'l' if setting => required += 1,
            _ => {}
        }
    }
    let supplied: Vec<String> = msg.params.get(2..).map(|s| s.to_vec()).unwrap_or_default();
    if supplied.len() < required {
        server.send_to_client(id, &replies::err_need_more_params(&name, &nick, "MODE"));
        return;
    }

    let mut param_iter = supplied.into_iter();
    let mut setting = true;
    let mut changes: Vec<(bool, char)> = Vec::new();
    let mut retained_params: Vec<String> = Vec::new();

    for c in mode_string.chars() {
        match c {
            '+' => setting = true,
            '-' => setting = false,
            'i' => {
                let cur = server.channels.get(&key).unwrap().modes.invite_only;
                if cur == setting {
                    continue;
                }
                server.channels.get_mut(&key).unwrap().modes.invite_only = setting;
                changes.push((setting, 'i'));
            }
            't' => {
                let cur = server.channels.get(&key).unwrap().modes.topic_oper_only;
                if cur == setting {
                    continue;
                }
                server.channels.get_mut(&key).unwrap().modes.topic_oper_only = setting;
                changes.push((setting, 't'));
            }
            'k' => {
                let param = param_iter.next().unwrap_or_default();
                if setting {
                    let ch = server.channels.get_mut(&key).unwrap();
                    ch.modes.key = param.clone();
                    ch.modes.pass_required = true;
                    changes.push((true, 'k'));
                    retained_params.push(param);
                } else {
                    let current_key = server.channels.get(&key).unwrap().modes.key.clone();
                    if current_key == param {
                        let ch = server.channels.get_mut(&key).unwrap();
                        ch.modes.key.clear();
                        ch.modes.pass_required = false;
                        changes.push((false, 'k'));
                    }
                }
            }
            'l' => {
                if setting {
                    let param = param_iter.next().unwrap_or_default();
                    match param.parse::<i64>() {
                        Ok(n) if n >= 0 => {
                            let ch = server.channels.get_mut(&key).unwrap();
                            ch.modes.limit = n as usize;
                            ch.modes.limited = true;
                            changes.push((true, 'l'));
                            retained_params.push(n.to_string());
                        }
                        _ => {}
                    }
                } else {
                    let cur = server.channels.get(&key).unwrap().modes.limited;
                    if cur {
                        server.channels.get_mut(&key).unwrap().modes.limited = false;
                        changes.push((false, 'l'));
                    }
                }
            }
            'o' => {
                let target_nick = param_iter.next().unwrap_or_default();
                let target_id = server.find_connection_by_nick(&target_nick);
                let is_member = target_id.map(|t| server.channels.get(&key).unwrap().is_member(t)).unwrap_or(false);
                if !is_member {
                    server.send_to_client(id, &replies::err_user_not_in_channel(&name, &nick, &target_nick, chan_name));
                    continue;
                }
                let target_id = target_id.unwrap();
                let ch = server.channels.get_mut(&key).unwrap();
                if setting {
                    ch.operators.insert(target_id);
                } else {
                    ch.operators.remove(&target_id);
                }
                changes.push((setting, 'o'));
                retained_params.push(target_nick);
            }
            _ => {}
        }
    }

    if changes.is_empty() {
        return;
    }

    let mut aggregated = String::new();
    let mut last_sign: Option<bool> = None;
    for (sign, letter) in &changes {
        if last_sign != Some(*sign) {
            aggregated.push(if *sign { '+' } else { '-' });
            last_sign = Some(*sign);
        }
        aggregated.push(*letter);
    }

    let prefix = current_prefix(server, id);
    let mut line = format!(":{prefix} MODE {chan_name} {aggregated}");
    for p in &retained_params {
        line.push(' ');
        line.push_str(p);
    }
    server.send_to_channel(&key, &line, None);
}
