//! Numeric reply formatting (RFC 2812 §5). Each function renders exactly
//! one line (without the trailing `\r\n`, which the caller's output buffer
//! appends); the server's own prefix (`:<server-name>`) is threaded through
//! every call rather than hard-coded, since the server name is configurable.

use crate::constants::*;

/// Shared shape for most error replies: `:server CODE target [param] :text [end]`,
/// matching the reference implementation's generic error-message builder.
pub fn err_generic(server: &str, target: &str, code: u16, param: &str, text: &str, end: &str) -> String {
    let mut s = format!(":{server} {code:03} {target} ");
    if !param.is_empty() {
        s.push_str(param);
        s.push(' ');
    }
    s.push(':');
    s.push_str(text);
    if !end.is_empty() {
        s.push(' ');
        s.push_str(end);
    }
    s
}

pub fn err_no_such_nick(server: &str, target: &str, nick: &str) -> String {
    err_generic(server, target, ERR_NOSUCHNICK_NB, nick, ERR_NOSUCHNICK_STR, "")
}

pub fn err_no_such_server(server: &str, target: &str, attempted: &str) -> String {
    err_generic(server, target, ERR_NOSUCHSERVER_NB, attempted, ERR_NOSUCHSERVER_STR, "")
}

pub fn err_no_such_channel(server: &str, target: &str, channel: &str) -> String {
    err_generic(server, target, ERR_NOSUCHCHANNEL_NB, channel, ERR_NOSUCHCHANNEL_STR, "")
}

pub fn err_cannot_send_to_chan(server: &str, target: &str, channel: &str) -> String {
    err_generic(server, target, ERR_CANNOTSENDTOCHAN_NB, channel, ERR_CANNOTSENDTOCHAN_STR, "")
}

pub fn err_no_origin(server: &str, target: &str) -> String {
    err_generic(server, target, ERR_NOORIGIN_NB, "", ERR_NOORIGIN_STR, "")
}

pub fn err_no_recipient(server: &str, target: &str, command: &str) -> String {
    err_generic(server, target, ERR_NORECIPIENT_NB, "", &format!("{ERR_NORECIPIENT_STR} ({command})"), "")
}

pub fn err_no_text_to_send(server: &str, target: &str) -> String {
    err_generic(server, target, ERR_NOTEXTTOSEND_NB, "", ERR_NOTEXTTOSEND_STR, "")
}

pub fn err_unknown_command(server: &str, target: &str, command: &str) -> String {
    err_generic(server, target, ERR_UNKNOWNCOMMAND_NB, command, ERR_UNKNOWNCOMMAND_STR, "")
}

pub fn err_no_nickname_given(server: &str, target: &str) -> String {
    err_generic(server, target, ERR_NONICKNAMEGIVEN_NB, "", ERR_NONICKNAMEGIVEN_STR, "")
}

pub fn err_erroneus_nickname(server: &str, target: &str, attempted: &str) -> String {
    err_generic(server, target, ERR_ERRONEUSNICKNAME_NB, attempted, ERR_ERRONEUSNICKNAME_STR, "")
}

pub fn err_nickname_in_use(server: &str, target: &str, attempted: &str) -> String {
    err_generic(server, target, ERR_NICKNAMEINUSE_NB, attempted, ERR_NICKNAMEINUSE_STR, "")
}

pub fn err_user_not_in_channel(server: &str, target: &str, nick: &str, channel: &str) -> String {
    err_generic(server, target, ERR_USERNOTINCHANNEL_NB, nick, ERR_USERNOTINCHANNEL_STR, channel)
}

pub fn err_not_on_channel(server: &str, target: &str, channel: &str) -> String {
    err_generic(server, target, ERR_NOTONCHANNEL_NB, channel, ERR_NOTONCHANNEL_STR, "")
}

pub fn err_user_on_channel(server: &str, target: &str, nick: &str, channel: &str) -> String {
    err_generic(server, target, ERR_USERONCHANNEL_NB, nick, ERR_USERONCHANNEL_STR, channel)
}

pub fn err_not_registered(server: &str, target: &str) -> String {
    err_generic(server, target, ERR_NOTREGISTERED_NB, "", ERR_NOTREGISTERED_STR, "")
}

pub fn err_need_more_params(server: &str, target: &str, command: &str) -> String {
    err_generic(server, target, ERR_NEEDMOREPARAMS_NB, command, ERR_NEEDMOREPARAMS_STR, "")
}

pub fn err_already_registered(server: &str, target: &str) -> String {
    err_generic(server, target, ERR_ALREADYREGISTRED_NB, "", ERR_ALREADYREGISTRED_STR, "")
}

pub fn err_passwd_mismatch(server: &str, target: &str) -> String {
    err_generic(server, target, ERR_PASSWDMISMATCH_NB, "", ERR_PASSWDMISMATCH_STR, "")
}

pub fn err_channel_is_full(server: &str, target: &str, channel: &str) -> String {
    err_generic(server, target, ERR_CHANNELISFULL_NB, channel, ERR_CHANNELISFULL_STR, "")
}

pub fn err_unknown_mode(server: &str, target: &str, mode_char: char, channel: &str) -> String {
    err_generic(
        server,
        target,
        ERR_UNKNOWNMODE_NB,
        &mode_char.to_string(),
        ERR_UNKNOWNMODE_STR,
        channel,
    )
}

pub fn err_invite_only_chan(server: &str, target: &str, channel: &str) -> String {
    err_generic(server, target, ERR_INVITEONLYCHAN_NB, channel, ERR_INVITEONLYCHAN_STR, "")
}

pub fn err_bad_channel_key(server: &str, target: &str, channel: &str) -> String {
    err_generic(server, target, ERR_BADCHANNELKEY_NB, channel, ERR_BADCHANNELKEY_STR, "")
}

pub fn err_chan_o_priv_needed(server: &str, target: &str, channel: &str) -> String {
    err_generic(server, target, ERR_CHANOPRIVSNEEDED_NB, channel, ERR_CHANOPRIVSNEEDED_STR, "")
}

// --- RPL_* replies: each has its own body shape, so these are not routed
// through `err_generic`. ---

pub fn welcome(server: &str, nick: &str, user: &str, host: &str) -> String {
    format!(
        ":{server} {RPL_WELCOME:03} {nick} :Welcome to the Internet Relay Network {nick}!~{user}@{host}"
    )
}

pub fn your_host(server: &str, nick: &str) -> String {
    format!(":{server} {RPL_YOURHOST:03} {nick} :Your host is {server}, running version {SERVER_VERSION}")
}

pub fn created(server: &str, nick: &str, created_at: &str) -> String {
    format!(":{server} {RPL_CREATED:03} {nick} :This server was created {created_at}")
}

pub fn my_info(server: &str, nick: &str) -> String {
    format!(":{server} {RPL_MYINFO:03} {nick} {server} {SERVER_VERSION} - {USER_MODES}")
}

pub fn whois_user(server: &str, nick: &str, target_nick: &str, target_user: &str, target_host: &str, realname: &str) -> String {
    format!(":{server} {RPL_WHOISUSER:03} {nick} {target_nick} ~{target_user} {target_host} * :{realname}")
}

pub fn whois_server(server: &str, nick: &str, target_nick: &str) -> String {
    format!(":{server} {RPL_WHOISSERVER:03} {nick} {target_nick} {server} :rustirc server")
}

pub fn whois_idle(server: &str, nick: &str, target_nick: &str, idle_seconds: u64) -> String {
    format!(":{server} {RPL_WHOISIDLE:03} {nick} {target_nick} {idle_seconds} :seconds idle")
}

pub fn whois_channels(server: &str, nick: &str, target_nick: &str, channels: &str) -> String {
    format!(":{server} {RPL_WHOISCHANNELS:03} {nick} {target_nick} :{channels}")
}

pub fn end_of_whois(server: &str, nick: &str, target_nick: &str) -> String {
    format!(":{server} {RPL_ENDOFWHOIS:03} {nick} {target_nick} :End of WHOIS list")
}

pub fn list(server: &str, nick: &str, channel: &str, member_count: usize, topic: &str) -> String {
    format!(":{server} {RPL_LIST:03} {nick} {channel} {member_count} :{topic}")
}

pub fn list_end(server: &str, nick: &str) -> String {
    format!(":{server} {RPL_LISTEND:03} {nick} :End of LIST")
}

pub fn channel_mode_is(server: &str, nick: &str, channel: &str, modes: &str) -> String {
    format!(":{server} {RPL_CHANNELMODEIS:03} {nick} {channel} {modes}")
}

pub fn no_topic(server: &str, nick: &str, channel: &str) -> String {
    format!(":{server} {RPL_NOTOPIC:03} {nick} {channel} :No topic is set")
}

pub fn topic(server: &str, nick: &str, channel: &str, topic: &str) -> String {
    format!(":{server} {RPL_TOPIC:03} {nick} {channel} :{topic}")
}

pub fn inviting(server: &str, nick: &str, channel: &str, target_nick: &str) -> String {
    format!(":{server} {RPL_INVITING:03} {nick} {channel} {target_nick}")
}

pub fn name_reply(server: &str, nick: &str, channel: &str, names: &str) -> String {
    format!(":{server} {RPL_NAMREPLY:03} {nick} = {channel} :{names}")
}

pub fn end_of_names(server: &str, nick: &str, channel: &str) -> String {
    format!(":{server} {RPL_ENDOFNAMES:03} {nick} {channel} :End of NAMES list")
}

pub fn rpl_time(server: &str, nick: &str, time_str: &str) -> String {
    format!(":{server} {RPL_TIME:03} {nick} {server} :{time_str}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_matches_reference_shape() {
        let line = welcome("localhost", "alice", "alice", "*");
        assert_eq!(
            line,
            ":localhost 001 alice :Welcome to the Internet Relay Network alice!~alice@*"
        );
    }

    #[test]
    fn err_nickname_in_use_uses_star_for_unregistered_sender() {
        let line = err_nickname_in_use("localhost", "*", "alice");
        assert_eq!(line, ":localhost 433 * alice :Nickname is already in use");
    }

    #[test]
    fn err_unknown_mode_carries_channel_as_trailing_end() {
        let line = err_unknown_mode("localhost", "alice", 'q', "#room");
        assert_eq!(line, ":localhost 472 alice q :is unknown mode char to me #room");
    }

    #[test]
    fn name_reply_lists_operators_with_at_prefix() {
        let line = name_reply("localhost", "alice", "#lobby", "@alice");
        assert_eq!(line, ":localhost 353 alice = #lobby :@alice");
    }
}
