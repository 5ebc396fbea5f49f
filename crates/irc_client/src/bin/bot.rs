//! Companion trivia bot (§6 External Interfaces, §10.5 supplemented
//! features). An ordinary IRC client, not part of the server: it registers,
//! joins one channel, answers PING, and posts a random line from a trivia
//! file whenever someone else posts to that channel. Grounded on
//! `original_source`'s `Bot/Bot.cpp`, generalized to read `trivia.txt` and
//! rejoin after a KICK the way the distilled spec calls for.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::path::PathBuf;

use clap::Parser;
use flexi_logger::Logger;
use log::{debug, error, info, warn};
use rand::seq::SliceRandom;

#[derive(Parser, Debug)]
#[command(name = "bot", about = "Companion trivia bot that exercises the server")]
struct Cli {
    /// Port the target server is listening on (connects to 127.0.0.1).
    port: u16,
    /// Connection password; pass "" if the server has none configured.
    password: String,
    /// Channel to join and answer trivia in.
    #[arg(long, default_value = "#weather")]
    channel: String,
    /// Nickname to register with.
    #[arg(long, default_value = "Bot")]
    nick: String,
    /// Path to a newline-delimited trivia file.
    #[arg(long, default_value = "trivia.txt")]
    trivia: PathBuf,
}

fn main() {
    if let Err(e) = Logger::try_with_env_or_str("info").and_then(|l| l.log_to_stderr().start()) {
        eprintln!("failed to start logger: {e}");
    }

    let cli = Cli::parse();
    let trivia = load_trivia(&cli.trivia);
    if trivia.is_empty() {
        warn!("no trivia lines loaded from {}; replies will be skipped", cli.trivia.display());
    }

    let stream = match TcpStream::connect(("127.0.0.1", cli.port)) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to connect to 127.0.0.1:{}: {e}", cli.port);
            std::process::exit(1);
        }
    };
    info!("connected to 127.0.0.1:{}", cli.port);

    let mut writer = match stream.try_clone() {
        Ok(w) => w,
        Err(e) => {
            error!("failed to clone connection: {e}");
            std::process::exit(1);
        }
    };
    let reader = BufReader::new(stream);

    register(&mut writer, &cli);

    let mut rng = rand::thread_rng();
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("read error: {e}");
                break;
            }
        };
        debug!("<< {line}");

        if let Some(token) = line.strip_prefix("PING ") {
            send_line(&mut writer, &format!("PONG {token}"));
            continue;
        }

        if was_kicked(&line, &cli.channel, &cli.nick) {
            warn!("kicked from {}, rejoining", cli.channel);
            send_line(&mut writer, &format!("JOIN {}", cli.channel));
            continue;
        }

        if is_privmsg_to_channel(&line, &cli.channel) {
            if let Some(reply) = trivia.choose(&mut rng) {
                send_line(&mut writer, &format!("PRIVMSG {} :{}", cli.channel, reply));
            }
        }
    }
    info!("connection closed, bot exiting");
}

fn register(writer: &mut TcpStream, cli: &Cli) {
    if !cli.password.is_empty() {
        send_line(writer, &format!("PASS {}", cli.password));
    }
    send_line(writer, &format!("NICK {}", cli.nick));
    send_line(writer, &format!("USER {} 0 * :Trivia Bot", cli.nick));
    send_line(writer, &format!("JOIN {}", cli.channel));
}

fn send_line(writer: &mut TcpStream, line: &str) {
    if let Err(e) = write!(writer, "{line}\r\n") {
        error!("failed to send {line:?}: {e}");
    }
}

fn load_trivia(path: &std::path::Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect(),
        Err(e) => {
            warn!("failed to read trivia file {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// True if `line` is a relayed `PRIVMSG` whose target is `channel` — the bot
/// doesn't care who the sender is, only that it wasn't itself (the server
/// never echoes a sender's own PRIVMSG back to them).
fn is_privmsg_to_channel(line: &str, channel: &str) -> bool {
    line.contains(&format!("PRIVMSG {channel} :"))
}

/// True if `line` is a `KICK` of this bot's own nick from `channel`.
fn was_kicked(line: &str, channel: &str, nick: &str) -> bool {
    line.contains(&format!("KICK {channel} {nick}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_privmsg_to_its_channel() {
        assert!(is_privmsg_to_channel(":alice!~alice@* PRIVMSG #weather :hi", "#weather"));
        assert!(!is_privmsg_to_channel(":alice!~alice@* PRIVMSG #other :hi", "#weather"));
    }

    #[test]
    fn detects_kick_of_its_own_nick() {
        assert!(was_kicked(":op!~op@* KICK #weather Bot :bye", "#weather", "Bot"));
        assert!(!was_kicked(":op!~op@* KICK #weather Other :bye", "#weather", "Bot"));
    }

    #[test]
    fn load_trivia_skips_blank_lines() {
        let dir = std::env::temp_dir().join(format!("bot_trivia_test_{}", std::process::id()));
        std::fs::write(&dir, "one\n\n  two  \n").unwrap();
        let lines = load_trivia(&dir);
        std::fs::remove_file(&dir).ok();
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }
}
