//! End-to-end scenarios from spec §8, driven over real `TcpStream`s against a
//! `Server` bound to an ephemeral loopback port on a background thread —
//! the teacher pack favors direct construction over mocks, so these spin up
//! the real event loop rather than stubbing the command dispatcher.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use irc_server::server::Server;

fn start_server(password: Option<&str>) -> SocketAddr {
    let terminate = Arc::new(AtomicBool::new(false));
    let mut server = Server::bind(0, password.map(str::to_string), "localhost".to_string(), terminate)
        .expect("server should bind to an ephemeral port");
    let addr = server.local_addr().expect("listener should have a local address");
    std::thread::spawn(move || {
        let _ = server.run();
    });
    addr
}

struct Client {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).expect("client should connect");
        stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let writer = stream.try_clone().expect("clone stream");
        Client { writer, reader: BufReader::new(stream) }
    }

    fn send(&mut self, line: &str) {
        write!(self.writer, "{line}\r\n").expect("write should succeed");
    }

    fn recv(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("should receive a reply line before timeout");
        line.trim_end_matches(['\r', '\n']).to_string()
    }

    /// PASS (if given) / NICK / USER, draining the four welcome replies.
    fn register(&mut self, nick: &str, password: Option<&str>) {
        if let Some(p) = password {
            self.send(&format!("PASS {p}"));
        }
        self.send(&format!("NICK {nick}"));
        self.send(&format!("USER {nick} 0 * :{nick} Realname"));
        let welcome = self.recv();
        assert!(welcome.starts_with(":localhost 001"), "unexpected welcome line: {welcome}");
        for _ in 0..3 {
            self.recv();
        }
    }
}

#[test]
fn registration_with_password_emits_welcome_burst() {
    let addr = start_server(Some("s3cret"));
    let mut alice = Client::connect(addr);
    alice.send("PASS s3cret");
    alice.send("NICK alice");
    alice.send("USER alice 0 * :Alice");

    assert_eq!(
        alice.recv(),
        ":localhost 001 alice :Welcome to the Internet Relay Network alice!~alice@*"
    );
    assert!(alice.recv().starts_with(":localhost 002"));
    assert!(alice.recv().starts_with(":localhost 003"));
    assert!(alice.recv().starts_with(":localhost 004"));
}

#[test]
fn wrong_password_is_rejected() {
    let addr = start_server(Some("s3cret"));
    let mut alice = Client::connect(addr);
    alice.send("PASS wrong");
    alice.send("NICK alice");
    alice.send("USER alice 0 * :Alice");
    assert_eq!(alice.recv(), ":localhost 464 alice :Password incorrect");
}

#[test]
fn duplicate_nickname_is_rejected() {
    let addr = start_server(None);
    let mut alice = Client::connect(addr);
    alice.register("alice", None);

    let mut bob = Client::connect(addr);
    bob.send("NICK alice");
    assert_eq!(bob.recv(), ":localhost 433 * alice :Nickname is already in use");
}

#[test]
fn channel_creation_makes_first_joiner_operator() {
    let addr = start_server(None);
    let mut alice = Client::connect(addr);
    alice.register("alice", None);

    alice.send("JOIN #lobby");
    assert_eq!(alice.recv(), ":alice!~alice@* JOIN #lobby");
    assert_eq!(alice.recv(), ":localhost 353 alice = #lobby :@alice");
    assert_eq!(alice.recv(), ":localhost 366 alice #lobby :End of NAMES list");
}

#[test]
fn invite_only_bypass_via_invite() {
    let addr = start_server(None);
    let mut alice = Client::connect(addr);
    alice.register("alice", None);
    let mut bob = Client::connect(addr);
    bob.register("bob", None);

    alice.send("JOIN #priv");
    for _ in 0..3 {
        alice.recv();
    }
    alice.send("MODE #priv +i");
    assert_eq!(alice.recv(), ":alice!~alice@* MODE #priv +i");

    bob.send("JOIN #priv");
    assert_eq!(bob.recv(), ":localhost 473 bob #priv :Cannot join channel (+i)");

    alice.send("INVITE bob #priv");
    assert_eq!(bob.recv(), ":alice!~alice@* INVITE bob #priv");
    assert_eq!(alice.recv(), ":localhost 341 alice #priv bob");

    bob.send("JOIN #priv");
    assert_eq!(bob.recv(), ":bob!~bob@* JOIN #priv");
    assert_eq!(bob.recv(), ":localhost 353 bob = #priv :@alice bob");
    assert_eq!(bob.recv(), ":localhost 366 bob #priv :End of NAMES list");
    // Alice, already a member, sees the same JOIN broadcast.
    assert_eq!(alice.recv(), ":bob!~bob@* JOIN #priv");
}

#[test]
fn key_change_ignores_wrong_removal_key() {
    let addr = start_server(None);
    let mut op = Client::connect(addr);
    op.register("op", None);
    op.send("JOIN #r");
    for _ in 0..3 {
        op.recv();
    }

    op.send("MODE #r +k hunter2");
    assert_eq!(op.recv(), ":op!~op@* MODE #r +k hunter2");

    // Wrong key: ignored, no broadcast arrives. Follow it with a command
    // that does reply, to prove nothing queued ahead of it either.
    op.send("MODE #r -k wrong");
    op.send("TIME");
    let reply = op.recv();
    assert!(reply.starts_with(":localhost 391"), "expected TIME reply with no MODE broadcast first, got: {reply}");

    op.send("MODE #r -k hunter2");
    assert_eq!(op.recv(), ":op!~op@* MODE #r -k");
}

#[test]
fn mode_limit_negative_leaves_channel_unlimited() {
    let addr = start_server(None);
    let mut op = Client::connect(addr);
    op.register("op", None);
    op.send("JOIN #r");
    for _ in 0..3 {
        op.recv();
    }

    // +l -1 is elided entirely (no broadcast); confirm by following with a
    // command that does produce a reply and checking it arrives first.
    op.send("MODE #r +l -1");
    op.send("MODE #r");
    let reply = op.recv();
    assert_eq!(reply, ":localhost 324 op #r +");
}

#[test]
fn quit_notifies_channel_members_and_empty_channel_is_destroyed() {
    let addr = start_server(None);
    let mut alice = Client::connect(addr);
    alice.register("alice", None);
    let mut bob = Client::connect(addr);
    bob.register("bob", None);

    alice.send("JOIN #room");
    for _ in 0..3 {
        alice.recv();
    }
    bob.send("JOIN #room");
    for _ in 0..3 {
        bob.recv();
    }
    assert_eq!(alice.recv(), ":bob!~bob@* JOIN #room");

    alice.send("QUIT :bye");
    assert_eq!(bob.recv(), ":alice!~alice@* QUIT :bye");

    bob.send("QUIT :also bye");
    std::thread::sleep(Duration::from_millis(100));

    let mut carol = Client::connect(addr);
    carol.register("carol", None);
    carol.send("LIST #room");
    assert_eq!(carol.recv(), ":localhost 323 carol :End of LIST");
}

#[test]
fn command_before_registration_gets_not_registered_error() {
    let addr = start_server(None);
    let mut alice = Client::connect(addr);
    alice.send("JOIN #lobby");
    assert_eq!(alice.recv(), ":localhost 451 * :You have not registered");
}

#[test]
fn nickname_at_length_boundary() {
    let addr = start_server(None);
    let mut client = Client::connect(addr);
    let nick_50 = "a".repeat(50);
    client.send(&format!("NICK {nick_50}"));
    client.send(&format!("USER {nick_50} 0 * :Name"));
    assert_eq!(
        client.recv(),
        format!(":localhost 001 {nick_50} :Welcome to the Internet Relay Network {nick_50}!~{nick_50}@*")
    );
}

#[test]
fn nickname_over_length_boundary_is_rejected() {
    let addr = start_server(None);
    let mut client = Client::connect(addr);
    let nick_51 = "a".repeat(51);
    client.send(&format!("NICK {nick_51}"));
    assert_eq!(client.recv(), format!(":localhost 432 * {nick_51} :Erroneous nickname"));
}

#[test]
fn line_split_across_two_writes_assembles_correctly() {
    let addr = start_server(None);
    let mut client = Client::connect(addr);
    client.writer.write_all(b"NICK spl").unwrap();
    std::thread::sleep(Duration::from_millis(50));
    client.writer.write_all(b"it\r\nUSER split 0 * :Split\r\n").unwrap();

    assert_eq!(
        client.recv(),
        ":localhost 001 split :Welcome to the Internet Relay Network split!~split@*"
    );
}

#[test]
fn privmsg_reaches_other_members_only() {
    let addr = start_server(None);
    let mut alice = Client::connect(addr);
    alice.register("alice", None);
    let mut bob = Client::connect(addr);
    bob.register("bob", None);
    let mut carol = Client::connect(addr);
    carol.register("carol", None);

    alice.send("JOIN #a");
    for _ in 0..3 {
        alice.recv();
    }
    bob.send("JOIN #a");
    for _ in 0..3 {
        bob.recv();
    }
    alice.recv(); // bob's JOIN broadcast

    alice.send("PRIVMSG #a :hello there");
    assert_eq!(bob.recv(), ":alice!~alice@* PRIVMSG #a :hello there");

    // Carol, who never joined, gets nothing: prove it by having her issue a
    // command that does reply and checking that reply arrives, unprefixed by
    // any PRIVMSG relay.
    carol.send("TIME");
    let reply = carol.recv();
    assert!(reply.starts_with(":localhost 391"), "carol should not have seen the channel message: {reply}");
}
