//! Server core: dual-stack bootstrap, the poll-based event loop, the
//! connection/channel tables, and the fan-out helpers every command handler
//! builds on.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};
use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token};

use crate::casefold::fold;
use crate::channel::Channel;
use crate::commands;
use crate::connection::{Connection, ConnectionId};
use crate::errors::ServerError;
use crate::message::Message;
use crate::net;
use crate::replies;

/// Poll wait timeout (§4.1): the loop re-checks the termination flag at
/// least this often even with no socket activity.
const POLL_TIMEOUT: Duration = Duration::from_secs(5);

const LISTENER_IPV4: Token = Token(usize::MAX - 1);
const LISTENER_IPV6: Token = Token(usize::MAX - 2);

pub struct Server {
    pub name: String,
    pub password: Option<String>,
    pub created_at: String,
    pub terminate: Arc<AtomicBool>,

    pub(crate) connections: HashMap<ConnectionId, Connection>,
    pub(crate) channels: HashMap<String, Channel>,

    next_token: usize,
    poll: Poll,
    listener_v4: Option<TcpListener>,
    listener_v6: Option<TcpListener>,
}

impl Server {
    pub fn bind(port: u16, password: Option<String>, name: String, terminate: Arc<AtomicBool>) -> Result<Self, ServerError> {
        let poll = Poll::new().map_err(|e| ServerError::Bind {
            family: "poll",
            port,
            source: e,
        })?;

        let mut listener_v4 = net::bind_ipv4(port).map_err(|e| {
            error!("{e}");
            e
        }).ok();
        let mut listener_v6 = net::bind_ipv6(port).map_err(|e| {
            error!("{e}");
            e
        }).ok();

        if listener_v4.is_none() && listener_v6.is_none() {
            return Err(ServerError::NoListenerBound(port));
        }

        if let Some(l) = listener_v4.as_mut() {
            poll.registry().register(l, LISTENER_IPV4, Interest::READABLE).map_err(|e| ServerError::Bind {
                family: "ipv4",
                port,
                source: e,
            })?;
            info!("listening on ipv4 port {port}");
        }
        if let Some(l) = listener_v6.as_mut() {
            poll.registry().register(l, LISTENER_IPV6, Interest::READABLE).map_err(|e| ServerError::Bind {
                family: "ipv6",
                port,
                source: e,
            })?;
            info!("listening on ipv6 port {port}");
        }

        Ok(Server {
            name,
            password,
            created_at: format_now(),
            terminate,
            connections: HashMap::new(),
            channels: HashMap::new(),
            next_token: 0,
            poll,
            listener_v4,
            listener_v6,
        })
    }

    /// The main loop (§4.1): wait, inspect ready handles in order, react,
    /// repeat until the termination flag is observed.
    pub fn run(&mut self) -> std::io::Result<()> {
        let mut events = Events::with_capacity(1024);
        loop {
            if self.terminate.load(Ordering::SeqCst) {
                info!("termination flag set, shutting down");
                break;
            }

            match self.poll.poll(&mut events, Some(POLL_TIMEOUT)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }

            let mut to_remove = Vec::new();

            for event in events.iter() {
                match event.token() {
                    LISTENER_IPV4 => self.accept_all(true),
                    LISTENER_IPV6 => self.accept_all(false),
                    token => {
                        let id = ConnectionId::from(token);
                        if event.is_readable() {
                            if let Err(e) = self.handle_readable(id) {
                                debug!("connection {} recv error: {e}", id.0);
                                to_remove.push(id);
                                continue;
                            }
                        }
                        if event.is_writable() {
                            if let Err(e) = self.handle_writable(id) {
                                debug!("connection {} send error: {e}", id.0);
                                to_remove.push(id);
                            }
                        }
                    }
                }
            }

            for id in to_remove {
                self.remove_connection(id, None);
            }
        }
        Ok(())
    }

    fn accept_all(&mut self, is_v4: bool) {
        loop {
            let accepted = if is_v4 {
                self.listener_v4.as_ref().map(|l| l.accept())
            } else {
                self.listener_v6.as_ref().map(|l| l.accept())
            };
            let Some(result) = accepted else { return };
            match result {
                Ok((mut stream, addr)) => {
                    let token = Token(self.next_token);
                    self.next_token += 1;
                    let id = ConnectionId::from(token);
                    if let Err(e) = self.poll.registry().register(&mut stream, token, Interest::READABLE) {
                        error!("failed to register accepted socket: {e}");
                        continue;
                    }
                    info!("connection {} accepted from {addr}", id.0);
                    let host = addr.ip().to_string();
                    self.connections.insert(id, Connection::new(id, stream, host));
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return,
                Err(e) => {
                    error!("accept() failed: {e}");
                    return;
                }
            }
        }
    }

    fn handle_readable(&mut self, id: ConnectionId) -> std::io::Result<()> {
        let mut lines = Vec::new();
        {
            let Some(conn) = self.connections.get_mut(&id) else { return Ok(()) };
            conn.receive(|_conn, line| lines.push(line))
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        }
        for line in lines {
            debug!("conn {} >> {line}", id.0);
            if let Some(msg) = Message::parse(&line) {
                commands::dispatch(self, id, &msg);
            }
            if self.connections.get(&id).map(|c| c.wants_to_quit).unwrap_or(false) {
                break;
            }
        }
        if self.connections.get(&id).map(|c| c.wants_to_quit).unwrap_or(false) {
            self.remove_connection(id, None);
        } else {
            self.sync_write_interest(id);
        }
        Ok(())
    }

    fn handle_writable(&mut self, id: ConnectionId) -> std::io::Result<()> {
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.send_pending()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        }
        self.sync_write_interest(id);
        Ok(())
    }

    fn sync_write_interest(&mut self, id: ConnectionId) {
        let Some(conn) = self.connections.get_mut(&id) else { return };
        let interest = if conn.write_interest {
            Interest::READABLE | Interest::WRITABLE
        } else {
            Interest::READABLE
        };
        let _ = self.poll.registry().reregister(&mut conn.stream, id.into(), interest);
    }

    /// Tears a connection down. `quit_reason` is `Some` for an explicit
    /// client QUIT (its text is broadcast); `None` for a socket-level
    /// disconnect (broadcasts a generic `QUIT :Connection reset`).
    pub fn remove_connection(&mut self, id: ConnectionId, quit_reason: Option<&str>) {
        let Some(mut conn) = self.connections.remove(&id) else { return };
        let prefix = conn.prefix();
        let reason = conn
            .quit_reason
            .as_deref()
            .or(quit_reason)
            .unwrap_or("Connection closed");
        let quit_line = format!(":{prefix} QUIT :{reason}");

        let mut notified: std::collections::BTreeSet<ConnectionId> = std::collections::BTreeSet::new();
        let channel_keys: Vec<String> = conn.channels.iter().cloned().collect();
        for key in &channel_keys {
            if let Some(channel) = self.channels.get(key) {
                for member in &channel.members {
                    if *member != id {
                        notified.insert(*member);
                    }
                }
            }
        }
        for member in notified {
            self.send_to_client(member, &quit_line);
        }
        for key in channel_keys {
            if let Some(channel) = self.channels.get_mut(&key) {
                channel.remove_member(id);
                if channel.is_empty() {
                    self.channels.remove(&key);
                }
            }
        }
        conn.channels.clear();

        let _ = self.poll.registry().deregister(&mut conn.stream);
        info!("connection {} removed", id.0);
    }

    pub fn send_to_client(&mut self, id: ConnectionId, line: &str) {
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.queue_line(line);
            self.sync_write_interest(id);
        }
    }

    pub fn send_to_channel(&mut self, channel_key: &str, line: &str, exclude: Option<ConnectionId>) {
        let Some(members) = self.channels.get(channel_key).map(|c| c.members.clone()) else { return };
        for member in members {
            if Some(member) != exclude {
                self.send_to_client(member, line);
            }
        }
    }

    pub fn channel_key(name: &str) -> String {
        fold(name)
    }

    pub fn find_connection_by_nick(&self, nick: &str) -> Option<ConnectionId> {
        let folded = fold(nick);
        self.connections
            .iter()
            .find(|(_, c)| fold(c.nick()) == folded)
            .map(|(id, _)| *id)
    }

    pub fn nick_in_use(&self, nick: &str) -> bool {
        self.find_connection_by_nick(nick).is_some()
    }

    pub fn not_registered(&mut self, id: ConnectionId) {
        let line = replies::err_not_registered(&self.name.clone(), "*");
        self.send_to_client(id, &line);
        warn!("connection {} sent a command before registering", id.0);
    }

    pub fn now_string(&self) -> String {
        format_now()
    }

    /// The bound address of whichever listener came up (IPv4 preferred),
    /// for callers that bound to port 0 and need to learn the real port —
    /// chiefly the integration tests.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        if let Some(l) = &self.listener_v4 {
            return l.local_addr();
        }
        self.listener_v6.as_ref().unwrap().local_addr()
    }
}

fn format_now() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{secs}")
}
