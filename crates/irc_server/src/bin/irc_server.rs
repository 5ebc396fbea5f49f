//! `ircserv <port> <password>` — binds the dual-stack listeners and runs the
//! event loop (§6 External Interfaces). A password argument of `""` disables
//! PASS enforcement.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use flexi_logger::Logger;
use log::error;

use irc_server::server::Server;

#[derive(Parser, Debug)]
#[command(name = "ircserv", about = "A small RFC 2812-subset IRC server")]
struct Cli {
    /// TCP port to listen on (both IPv4 and IPv6).
    port: u16,
    /// Connection password; an empty string disables the PASS requirement.
    password: String,
    /// Server name advertised in numeric replies and originated lines.
    #[arg(long, default_value = "localhost")]
    name: String,
}

fn main() -> ExitCode {
    if let Err(e) = Logger::try_with_env_or_str("info").and_then(|l| l.log_to_stderr().start()) {
        eprintln!("failed to start logger: {e}");
    }

    // §6 mandates exit code 1 on any startup failure, argument count
    // included — clap's default `parse()` exits with 2, so parse explicitly.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let password = if cli.password.is_empty() { None } else { Some(cli.password) };

    let terminate = Arc::new(AtomicBool::new(false));
    install_signal_handlers(Arc::clone(&terminate));

    let mut server = match Server::bind(cli.port, password, cli.name, terminate) {
        Ok(server) => server,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run() {
        error!("event loop terminated with error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// The termination flag (§9 "Global singletons") is genuinely process-global
/// once a signal handler needs to reach it, so this is the one static in the
/// binary; the `Server` itself only ever sees the `Arc<AtomicBool>` clone.
static TERMINATE: OnceLock<Arc<AtomicBool>> = OnceLock::new();

extern "C" fn on_term_signal(_sig: libc::c_int) {
    if let Some(flag) = TERMINATE.get() {
        flag.store(true, Ordering::SeqCst);
    }
}

fn install_signal_handlers(flag: Arc<AtomicBool>) {
    let _ = TERMINATE.set(flag);
    unsafe {
        libc::signal(libc::SIGINT, on_term_signal as libc::sighandler_t);
        libc::signal(libc::SIGTERM, on_term_signal as libc::sighandler_t);
    }
}
