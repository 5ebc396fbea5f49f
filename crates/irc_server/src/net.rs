//! Dual-stack listener bootstrap. `std::net::TcpListener` cannot express
//! "IPv6-only, disable the dual-stack mapping" or a custom backlog, so the
//! two listening sockets are built directly with `libc`, then handed to
//! `mio` for the event loop.

use std::io;
use std::mem;
use std::net::SocketAddr;
use std::os::fd::FromRawFd;

use mio::net::TcpListener;

use crate::errors::ServerError;

/// Matches the reference implementation's fixed backlog.
const BACKLOG: i32 = 10;

fn last_errno() -> io::Error {
    io::Error::last_os_error()
}

/// Creates, configures (`SO_REUSEADDR`, and for IPv6 `IPV6_V6ONLY`), binds,
/// and listens on one address family. The returned socket is non-blocking.
fn bind_listener(addr: SocketAddr, family: &'static str) -> Result<TcpListener, ServerError> {
    let domain = match addr {
        SocketAddr::V4(_) => libc::AF_INET,
        SocketAddr::V6(_) => libc::AF_INET6,
    };

    let fd = unsafe { libc::socket(domain, libc::SOCK_STREAM, 0) };
    if fd < 0 {
        return Err(ServerError::Bind {
            family,
            port: addr.port(),
            source: last_errno(),
        });
    }

    unsafe {
        let yes: libc::c_int = 1;
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_REUSEADDR,
            &yes as *const _ as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        );

        if domain == libc::AF_INET6 {
            // Dual-stack disabled: the IPv4 listener owns 0.0.0.0 separately.
            libc::setsockopt(
                fd,
                libc::IPPROTO_IPV6,
                libc::IPV6_V6ONLY,
                &yes as *const _ as *const libc::c_void,
                mem::size_of::<libc::c_int>() as libc::socklen_t,
            );
        }

        // Stack-local sockaddr, passed straight into bind() in the same
        // unsafe block — no heap allocation, nothing to free afterward.
        let bind_result = match addr {
            SocketAddr::V4(a) => {
                let mut raw: libc::sockaddr_in = mem::zeroed();
                raw.sin_family = libc::AF_INET as libc::sa_family_t;
                raw.sin_port = a.port().to_be();
                raw.sin_addr.s_addr = u32::from_ne_bytes(a.ip().octets());
                libc::bind(
                    fd,
                    &raw as *const libc::sockaddr_in as *const libc::sockaddr,
                    mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
                )
            }
            SocketAddr::V6(a) => {
                let mut raw: libc::sockaddr_in6 = mem::zeroed();
                raw.sin6_family = libc::AF_INET6 as libc::sa_family_t;
                raw.sin6_port = a.port().to_be();
                raw.sin6_addr.s6_addr = a.ip().octets();
                libc::bind(
                    fd,
                    &raw as *const libc::sockaddr_in6 as *const libc::sockaddr,
                    mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t,
                )
            }
        };
        if bind_result < 0 {
            let err = last_errno();
            libc::close(fd);
            return Err(ServerError::Bind { family, port: addr.port(), source: err });
        }

        if libc::listen(fd, BACKLOG) < 0 {
            let err = last_errno();
            libc::close(fd);
            return Err(ServerError::Bind { family, port: addr.port(), source: err });
        }
    }

    let std_listener = unsafe { std::net::TcpListener::from_raw_fd(fd) };
    std_listener.set_nonblocking(true).map_err(|e| ServerError::Bind {
        family,
        port: addr.port(),
        source: e,
    })?;
    Ok(TcpListener::from_std(std_listener))
}

/// Binds an IPv4 listener on `0.0.0.0:port`.
pub fn bind_ipv4(port: u16) -> Result<TcpListener, ServerError> {
    bind_listener(SocketAddr::new(std::net::Ipv4Addr::UNSPECIFIED.into(), port), "ipv4")
}

/// Binds an IPv6 listener on `[::]:port` with `IPV6_V6ONLY` set.
pub fn bind_ipv6(port: u16) -> Result<TcpListener, ServerError> {
    bind_listener(SocketAddr::new(std::net::Ipv6Addr::UNSPECIFIED.into(), port), "ipv6")
}
