use std::net::{IpAddr, SocketAddr};

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tracing::info;

use crate::error::GatewayError;
use crate::http::connection::Connection;

/// Name and port of the bound socket, as seen by applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: String,
    pub port: u16,
}

/// Owns the listening socket and hands out one connection per `accept`.
pub struct Listener {
    inner: TcpListener,
    identity: ServerIdentity,
}

impl Listener {
    /// Binds with address reuse enabled and starts listening.
    ///
    /// `addr` is `host:port`; an empty host (`":8888"`) means all interfaces.
    pub async fn bind(addr: &str, backlog: u32) -> Result<Self, GatewayError> {
        let bind_error = |source| GatewayError::Bind {
            addr: addr.to_string(),
            source,
        };

        let normalized = match addr.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port),
            None => addr.to_string(),
        };

        let socket_addr = tokio::net::lookup_host(&normalized)
            .await
            .map_err(bind_error)?
            .next()
            .ok_or_else(|| {
                bind_error(std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "address resolved to nothing",
                ))
            })?;

        let socket = match socket_addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(bind_error)?;

        socket.set_reuseaddr(true).map_err(bind_error)?;
        socket.bind(socket_addr).map_err(bind_error)?;
        let inner = socket.listen(backlog.max(1)).map_err(bind_error)?;

        let local = inner.local_addr().map_err(bind_error)?;
        let ip = local.ip();
        let name = tokio::task::spawn_blocking(move || fully_qualified_name(ip))
            .await
            .unwrap_or_else(|_| ip.to_string());
        let identity = ServerIdentity {
            name,
            port: local.port(),
        };

        info!(address = %local, server_name = %identity.name, "Listening");

        Ok(Self { inner, identity })
    }

    /// Replaces the resolved server name.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.identity.name = name.into();
        self
    }

    /// Waits for the next client.
    pub async fn accept(&self) -> Result<Connection<TcpStream>, GatewayError> {
        let (socket, peer) = self.inner.accept().await.map_err(GatewayError::Accept)?;
        info!("Accepted connection from {}", peer);
        Ok(Connection::new(socket, Some(peer)))
    }

    pub fn local_name(&self) -> &ServerIdentity {
        &self.identity
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}

/// Fully-qualified name for a bound address.
///
/// The unspecified address stands for this machine, so its host name is
/// resolved and looked up in turn; a name containing a dot wins. Any other
/// address is reverse-resolved, falling back to its textual form.
pub fn fully_qualified_name(ip: IpAddr) -> String {
    if ip.is_unspecified() {
        return local_fqdn().unwrap_or_else(|| ip.to_string());
    }
    dns_lookup::lookup_addr(&ip).unwrap_or_else(|_| ip.to_string())
}

fn local_fqdn() -> Option<String> {
    let hostname = dns_lookup::get_hostname().ok()?;

    let resolved = dns_lookup::lookup_host(&hostname)
        .ok()
        .into_iter()
        .flatten()
        .filter_map(|addr| dns_lookup::lookup_addr(&addr).ok())
        .find(|name| name.contains('.'));

    Some(resolved.unwrap_or(hostname))
}
