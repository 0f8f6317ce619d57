use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            listen_addr: SocketAddr::new(host, port),
        }
    }

    pub fn port(&self) -> u16 {
        self.listen_addr.port()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listens_on_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn explicit_host_and_port_are_kept() {
        let config = ServerConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9000);
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9000");
    }
}
