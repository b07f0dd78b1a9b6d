// Connectivity monitor - service reachability and network link state
//
// Probes are triggered by events, never by a timer:
//
//   Init / Online ──▶ new generation, probe GET /
//   Offline       ──▶ new generation, "No Internet Connection", no probe
//
// A probe result is applied only if no newer event arrived while it was in
// flight, so a slow probe can't overwrite a later offline status.
//
// The link watcher turns "is there a route to the service host" into
// Online/Offline transitions. It only reports changes. A loopback service
// is always reachable as far as the link is concerned.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::{ApiError, CryptoService};

pub const STATUS_CHECKING: &str = "Checking API...";
pub const STATUS_ONLINE: &str = "API Online";
pub const STATUS_SERVICE_DOWN: &str = "API Offline - Check backend configuration";
pub const STATUS_NO_NETWORK: &str = "No Internet Connection";

/// What the status indicator shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityStatus {
    pub service_reachable: bool,
    pub network_online: bool,
    pub display_text: String,
}

impl Default for ConnectivityStatus {
    fn default() -> Self {
        Self {
            service_reachable: false,
            network_online: true,
            display_text: STATUS_CHECKING.to_string(),
        }
    }
}

/// Events that can start (or stop) a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkEvent {
    Init,
    Online,
    Offline,
}

/// Ticket for one probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    generation: u64,
}

#[derive(Debug, Default)]
pub struct ConnectivityMonitor {
    status: ConnectivityStatus,
    generation: u64,
}

impl ConnectivityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &ConnectivityStatus {
        &self.status
    }

    /// Record an event; returns the probe to run, if any
    pub fn on_event(&mut self, event: NetworkEvent) -> Option<Probe> {
        self.generation += 1;
        match event {
            NetworkEvent::Init | NetworkEvent::Online => {
                tracing::debug!("{:?}: probing service", event);
                self.status.network_online = true;
                Some(Probe {
                    generation: self.generation,
                })
            }
            NetworkEvent::Offline => {
                tracing::info!("Network went offline");
                self.status = ConnectivityStatus {
                    service_reachable: false,
                    network_online: false,
                    display_text: STATUS_NO_NETWORK.to_string(),
                };
                None
            }
        }
    }

    /// Probe again on request, keeping the current link state
    ///
    /// While the link is down only the watcher can bring it back.
    pub fn refresh(&mut self) -> Option<Probe> {
        if !self.status.network_online {
            tracing::debug!("Refresh ignored while offline");
            return None;
        }
        self.generation += 1;
        Some(Probe {
            generation: self.generation,
        })
    }

    /// Apply a probe result; returns false if the probe was superseded
    pub fn apply(&mut self, probe: Probe, outcome: Result<(), ApiError>) -> bool {
        if probe.generation != self.generation {
            tracing::debug!("Discarding stale probe #{}", probe.generation);
            return false;
        }

        match outcome {
            Ok(()) => {
                self.status.service_reachable = true;
                self.status.display_text = STATUS_ONLINE.to_string();
            }
            Err(e) => {
                tracing::debug!("Probe failed: {}", e);
                self.status.service_reachable = false;
                self.status.display_text = STATUS_SERVICE_DOWN.to_string();
            }
        }
        true
    }
}

/// Run one probe against the service
pub async fn run_probe<S: CryptoService>(service: &S, probe: Probe) -> (Probe, Result<(), ApiError>) {
    (probe, service.probe().await)
}

/// Turns link observations into transitions
#[derive(Debug)]
pub struct LinkWatcher {
    online: bool,
}

impl LinkWatcher {
    /// Starts assuming the link is up; the initial probe covers that case
    pub fn new() -> Self {
        Self { online: true }
    }

    /// Feed the latest observation; returns an event on change
    pub fn observe(&mut self, available: bool) -> Option<NetworkEvent> {
        if available == self.online {
            return None;
        }
        self.online = available;
        Some(if available {
            NetworkEvent::Online
        } else {
            NetworkEvent::Offline
        })
    }
}

impl Default for LinkWatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the link watcher checks for a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    host: String,
    port: u16,
}

impl LinkTarget {
    /// Used when the service URL has no usable host or doesn't resolve
    const PUBLIC: (Ipv4Addr, u16) = (Ipv4Addr::new(1, 1, 1, 1), 53);

    /// Host and port of the service URL, or the public fallback
    pub fn from_url(url: &str) -> Self {
        let parsed = reqwest::Url::parse(url).ok().and_then(|u| {
            let host = u.host_str()?.trim_matches(|c: char| c == '[' || c == ']').to_string();
            let port = u.port_or_known_default()?;
            Some(Self { host, port })
        });
        parsed.unwrap_or_else(|| {
            tracing::warn!("No host in service URL {:?}, watching the public route", url);
            Self::public()
        })
    }

    pub fn public() -> Self {
        Self {
            host: Self::PUBLIC.0.to_string(),
            port: Self::PUBLIC.1,
        }
    }

    async fn resolve(&self) -> Vec<SocketAddr> {
        match tokio::net::lookup_host((self.host.as_str(), self.port)).await {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                tracing::debug!("Could not resolve {}: {}", self.host, e);
                Vec::new()
            }
        }
    }
}

/// Whether the OS has a route to the service host
///
/// Connecting a UDP socket only consults the routing table; nothing is sent.
/// An unresolvable host falls back to the public route.
pub async fn route_available(target: &LinkTarget) -> bool {
    let mut addrs = target.resolve().await;
    if addrs.is_empty() {
        addrs.push(SocketAddr::from(LinkTarget::PUBLIC));
    }

    for addr in addrs {
        if addr.ip().is_loopback() || route_to(addr).await {
            return true;
        }
    }
    false
}

async fn route_to(addr: SocketAddr) -> bool {
    let local: IpAddr = match addr {
        SocketAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
        SocketAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
    };
    match tokio::net::UdpSocket::bind((local, 0)).await {
        Ok(socket) => socket.connect(addr).await.is_ok(),
        Err(_) => false,
    }
}

/// Watch the link and forward transitions until the receiver goes away
pub async fn watch_link(
    target: LinkTarget,
    interval: Duration,
    tx: mpsc::UnboundedSender<NetworkEvent>,
) {
    let mut watcher = LinkWatcher::new();
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if let Some(event) = watcher.observe(route_available(&target).await) {
            if tx.send(event).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::StubService;

    #[test]
    fn test_initial_status_is_checking() {
        let monitor = ConnectivityMonitor::new();
        assert_eq!(monitor.status().display_text, STATUS_CHECKING);
        assert!(!monitor.status().service_reachable);
    }

    #[tokio::test]
    async fn test_init_probe_success_is_online() {
        let service = StubService::new().probe_with(Ok(()));
        let mut monitor = ConnectivityMonitor::new();

        let probe = monitor.on_event(NetworkEvent::Init).unwrap();
        let (probe, outcome) = run_probe(&service, probe).await;

        assert!(monitor.apply(probe, outcome));
        assert_eq!(monitor.status().display_text, STATUS_ONLINE);
        assert!(monitor.status().service_reachable);
    }

    #[tokio::test]
    async fn test_probe_failure_is_service_down() {
        let service = StubService::new().probe_with(Err(ApiError::Service {
            status: 500,
            detail: None,
        }));
        let mut monitor = ConnectivityMonitor::new();

        let probe = monitor.on_event(NetworkEvent::Init).unwrap();
        let (probe, outcome) = run_probe(&service, probe).await;
        monitor.apply(probe, outcome);

        assert_eq!(monitor.status().display_text, STATUS_SERVICE_DOWN);
        assert!(!monitor.status().service_reachable);
    }

    #[test]
    fn test_offline_never_probes() {
        let mut monitor = ConnectivityMonitor::new();
        assert_eq!(monitor.on_event(NetworkEvent::Offline), None);
        assert_eq!(monitor.status().display_text, STATUS_NO_NETWORK);
        assert!(!monitor.status().network_online);
    }

    #[test]
    fn test_stale_probe_after_offline_is_ignored() {
        let mut monitor = ConnectivityMonitor::new();
        let probe = monitor.on_event(NetworkEvent::Init).unwrap();
        monitor.on_event(NetworkEvent::Offline);

        assert!(!monitor.apply(probe, Ok(())));
        assert_eq!(monitor.status().display_text, STATUS_NO_NETWORK);
    }

    #[test]
    fn test_online_restarts_probing() {
        let mut monitor = ConnectivityMonitor::new();
        let first = monitor.on_event(NetworkEvent::Init).unwrap();
        monitor.on_event(NetworkEvent::Offline);
        let second = monitor.on_event(NetworkEvent::Online).unwrap();

        assert!(!monitor.apply(first, Ok(())));
        assert!(monitor.apply(second, Ok(())));
        assert_eq!(monitor.status().display_text, STATUS_ONLINE);
        assert!(monitor.status().network_online);
    }

    #[test]
    fn test_link_watcher_reports_transitions_only() {
        let mut watcher = LinkWatcher::new();
        assert_eq!(watcher.observe(true), None);
        assert_eq!(watcher.observe(false), Some(NetworkEvent::Offline));
        assert_eq!(watcher.observe(false), None);
        assert_eq!(watcher.observe(true), Some(NetworkEvent::Online));
    }

    #[test]
    fn test_link_target_from_service_url() {
        assert_eq!(
            LinkTarget::from_url("http://127.0.0.1:8000"),
            LinkTarget {
                host: "127.0.0.1".to_string(),
                port: 8000
            }
        );
        assert_eq!(
            LinkTarget::from_url("https://crypto.example.com/"),
            LinkTarget {
                host: "crypto.example.com".to_string(),
                port: 443
            }
        );
        assert_eq!(
            LinkTarget::from_url("http://[::1]:9000"),
            LinkTarget {
                host: "::1".to_string(),
                port: 9000
            }
        );
        assert_eq!(LinkTarget::from_url("not a url"), LinkTarget::public());
    }

    #[tokio::test]
    async fn test_loopback_service_keeps_link_up() {
        let mut watcher = LinkWatcher::new();
        let mut monitor = ConnectivityMonitor::new();
        let probe = monitor.on_event(NetworkEvent::Init).unwrap();

        for url in ["http://127.0.0.1:8000", "http://[::1]:8000"] {
            let target = LinkTarget::from_url(url);
            assert!(route_available(&target).await, "{url}");
            assert_eq!(watcher.observe(route_available(&target).await), None);
        }

        assert!(monitor.apply(probe, Ok(())));
        assert_eq!(monitor.status().display_text, STATUS_ONLINE);
    }

    #[test]
    fn test_refresh_respects_link_state() {
        let mut monitor = ConnectivityMonitor::new();
        let first = monitor.on_event(NetworkEvent::Init).unwrap();
        let second = monitor.refresh().unwrap();
        assert!(!monitor.apply(first, Ok(())));
        assert!(monitor.apply(second, Err(ApiError::Transport("refused".to_string()))));
        assert_eq!(monitor.status().display_text, STATUS_SERVICE_DOWN);

        monitor.on_event(NetworkEvent::Offline);
        assert_eq!(monitor.refresh(), None);
        assert_eq!(monitor.status().display_text, STATUS_NO_NETWORK);
        assert!(!monitor.status().network_online);
    }
}
