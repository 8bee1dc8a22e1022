// ============================================================================
// Rate limiting par IP
// ============================================================================
// Limiteur à fenêtre fixe : N requêtes par fenêtre et par IP cliente,
// appliqué uniformément à toutes les routes /api.
//
// CONCEPTS RUST :
// 1. Mutex<HashMap> : compteurs partagés entre handlers — sections
//    critiques courtes, pas d'await sous le verrou
// 2. Middleware axum from_fn_with_state + ConnectInfo pour l'IP cliente
// ============================================================================

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

/// Fenêtre de comptage pour une IP
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Limiteur à fenêtre fixe par IP
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    /// Crée un limiteur : `max_requests` par `window` et par IP
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Enregistre une requête et indique si elle est autorisée
    ///
    /// La fenêtre redémarre (compteur remis à 1) dès qu'elle a expiré.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");

        let window = windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.max_requests
    }
}

/// Middleware axum : rejette avec 429 au-delà de la fenêtre
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    if !limiter.check(addr.ip()) {
        warn!(ip = %addr.ip(), "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "Too many requests, try again later"})),
        )
            .into_response();
    }
    next.run(req).await
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, last))
    }

    #[test]
    fn test_allows_up_to_max_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(1)));
        // Quatrième requête dans la même fenêtre : rejetée
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn test_ips_are_counted_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
        // Autre IP : fenêtre à elle
        assert!(limiter.check(ip(2)));
    }

    #[test]
    fn test_window_expiry_resets_counter() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));

        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));

        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check(ip(1)));
    }
}
