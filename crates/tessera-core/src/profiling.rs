//! Profiling utilities based on the `puffin` crate.
//!
//! Scopes are free when profiling is off: `profile_function!` checks a global
//! flag that only [`init_profiling`] turns on.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Profiling backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Send profiling data to puffin_viewer via HTTP.
    PuffinHttp,
}

#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Turn on puffin scopes and start the selected backend.
///
/// ```no_run
/// use tessera_core::profiling::{init_profiling, ProfilingBackend};
///
/// init_profiling(ProfilingBackend::PuffinHttp);
/// ```
pub fn init_profiling(backend: ProfilingBackend) {
    puffin::set_scopes_on(true);
    match backend {
        ProfilingBackend::PuffinHttp => start_http_server(),
    }
}

#[cfg(feature = "profiling")]
fn start_http_server() {
    let addr = "0.0.0.0:8585";
    match puffin_http::Server::new(addr) {
        Ok(server) => {
            tracing::info!("Puffin profiler server started on http://{addr}");
            let _ = PROFILING_SERVER.set(server);
        }
        Err(e) => {
            tracing::error!("Failed to start puffin server: {}", e);
        }
    }
}

#[cfg(not(feature = "profiling"))]
fn start_http_server() {
    tracing::warn!("puffin_http support not compiled in; scopes are recorded but not served");
}

/// Mark a frame boundary. Call once per rendered frame.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
