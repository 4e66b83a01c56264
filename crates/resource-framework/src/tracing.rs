//! # Observability & Tracing
//!
//! The engine logs through the `tracing` crate with structured fields. Every
//! event carries the `resource` it concerns, rendered as
//! `"{kind}:{project}/{scope}/{name}"`.
//!
//! ## What Gets Traced
//!
//! - **Propagation**: start of every access or set (`debug`), one event per
//!   destination with the number of dropped fields (`debug`)
//! - **Copier**: one event per copy (`trace`)
//! - **Failures**: field policy violations and bridging hook errors (`warn`)
//! - **Version choice**: freeze with the chosen version (`info`), ambiguity (`warn`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Freeze decisions and failures only
//! RUST_LOG=info cargo run
//!
//! # Every propagation step
//! RUST_LOG=debug cargo run
//!
//! # Engine only, including per-copy events
//! RUST_LOG=resource_framework=trace cargo run
//! ```
//!
//! With `RUST_LOG=debug` an alpha-only change reads:
//!
//! ```text
//! DEBUG Propagating resource=addresses:proj/global/foo source=alpha validate=true
//! DEBUG Converted resource=addresses:proj/global/foo context=alpha->stable dropped=1
//! DEBUG Converted resource=addresses:proj/global/foo context=alpha->beta dropped=1
//!  INFO Frozen resource=addresses:proj/global/foo version=alpha
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // the resource field identifies the source
        .compact()
        .init();
}
