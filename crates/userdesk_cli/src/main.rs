//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `userdesk_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Smoke check that the core crate links and answers independently of any UI
    // runtime setup.
    println!("userdesk_core ping={}", userdesk_core::ping());
    println!("userdesk_core version={}", userdesk_core::core_version());
}
