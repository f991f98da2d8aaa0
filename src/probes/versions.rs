/// Version of this tracking crate itself.
pub fn tracker_version() -> Option<String> {
    Some(env!("CARGO_PKG_VERSION").to_owned())
}

/// rustc release captured at build time; null if the build script could not
/// determine it.
pub fn runtime_version() -> Option<String> {
    option_env!("CARBONRUN_RUSTC_VERSION").map(str::to_owned)
}
