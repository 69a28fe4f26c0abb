//! Log output for the binary

/// Install `env_logger`, honouring `RUST_LOG` and falling back to `level`
pub fn init_logger(level: &str) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_target(false);
    let _ = builder.try_init();
}
