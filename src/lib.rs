pub mod api;
pub mod core;

/// 初始化日志，`RUST_LOG` 未设置时默认 info。可重复调用。
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}
