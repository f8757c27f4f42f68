use tracing_subscriber::EnvFilter;

/// ログフィルタを指定する環境変数
pub const LOG_ENV: &str = "PIVOT_STATS_LOG";

/// 環境変数がないときのフィルタ
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "pivot_stats=debug,pivot_stats_common=debug"
    } else {
        "pivot_stats=info"
    }
}

/// ログ初期化（出力は標準エラー）
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // テストなどで二重初期化されても無視
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
