use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

// Drops the non-blocking writer's flush guard only at process exit.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// tracing購読者を初期化する。フィルタは `RUST_LOG`（未設定なら `info`）。
///
/// `YUBIN_LOG_DIR` が設定されていれば `<dir>/<app>.log` へ日次ローテーションで
/// 書き出し、未設定ならそのまま標準出力に流す。
pub fn init_tracing_subscriber(app_name: &'static str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt().with_env_filter(filter);

    match daily_log_writer(app_name) {
        Some(writer) => {
            let _ = fmt.with_writer(writer).try_init();
        }
        None => {
            let _ = fmt.try_init();
        }
    }
}

fn daily_log_writer(app_name: &str) -> Option<BoxMakeWriter> {
    let dir = PathBuf::from(std::env::var_os("YUBIN_LOG_DIR")?);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        // 購読者がまだ居ないのでここだけは stderr に直接出す
        eprintln!("could not create YUBIN_LOG_DIR ({err}); logging to stdout");
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(writer))
}

/// panicを発生位置つきで `tracing` 経由のログに残すフックを入れる。
/// 何度呼んでもフックは一度しか入らない。
/// `YUBIN_LOG_INCLUDE_BACKTRACE=1` のときは元のフックにも流して
/// バックトレースを出す。
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        let with_backtrace = std::env::var("YUBIN_LOG_INCLUDE_BACKTRACE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        panic::set_hook(Box::new(move |info| {
            let location = match info.location() {
                Some(loc) => format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
                None => "unknown".to_string(),
            };

            let payload = info.payload();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload not string".to_string());

            tracing::error!(
                application = app_name,
                %location,
                panic_message = %message,
                "panic captured"
            );

            if with_backtrace {
                previous(info);
            }
        }));
    });
}
