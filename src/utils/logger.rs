use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 兩個 binary (evented, race_sim) 都要列在預設過濾條件裡
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "evented=debug,race_sim=debug,info"
    } else {
        "evented=info,race_sim=info,warn"
    }
}

pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(false)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_both_binaries() {
        for verbose in [false, true] {
            let directives = default_directives(verbose);
            assert!(directives.contains("evented="));
            assert!(directives.contains("race_sim="));
        }
        assert!(default_directives(false).contains("race_sim=info"));
        assert!(default_directives(true).contains("race_sim=debug"));
    }
}
