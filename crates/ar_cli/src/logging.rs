use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the stderr subscriber once; stdout is reserved for rendered views.
pub fn init_logging(verbosity: u8) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(level_for(verbosity))
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(7), Level::DEBUG);
    }
}
