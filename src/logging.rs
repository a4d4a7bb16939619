use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Renders events as `LEVEL: message`, without timestamps or targets
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelPrefixFormatter;

impl<S, N> FormatEvent<S, N> for LevelPrefixFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{}: ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `-v` forces debug; otherwise `RUST_LOG` wins over the `info` default
fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .event_format(LevelPrefixFormatter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(verbose: bool, emit: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(if verbose { "debug" } else { "info" })
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .event_format(LevelPrefixFormatter)
            .finish();

        tracing::subscriber::with_default(subscriber, emit);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_level_prefix_format() {
        let out = capture(false, || {
            tracing::error!("No directory at /srv/repo!");
            tracing::info!("HEAD ahead, skipping ~/notes");
        });
        assert_eq!(
            out,
            "ERROR: No directory at /srv/repo!\nINFO: HEAD ahead, skipping ~/notes\n"
        );
    }

    #[test]
    fn test_debug_hidden_unless_verbose() {
        let quiet = capture(false, || tracing::debug!("going to /srv/repo"));
        assert!(quiet.is_empty());
        let verbose = capture(true, || tracing::debug!("going to /srv/repo"));
        assert_eq!(verbose, "DEBUG: going to /srv/repo\n");
    }
}
