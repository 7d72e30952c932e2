//! Tracing subscriber setup.
//!
//! On wasm every event is written to `console.log`; elsewhere to stderr.
//! The filter is fixed at build time through `CELFMT_LOG`
//! (e.g. `CELFMT_LOG=celfmt=debug`), defaulting to `info`.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `CELFMT_LOG` was not set at build time.
pub const DEFAULT_FILTER: &str = "info";

static TRACING_INIT: Once = Once::new();

/// Filter directives compiled into this build.
pub fn filter_directives() -> &'static str {
    option_env!("CELFMT_LOG").unwrap_or(DEFAULT_FILTER)
}

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_new(filter_directives())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .without_time();

        #[cfg(target_arch = "wasm32")]
        let layer = layer.with_writer(console::MakeConsoleWriter);
        #[cfg(not(target_arch = "wasm32"))]
        let layer = layer.with_writer(std::io::stderr);

        // Another subscriber may already be installed by the embedding host.
        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init();
    });
}

#[cfg(target_arch = "wasm32")]
pub(crate) mod console {
    use std::io;

    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = console)]
        pub fn log(s: &str);
    }

    pub struct MakeConsoleWriter;

    impl<'a> MakeWriter<'a> for MakeConsoleWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter::default()
        }
    }

    /// Buffers one formatted event and logs it when dropped.
    #[derive(Default)]
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            if !self.buf.is_empty() {
                log(String::from_utf8_lossy(&self.buf).trim_end());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_parse() {
        assert!(EnvFilter::try_new(filter_directives()).is_ok());
    }

    #[test]
    fn test_init_is_repeatable() {
        init();
        init();
        tracing::info!("logging initialised");
    }
}
