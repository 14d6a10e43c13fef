use crate::{FormatFlavor, TracingConfig};
use tracing_core::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::Layer as FmtLayer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::{
    Compact, DefaultFields, Format as EventFormatter, Format, Full, Pretty,
};
use tracing_subscriber::fmt::{FormatFields, layer as make_fmt_layer};
use tracing_subscriber::layer::Filter;
use tracing_subscriber::registry::LookupSpan;

/// Creates a [formatted `Layer`](FmtLayer) that writes to `writer`, shaped by
/// the given [config](TracingConfig).
pub fn make_layer<S, W>(
    config: impl AsRef<TracingConfig>,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let config = config.as_ref();
    let targets = make_targets(config);

    match config.flavor() {
        FormatFlavor::Full => make_full_layer(config, targets, writer),
        FormatFlavor::Compact => make_compact_layer(config, targets, writer),
        FormatFlavor::Pretty => make_pretty_layer(config, targets, writer),
        #[cfg(feature = "json")]
        FormatFlavor::Json => make_json_layer(config, targets, writer),
    }
}

fn make_full_layer<S, W>(
    config: &TracingConfig,
    targets: Targets,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    Targets: Filter<S>,
{
    let base_layer: FmtLayer<S, DefaultFields, Format<Full>, W> =
        preconfigure_base_layer(make_fmt_layer().with_writer(writer), config);

    if config.show_timestamp() {
        Box::new(base_layer.with_filter(targets))
    } else {
        Box::new(base_layer.without_time().with_filter(targets))
    }
}

fn make_compact_layer<S, W>(
    config: &TracingConfig,
    targets: Targets,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    Targets: Filter<S>,
{
    let base_layer: FmtLayer<S, DefaultFields, Format<Compact>, W> =
        preconfigure_base_layer(make_fmt_layer().with_writer(writer).compact(), config);

    if config.show_timestamp() {
        Box::new(base_layer.with_filter(targets))
    } else {
        Box::new(base_layer.without_time().with_filter(targets))
    }
}

fn make_pretty_layer<S, W>(
    config: &TracingConfig,
    targets: Targets,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    Targets: Filter<S>,
{
    let base_layer: FmtLayer<S, Pretty, Format<Pretty>, W> =
        preconfigure_base_layer(make_fmt_layer().with_writer(writer).pretty(), config);

    if config.show_timestamp() {
        Box::new(base_layer.with_filter(targets))
    } else {
        Box::new(base_layer.without_time().with_filter(targets))
    }
}

#[cfg(feature = "json")]
fn make_json_layer<S, W>(
    config: &TracingConfig,
    targets: Targets,
    writer: W,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    Targets: Filter<S>,
{
    use tracing_subscriber::fmt::format::{Json, JsonFields};

    let base_layer: FmtLayer<S, JsonFields, Format<Json>, W> = preconfigure_base_layer(
        make_fmt_layer()
            .with_writer(writer)
            .json()
            .flatten_event(config.flatten_json()),
        config,
    );

    if config.show_timestamp() {
        Box::new(base_layer.with_filter(targets))
    } else {
        Box::new(base_layer.without_time().with_filter(targets))
    }
}

/// Applies the display choices of the given [`config`](TracingConfig) to a
/// generic base [formatted `Layer`](FmtLayer).
fn preconfigure_base_layer<S, N, L, T, W>(
    mut layer: FmtLayer<S, N, EventFormatter<L, T>, W>,
    config: &TracingConfig,
) -> FmtLayer<S, N, EventFormatter<L, T>, W>
where
    N: for<'writer> FormatFields<'writer> + 'static,
{
    #[allow(unused_mut)]
    let mut no_color = !config.color();

    #[cfg(feature = "json")]
    if config.flavor() == FormatFlavor::Json {
        no_color = true;
    }

    if no_color {
        layer = layer.with_ansi(false)
    }

    layer
        .with_target(config.show_target())
        .with_file(config.show_file())
        .with_line_number(config.show_line_number())
        .with_level(config.show_level())
        .with_thread_ids(config.show_thread_id())
        .with_thread_names(config.show_thread_name())
}

/// Creates the [per-target filter](Targets) of the given
/// [`config`](TracingConfig).
fn make_targets(config: &TracingConfig) -> Targets {
    Targets::new()
        .with_default(config.verbosity())
        .with_targets(config.targets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Verbosity;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn capture_with(config: TracingConfig, emit: impl FnOnce()) -> String {
        let capture = Capture::default();
        let writer = {
            let capture = capture.clone();
            move || capture.clone()
        };
        let subscriber = Registry::default().with(make_layer(config, writer));

        tracing::subscriber::with_default(subscriber, emit);

        capture.contents()
    }

    #[test]
    fn writes_thread_name_by_default() {
        // Given
        let config = TracingConfig::default();

        // When
        let output = std::thread::Builder::new()
            .name("named-writer".to_string())
            .spawn(move || capture_with(config, || tracing::info!("hello from a named thread")))
            .unwrap()
            .join()
            .unwrap();

        // Then
        assert!(output.contains("hello from a named thread"), "{output}");
        assert!(output.contains("named-writer"), "{output}");
    }

    #[test]
    fn filters_by_target() {
        // Given
        let config = TracingConfig::default().with_target("noisy", Verbosity::Error);

        // When
        let output = capture_with(config, || {
            tracing::info!(target: "noisy", "muted line");
            tracing::error!(target: "noisy", "loud line");
            tracing::info!(target: "calm", "kept line");
        });

        // Then
        assert!(!output.contains("muted line"), "{output}");
        assert!(output.contains("loud line"), "{output}");
        assert!(output.contains("kept line"), "{output}");
    }

    #[test]
    fn compact_and_pretty_write_too() {
        for flavor in ["compact", "pretty"] {
            // Given
            let config =
                serde_yml::from_str::<TracingConfig>(&format!("flavor: {flavor}")).unwrap();

            // When
            let output = capture_with(config, || tracing::warn!("flavored line"));

            // Then
            assert!(output.contains("flavored line"), "{flavor}: {output}");
        }
    }
}
