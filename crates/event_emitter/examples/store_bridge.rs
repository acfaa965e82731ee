//! A settings store bridged into a public facade.
//!
//! Run with `RUST_LOG=event_emitter=trace` to watch every dispatch step.

use event_emitter::typed::TypedEmitter;
use event_emitter::{define_event, event_schema, ChangeEvent, EmitterConfig, Propagation};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
struct ThemeChanged(ChangeEvent<String>);
define_event!(ThemeChanged => "theme_changed");

#[derive(Debug, Clone)]
struct Persisted {
    bytes: usize,
}
define_event!(Persisted => "persisted");

event_schema! {
    StoreEvents { ThemeChanged, Persisted }
}

event_schema! {
    WidgetEvents { ThemeChanged }
}

const STORE_CONFIG: &str = r#"
label = "settings-store"
isolate_failures = true
max_bridge_depth = 4
"#;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_names(true)
        )
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let store: TypedEmitter<StoreEvents> =
        TypedEmitter::with_config(EmitterConfig::from_toml_str(STORE_CONFIG)?);
    let widgets: TypedEmitter<StoreEvents, WidgetEvents> =
        TypedEmitter::with_config(EmitterConfig::default().with_label("widgets"));
    store.bridge_emit(&widgets);

    // Unchanged values never reach the widgets
    store.on_with_priority(100, |event: &ThemeChanged| {
        if event.0.is_change() {
            Propagation::Continue
        } else {
            Propagation::Stop
        }
    });
    store.on(|event: &Persisted| info!("💾 Persisted {} bytes", event.bytes));

    widgets.on(|event: &ThemeChanged| {
        info!("🎨 Repainting: {} -> {}", event.0.old_value, event.0.value);
    });
    widgets.once(|_: &ThemeChanged| info!("👋 First theme change seen"));

    for (old, new) in [("light", "dark"), ("dark", "dark"), ("dark", "solarized")] {
        let report = store.emit(ThemeChanged(ChangeEvent::new(old.to_string(), new.to_string())))?;
        info!(
            invoked = report.invoked,
            stopped = report.stopped,
            bridged = report.bridged,
            "Theme {} -> {}",
            old,
            new
        );
    }
    store.emit(Persisted { bytes: 512 })?;

    info!("📊 Store stats: {:?}", store.erased().stats());
    info!("📊 Widget stats: {:?}", widgets.erased().stats());
    Ok(())
}
