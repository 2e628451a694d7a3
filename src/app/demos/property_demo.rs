use crate::app::console::Console;
use crate::config::toml_config::PropertyConfig;
use crate::core::property::NamedProperty;
use crate::utils::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Sets the property to each configured value in turn, printing one line per change.
/// Returns the number of change notifications.
pub fn run(config: &PropertyConfig, console: &Console) -> Result<usize> {
    tracing::info!("📝 Property demo: {} value(s) for {}", config.values.len(), config.name);

    let mut property = NamedProperty::new(config.name.clone());
    let changes = Arc::new(AtomicUsize::new(0));
    {
        let console = console.clone();
        let changes = Arc::clone(&changes);
        property.on_change(move |args| {
            changes.fetch_add(1, Ordering::SeqCst);
            console.line_or_warn(format!("Property {} was changed.", args.name));
        });
    }

    for value in &config.values {
        if !property.set_value(value.as_str()) {
            tracing::debug!("Value '{}' unchanged, no notification", value);
        }
    }

    Ok(changes.load(Ordering::SeqCst))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::console::Capture;

    #[test]
    fn test_repeated_value_prints_once() {
        let capture = Capture::new();
        let config = PropertyConfig {
            name: "Name".to_string(),
            values: vec!["Alice".to_string(), "Alice".to_string(), "Bob".to_string()],
        };

        let changes = run(&config, &capture.console()).unwrap();

        assert_eq!(changes, 2);
        assert_eq!(
            capture.lines(),
            vec!["Property Name was changed.", "Property Name was changed."]
        );
    }

    #[test]
    fn test_no_values() {
        let capture = Capture::new();
        let config = PropertyConfig {
            name: "Name".to_string(),
            values: Vec::new(),
        };

        assert_eq!(run(&config, &capture.console()).unwrap(), 0);
        assert!(capture.contents().is_empty());
    }
}
