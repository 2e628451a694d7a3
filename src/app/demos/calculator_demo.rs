use crate::app::console::Console;
use crate::config::toml_config::CalculatorConfig;
use crate::core::operation::{compose_kinds, Operation, OperationDispatcher};
use crate::utils::error::Result;

/// Applies each configured operation, two closure-defined ones, then the composition.
pub fn run(config: &CalculatorConfig, console: &Console) -> Result<Vec<f64>> {
    let (a, b) = (config.a, config.b);
    tracing::info!("🧮 Calculator demo with a={}, b={}", a, b);

    let mut dispatcher = OperationDispatcher::new(console.clone());
    let mut results = Vec::new();

    for kind in config.operation_kinds()? {
        results.push(dispatcher.apply(a, b, &kind.operation())?);
    }

    let anonymous_multiply = Operation::new("anonymous multiply", |a, b| a * b);
    let guarded_divide = Operation::new("guarded divide", |a, b| {
        if b != 0.0 {
            a / b
        } else {
            f64::NAN
        }
    });
    results.push(dispatcher.apply(a, b, &anonymous_multiply)?);
    results.push(dispatcher.apply(a, b, &guarded_divide)?);

    if let Some(chained) = compose_kinds(&config.compose_kinds()?) {
        tracing::info!("🔗 Composed operation: {}", chained.name());
        results.push(dispatcher.apply(a, b, &chained)?);
    }

    Ok(results)
}
