use cmdkit::{Argument, Coercion, Command, SemanticType, TypeRegistry, Value};

fn main() {
    let mut registry = TypeRegistry::default();
    let mode = SemanticType::new("mode");
    let copies = SemanticType::new("copies");
    registry.register(mode.clone(), Coercion::choices(["fast", "safe"]));
    // Anything not registered for `copies` falls back on `integer`.
    registry
        .declare(copies.clone(), SemanticType::INTEGER)
        .expect("The type hierarchy should be acyclic");

    let command = Command::new("copier")
        .add(
            Argument::builder("source")
                .semantic_type(SemanticType::PATH)
                .required()
                .description("The file to copy.")
                .build(&registry)
                .expect("The argument should be valid"),
        )
        .and_then(|c| {
            c.add(
                Argument::builder("mode")
                    .semantic_type(mode)
                    .default("safe")
                    .description("How to copy.")
                    .build(&registry)
                    .expect("The argument should be valid"),
            )
        })
        .and_then(|c| {
            c.add(
                Argument::builder("copies")
                    .semantic_type(copies)
                    .display_name("N")
                    .default(1i64)
                    .transform(|value| match value {
                        Value::Integer(n) if n > 0 => Ok(value),
                        _ => Err("must be positive".to_string()),
                    })
                    .description("The number of copies to make.")
                    .build(&registry)
                    .expect("The argument should be valid"),
            )
        })
        .expect("The command should be valid");

    if std::env::args().any(|a| a == "-h" || a == "--help") {
        command.print_help(&cmdkit::ConsoleInterface::default());
        return;
    }

    let parsed = command.run();
    println!(
        "Copying {source} {copies} time(s), in {mode} mode.",
        source = parsed.get("source").map(Value::to_string).unwrap_or_default(),
        copies = parsed.get("copies").map(Value::to_string).unwrap_or_default(),
        mode = parsed.get("mode").map(Value::to_string).unwrap_or_default(),
    );
}
