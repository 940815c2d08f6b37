use cmdkit::{Argument, Command, SemanticType, TypeRegistry};

fn main() {
    let registry = TypeRegistry::default();
    let command = Command::new("summer")
        .add(
            Argument::builder("item")
                .semantic_type(SemanticType::INTEGER)
                .required()
                .repeats()
                .description("The items to sum.")
                .build(&registry)
                .expect("The argument should be valid"),
        )
        .expect("The command should be valid");

    let parsed = command.run();
    let sum: i64 = parsed
        .get("item")
        .and_then(|v| v.as_list())
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v.as_integer())
        .sum();
    println!("Sum: {sum}");
}
