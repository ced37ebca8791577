use std::process;

/// Exits the program with an error message
pub fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exits the program with an error message followed by the usage text
pub fn exit_with_usage_error(message: &str, usage: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!();
    eprintln!("{}", usage);
    process::exit(2);
}

/// Prints a value as indented JSON or exits with an error naming `context`
pub fn print_json_or_exit<T>(value: &T, context: &str)
where
    T: serde::Serialize,
{
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to format {} JSON: {}", context, e)),
    }
}

/// Checks that `args` holds exactly `count` values, exiting with usage otherwise
pub fn expect_args_or_exit(args: &[String], count: usize, command: &str, usage: &str) {
    if args.len() != count {
        exit_with_usage_error(
            &format!(
                "{} expects {} argument(s), got {}",
                command,
                count,
                args.len()
            ),
            usage,
        );
    }
}
