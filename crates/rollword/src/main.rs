#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = rollword::run_from_env() {
        eprintln!("rollword: {error}");
        std::process::exit(error.exit_code());
    }
}
