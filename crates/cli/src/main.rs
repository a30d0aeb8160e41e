use std::process::ExitCode;

fn main() -> ExitCode {
    bargainer_cli::run()
}
