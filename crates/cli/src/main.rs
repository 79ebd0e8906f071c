use std::process::ExitCode;

fn main() -> ExitCode {
    affinity_cli::run()
}
