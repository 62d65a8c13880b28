use std::process::ExitCode;

fn main() -> ExitCode {
    upsell_cli::run()
}
