use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = pico_export::run() {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
