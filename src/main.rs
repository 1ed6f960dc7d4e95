use std::process::ExitCode;

fn main() -> ExitCode {
    match allegro::runtime::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("allegro: {e}");
            ExitCode::FAILURE
        }
    }
}
