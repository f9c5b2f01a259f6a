use std::process::ExitCode;

use tagshift::ui::output;

fn main() -> ExitCode {
    match tagshift::cli::run() {
        Ok(code) => code,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
