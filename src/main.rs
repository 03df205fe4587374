use std::process::ExitCode;

fn main() -> ExitCode {
    ia_templatizer_lib::run()
}
