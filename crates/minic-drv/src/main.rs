use std::process::ExitCode;

fn main() -> ExitCode {
    let args = std::env::args().skip(1);
    match minic_drv::run(args) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
