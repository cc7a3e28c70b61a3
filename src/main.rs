use extended_unrar::config::HostOptions;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    extended_unrar::logging::init();

    let options = HostOptions::from_env();
    extended_unrar::run(&options).await.into()
}
