use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match colpovision_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("ColpoVision stopped: {e}");
            eprintln!("colpovision: {e}");
            ExitCode::FAILURE
        }
    }
}
