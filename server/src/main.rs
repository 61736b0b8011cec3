use demodw_server::core::CoreApp;
use demodw_server::domain::PipelineError;

#[tokio::main]
async fn main() {
    if let Err(e) = CoreApp::run().await {
        eprintln!("\nError: {e}\n");
        // A failed pipeline stage exits with the failed child's exit code
        let code = e
            .downcast_ref::<PipelineError>()
            .map_or(1, PipelineError::exit_code);
        std::process::exit(code);
    }
}
