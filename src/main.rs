use std::process::ExitCode;

/// Exit status used when interrupted by a signal.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    // The dashboard reads Ctrl+C as a key in raw mode; this only fires for
    // one-shot commands blocked on the network.
    tokio::spawn(async {
        shutdown_signal().await;
        eprintln!("\nInterrupted");
        politicos::telemetry::shutdown_tracing();
        std::process::exit(EXIT_INTERRUPTED);
    });

    let result = politicos::cli::run().await;

    politicos::telemetry::shutdown_tracing();

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(politicos::errors::get_exit_code(&e))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(_) => {
                ctrl_c.await.ok();
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
}
