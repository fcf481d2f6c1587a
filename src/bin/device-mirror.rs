use clap::Parser;
use log::{error, info, LevelFilter};
use tokio_util::sync::CancellationToken;
use device_mirror::{init_logging, run, Args};
use device_mirror::error::AppRunError;

fn main() -> Result<(), AppRunError> {
    let args = Args::parse();
    init_logging(args.log_level.map(LevelFilter::from).unwrap_or(LevelFilter::Info));
    info!(concat!("device-mirror ", env!("CARGO_PKG_VERSION")));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let cancel = CancellationToken::new();
    let interrupt_cancel = cancel.clone();

    let result = runtime.block_on(async move {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, shutting down");
                interrupt_cancel.cancel();
            }
        });

        match run(args, cancel).await {
            Err(err) => {
                error!("Unexpected error: {}", err);
                Err(err)
            },
            Ok(()) => Ok(()),
        }
    });

    // a pending stdin read would otherwise keep the runtime alive
    runtime.shutdown_background();
    result
}
