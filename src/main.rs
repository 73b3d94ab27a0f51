use color_eyre::eyre::{Result, WrapErr};
use greetsrv::{BindAddress, DEFAULT_BIND_ADDRESS, EchoResponder, ResponderConfig};

use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("greetsrv=info")
        .init();

    let args: Vec<String> = std::env::args().collect();
    let endpoint = args.get(1).map(String::as_str).unwrap_or(DEFAULT_BIND_ADDRESS);

    let bind_addr = match endpoint.parse::<BindAddress>() {
        Ok(addr) if args.len() <= 2 => addr,
        result => {
            if let Err(e) = result {
                eprintln!("{e}");
            }
            eprintln!("Usage: {} [endpoint]", args[0]);
            eprintln!("  endpoint: ZeroMQ endpoint to bind (default: {DEFAULT_BIND_ADDRESS})");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  {}                            # Serve on tcp://*:4242", args[0]);
            eprintln!("  {} tcp://127.0.0.1:5555       # Serve on loopback port 5555", args[0]);
            eprintln!("  {} ipc:///tmp/greetsrv.sock   # Serve on a Unix socket", args[0]);
            std::process::exit(1);
        }
    };

    let config = ResponderConfig::from(bind_addr);
    info!(address = %config.bind_addr, max_request_size = config.max_request_size, "Starting greeting responder");

    let responder = EchoResponder::start(config)
        .await
        .wrap_err_with(|| format!("Failed to bind {endpoint}"))?;
    responder
        .serve_forever()
        .await
        .wrap_err("Greeting responder failed")?;

    Ok(())
}
