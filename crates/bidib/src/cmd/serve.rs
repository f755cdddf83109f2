use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use bidib_node::{Node, NodeConfig, NodeLink};
use bidib_transport::{ByteTransport, SerialConfig, SerialLink};

use crate::cmd::ServeArgs;
use crate::exit::{transport_error, CliError, CliResult, INTERNAL, SUCCESS};

const READ_CHUNK: usize = 512;

/// Upper bound on one wait, so ctrl-c is noticed promptly even when no
/// timer is armed.
const MAX_WAIT: Duration = Duration::from_millis(50);

/// Pause before reopening a lost serial device.
const REOPEN_BACKOFF: Duration = Duration::from_secs(1);

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let config = SerialConfig::new(&args.device).baud(args.baud);
    let mut serial =
        SerialLink::open(config).map_err(|err| transport_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut link = NodeLink::new(Node::new(NodeConfig::default()));
    let mut buf = [0u8; READ_CHUNK];

    info!(device = %args.device, baud = args.baud, "node running");

    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        let wait = link
            .next_deadline()
            .map(|due| due.saturating_duration_since(now))
            .map_or(MAX_WAIT, |until| until.min(MAX_WAIT))
            .max(Duration::from_millis(1));

        let out = match serial.recv(&mut buf, wait) {
            Ok(0) => link.poll(Instant::now()),
            Ok(n) => {
                let now = Instant::now();
                let mut out = link.handle_bytes(&buf[..n], now);
                out.extend_from_slice(&link.poll(now));
                out
            }
            Err(err) => {
                recover(&mut serial, &running, &err.to_string());
                continue;
            }
        };

        if !out.is_empty() {
            if let Err(err) = serial.send(&out) {
                // Replies are best-effort; frame state lives in the link
                // and survives the reopen.
                recover(&mut serial, &running, &err.to_string());
            }
        }
    }

    info!("shutting down");
    Ok(SUCCESS)
}

fn recover(serial: &mut SerialLink, running: &AtomicBool, reason: &str) {
    warn!(device = %serial.device(), error = reason, "serial link lost");
    std::thread::sleep(REOPEN_BACKOFF);
    if !running.load(Ordering::SeqCst) {
        return;
    }
    if let Err(err) = serial.reopen() {
        warn!(error = %err, "reopen failed; will retry");
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
