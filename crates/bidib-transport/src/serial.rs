use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{DataBits, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::ByteTransport;

/// How to open the serial device: 8-N-1 at a configurable baud rate.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub device: String,
    pub baud: u32,
}

impl SerialConfig {
    pub const DEFAULT_BAUD: u32 = 115_200;

    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            baud: Self::DEFAULT_BAUD,
        }
    }

    pub fn baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }
}

/// A serial port speaking raw BiDiB bytes.
///
/// The port keeps no protocol state, so it can be dropped and reopened
/// after an I/O failure while frame reassembly continues upstream.
pub struct SerialLink {
    config: SerialConfig,
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open the configured device.
    pub fn open(config: SerialConfig) -> Result<Self> {
        let port = open_port(&config)?;
        info!(device = %config.device, baud = config.baud, "serial port open");
        Ok(Self { config, port })
    }

    /// Drop the current handle and open the device again.
    pub fn reopen(&mut self) -> Result<()> {
        debug!(device = %self.config.device, "reopening serial port");
        self.port = open_port(&self.config)?;
        Ok(())
    }

    pub fn device(&self) -> &str {
        &self.config.device
    }
}

fn open_port(config: &SerialConfig) -> Result<Box<dyn SerialPort>> {
    serialport::new(&config.device, config.baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_millis(20))
        .open()
        .map_err(|source| TransportError::Open {
            device: config.device.clone(),
            source,
        })
}

impl ByteTransport for SerialLink {
    fn recv(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        self.port
            .set_timeout(timeout)
            .map_err(|err| TransportError::Io(err.into()))?;
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(err) if err.kind() == ErrorKind::TimedOut => Ok(0),
            Err(err) if err.kind() == ErrorKind::Interrupted => Ok(0),
            Err(err) => Err(TransportError::Io(err)),
        }
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }
}
