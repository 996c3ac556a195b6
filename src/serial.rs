//! [`Transport`] over a real serial port using the `serialport` crate
use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::device::Device;
use crate::format::Encoding;
use crate::transport::Transport;

pub const DEFAULT_BAUD_RATE: u32 = 9_600;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
/// Most boards reset when the port is opened and need a moment before they listen
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, PartialEq)]
pub struct PortConfig {
    port: String,
    baud_rate: u32,
    timeout: Duration,
    settle_delay: Duration,
    encoding: Encoding,
}

impl PortConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            encoding: Encoding::default(),
        }
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn port_name(&self) -> &str {
        &self.port
    }
}

pub struct SerialPortTransport {
    port: Option<Box<dyn SerialPort>>,
}

impl SerialPortTransport {
    /// Opens the port 8N1 without flow control and waits out the settle delay
    pub fn open(config: &PortConfig) -> Result<Self, serialport::Error> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()?;
        log::info!("opened {} at {} baud", config.port, config.baud_rate);

        if !config.settle_delay.is_zero() {
            log::debug!("waiting {:?} for the board to settle", config.settle_delay);
            thread::sleep(config.settle_delay);
        }
        Ok(Self { port: Some(port) })
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, serialport::Error> {
        self.port.as_mut().ok_or_else(|| {
            serialport::Error::new(serialport::ErrorKind::NoDevice, "port was closed")
        })
    }
}

impl Transport for SerialPortTransport {
    type Error = serialport::Error;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        Ok(self.port()?.bytes_to_read()? as usize)
    }

    fn bytes_to_write(&mut self) -> Result<usize, Self::Error> {
        Ok(self.port()?.bytes_to_write()? as usize)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut byte = [0u8; 1];
        match self.port()?.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        match self.port()?.write(bytes) {
            Ok(n) => Ok(n),
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(self.port()?.flush()?)
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), Self::Error> {
        self.port()?.set_timeout(timeout)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        if let Some(port) = self.port.take() {
            log::info!("closing {}", port.name().unwrap_or_default());
        }
        Ok(())
    }
}

impl Device<SerialPortTransport> {
    /// Opens the configured port and wraps it in a ready device
    pub fn open(config: &PortConfig) -> Result<Self, serialport::Error> {
        let transport = SerialPortTransport::open(config)?;
        Ok(Device::with_encoding(transport, config.encoding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_config_defaults() {
        let config = PortConfig::new("/dev/ttyACM0");
        assert_eq!(config.port_name(), "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 9_600);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.settle_delay, Duration::from_secs(2));
        assert_eq!(config.encoding, Encoding::Utf8);
    }

    #[test]
    fn test_port_config_builder() {
        let config = PortConfig::new("COM3")
            .baud_rate(115_200)
            .timeout(Duration::from_millis(10))
            .settle_delay(Duration::ZERO)
            .encoding(Encoding::Latin1);
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout, Duration::from_millis(10));
        assert!(config.settle_delay.is_zero());
        assert_eq!(config.encoding, Encoding::Latin1);
    }

    #[test]
    fn test_open_missing_port_fails() {
        let config = PortConfig::new("/dev/does-not-exist-arduino").settle_delay(Duration::ZERO);
        assert!(SerialPortTransport::open(&config).is_err());
    }
}
