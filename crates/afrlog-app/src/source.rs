//! Byte sources
//!
//! Binds the recorder to something that produces sensor bytes: a serial
//! port, a captured log file, or the demo simulator.

use std::path::PathBuf;

use afrlog_core::demo::{DemoSensor, DemoSource, DEMO_INTERVAL};
use anyhow::Context;
use serialport::{SerialPortInfo, SerialPortType};
use tokio::io::AsyncRead;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, StopBits};

/// Boxed byte source
pub type ByteSource = Box<dyn AsyncRead + Unpin + Send>;

/// Where sensor bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Serial port at the given baud rate, 8-N-1
    Serial { port: String, baud_rate: u32 },
    /// Previously captured raw output
    File(PathBuf),
    /// Simulated sensor
    Demo,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Serial { port, baud_rate } => write!(f, "{port} @ {baud_rate} baud"),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Demo => write!(f, "demo sensor"),
        }
    }
}

impl Source {
    /// Open the source
    pub async fn open(&self) -> anyhow::Result<ByteSource> {
        match self {
            Source::Serial { port, baud_rate } => {
                let stream = tokio_serial::new(port, *baud_rate)
                    .data_bits(DataBits::Eight)
                    .stop_bits(StopBits::One)
                    .parity(Parity::None)
                    .flow_control(FlowControl::None)
                    .open_native_async()
                    .with_context(|| format!("failed to open serial port {port}"))?;
                Ok(Box::new(stream))
            }
            Source::File(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Ok(Box::new(file))
            }
            Source::Demo => Ok(Box::new(DemoSource::spawn(DemoSensor::new(), DEMO_INTERVAL))),
        }
    }
}

/// Sort key putting ttyACM* first, then ttyUSB* (numerically), then the rest by name
fn port_sort_key(name: &str) -> (u8, usize, String) {
    let basename = name.rsplit('/').next().unwrap_or(name);
    if let Some(rest) = basename.strip_prefix("ttyACM") {
        let num = rest.parse::<usize>().unwrap_or(usize::MAX);
        return (0, num, basename.to_string());
    }
    if let Some(rest) = basename.strip_prefix("ttyUSB") {
        let num = rest.parse::<usize>().unwrap_or(usize::MAX);
        return (1, num, basename.to_string());
    }
    (2, 0, basename.to_string())
}

/// One line describing a port, with USB details when known
fn describe_port(info: &SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb.product.as_deref().unwrap_or("USB serial");
            format!("{} ({} {:04x}:{:04x})", info.port_name, product, usb.vid, usb.pid)
        }
        _ => info.port_name.clone(),
    }
}

/// Available serial ports in a stable order
pub fn list_ports() -> anyhow::Result<Vec<String>> {
    let mut ports = serialport::available_ports().context("failed to enumerate serial ports")?;
    ports.sort_by_key(|p| port_sort_key(&p.port_name));
    Ok(ports.iter().map(describe_port).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_ordering() {
        let mut names = vec!["/dev/ttyUSB10", "/dev/ttyS0", "/dev/ttyUSB2", "/dev/ttyACM0"];
        names.sort_by_key(|n| port_sort_key(n));
        assert_eq!(names, vec!["/dev/ttyACM0", "/dev/ttyUSB2", "/dev/ttyUSB10", "/dev/ttyS0"]);
    }

    #[test]
    fn test_source_display() {
        let source = Source::Serial {
            port: "COM3".to_string(),
            baud_rate: 9600,
        };
        assert_eq!(source.to_string(), "COM3 @ 9600 baud");
    }
}
