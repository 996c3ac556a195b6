use ::std::{thread, time};
use std::time::Duration;

use arduino_serial::serial::PortConfig;
use arduino_serial::{Base, Device};

const PORT_NAME: &'static str = "/dev/ttyUSB0";

fn main() {
    env_logger::init();
    let config = PortConfig::new(PORT_NAME).timeout(Duration::from_millis(10));

    match Device::open(&config) {
        Ok(mut device) => {
            device.println("hello", None).unwrap();
            for base in [Base::Dec, Base::Hex, Base::Oct, Base::Bin] {
                device.println(255, Some(base)).unwrap();
                thread::sleep(time::Duration::from_millis(250));
            }
            device.write_buffer(b"raw bytes\n", 10).unwrap();
            device.flush().unwrap();
            device.end().unwrap();
        }
        Err(e) => {
            eprintln!("Failed to open \"{}\". Error: {}", PORT_NAME, e);
            ::std::process::exit(1);
        }
    }
}
