use std::time::Duration;

use arduino_serial::serial::PortConfig;
use arduino_serial::Device;

const PORT_NAME: &'static str = "/dev/ttyUSB0";

fn main() {
    env_logger::init();
    let config = PortConfig::new(PORT_NAME).timeout(Duration::from_millis(10));

    match Device::open(&config) {
        Ok(mut device) => loop {
            match device.available() {
                Ok(0) => continue,
                Ok(_) => match device.read_string_until::<128>('\n') {
                    Ok(line) if line.is_complete() => print!("{}", line.data),
                    Ok(line) => println!("partial line {:?} ({:?})", line.data, line.outcome),
                    Err(e) => eprintln!("Error while reading line = {:?}", e),
                },
                Err(e) => {
                    eprintln!("{:?}", e);
                    ::std::process::exit(1);
                }
            }
        },
        Err(e) => {
            eprintln!("Failed to open \"{}\". Error: {}", PORT_NAME, e);
            ::std::process::exit(1);
        }
    }
}
