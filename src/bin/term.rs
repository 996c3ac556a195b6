use std::env;
use std::time::Duration;

use arduino_serial::device::command::Command;
use arduino_serial::serial::PortConfig;
use arduino_serial::{Device, Encoding};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 || args.len() > 5 {
        return Err("Usage: arduino-term <port> <baud> <command> [encoding]".into());
    }

    let baud_rate: u32 = args[2].parse()?;
    let encoding = match args.get(4) {
        Some(name) => name
            .parse::<Encoding>()
            .map_err(|_| format!("unknown encoding: {}", name))?,
        None => Encoding::default(),
    };
    let command = Command::parse(&args[3])?;

    let config = PortConfig::new(args[1].as_str())
        .baud_rate(baud_rate)
        .timeout(Duration::from_millis(500))
        .encoding(encoding);
    let mut device = Device::open(&config)?;

    let response = command.execute(&mut device)?;
    println!("{}", response);
    device.end()?;
    Ok(())
}
